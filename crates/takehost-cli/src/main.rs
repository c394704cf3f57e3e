//! takehost - render an audio file through a chain of plugins.
//!
//! Exit codes: 0 success, 1 bad arguments, 2 input or chain file not found,
//! 3 unreadable input, 4 invalid chain, 5 plugin failed to load, 6 output
//! could not be written.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use takehost_cli::common::{init_logging, parse_bit_depth, progress_bar};
use takehost_engine::{OfflinePipeline, parse_block_size};
use takehost_io::{AudioFormatManager, BitDepth};

/// Exit code for unusable command lines.
const BAD_ARGUMENTS: u8 = 1;

#[derive(Parser, Debug)]
#[command(name = "takehost")]
#[command(author, version, about = "Render an audio file through a plugin chain", long_about = None)]
struct Args {
    /// Input audio file
    #[arg(long, value_name = "FILE")]
    input: PathBuf,

    /// Output audio file (parent directories are created)
    #[arg(long, value_name = "FILE")]
    output: PathBuf,

    /// Chain description (JSON)
    #[arg(long, value_name = "FILE")]
    chain: PathBuf,

    /// Processing block size (minimum 64)
    #[arg(long, default_value = "512", value_parser = parse_block_size, allow_negative_numbers = true)]
    block: usize,

    /// Output bit depth (16, 24, or 32 for float)
    #[arg(long, default_value = "16", value_parser = parse_bit_depth)]
    bits: BitDepth,

    /// Show a progress bar when stderr is a terminal
    #[arg(long)]
    progress: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(BAD_ARGUMENTS)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_logging("warn", args.verbose);
    tracing::debug!(?args, "starting offline render");

    let registry = takehost_builtin::default_registry();
    let formats = AudioFormatManager::with_basic_formats();
    let pipeline = OfflinePipeline::new(&registry, &formats)
        .with_block_size(args.block)
        .with_bit_depth(args.bits);

    let bar = (args.progress && std::io::stderr().is_terminal()).then(|| progress_bar(0));
    let result = pipeline.run_chain_file(&args.input, &args.output, &args.chain, |p| {
        if let Some(bar) = &bar {
            bar.set_length(p.total);
            bar.set_position(p.done());
        }
    });

    match result {
        Ok(report) => {
            if let Some(bar) = &bar {
                bar.finish_with_message("done");
            }
            for warning in &report.preset_warnings {
                eprintln!("warning: {warning}");
            }
            tracing::info!(
                samples = report.total_samples,
                blocks = report.blocks,
                plugins = report.plugins,
                "render finished"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            if let Some(bar) = &bar {
                bar.abandon();
            }
            eprintln!("error: {e}");
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(u8::MAX))
        }
    }
}

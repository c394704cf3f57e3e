//! `takehost-batch run`: in-place processing with backups.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use takehost_cli::common::{parse_bit_depth, progress_bar};
use takehost_config::{ChainLibrary, ChainSpec, chain_library_path};
use takehost_engine::{BatchRunner, OfflinePipeline, parse_block_size};
use takehost_io::{AudioFormatManager, BitDepth};

#[derive(Args)]
pub struct RunArgs {
    /// Chain description (JSON)
    #[arg(long, value_name = "FILE", required_unless_present = "named", conflicts_with = "named")]
    chain: Option<PathBuf>,

    /// Name of a chain in the library
    #[arg(long, value_name = "NAME")]
    named: Option<String>,

    /// Processing block size (minimum 64)
    #[arg(long, default_value = "512", value_parser = parse_block_size, allow_negative_numbers = true)]
    block: usize,

    /// Output bit depth (16, 24, or 32 for float)
    #[arg(long, default_value = "16", value_parser = parse_bit_depth)]
    bits: BitDepth,

    /// Takes to process, in order
    #[arg(value_name = "FILES", required = true)]
    files: Vec<PathBuf>,
}

pub fn run(args: RunArgs) -> anyhow::Result<()> {
    let chain = match (&args.chain, &args.named) {
        (Some(path), _) => ChainSpec::load(path)
            .with_context(|| format!("Failed to load chain {}", path.display()))?,
        (None, Some(name)) => named_chain(name)?,
        (None, None) => anyhow::bail!("No chain specified. Use --chain or --named"),
    };

    let registry = takehost_builtin::default_registry();
    let formats = AudioFormatManager::with_basic_formats();
    let pipeline = OfflinePipeline::new(&registry, &formats)
        .with_block_size(args.block)
        .with_bit_depth(args.bits);
    let runner = BatchRunner::new(&pipeline, &chain);

    println!(
        "Processing {} file(s) with {} plugin(s)...",
        args.files.len(),
        chain.active_slots().count()
    );

    let bar = progress_bar(args.files.len() as u64);
    let result = runner.run(&args.files, |p| {
        bar.set_position(p.done as u64);
        if let Some(name) = p.path.file_name() {
            bar.set_message(name.to_string_lossy().into_owned());
        }
    });

    match result {
        Ok(report) => {
            bar.finish_with_message("done");
            println!("Processed {} file(s)", report.processed);
            for dir in &report.backup_dirs {
                println!("  originals backed up in {}", dir.display());
            }
            Ok(())
        }
        Err(e) => {
            bar.abandon();
            Err(e.into())
        }
    }
}

/// Chain stored in the library under `name`. Paths in the library are
/// absolute, so the base directory only matters for hand-edited entries.
fn named_chain(name: &str) -> anyhow::Result<ChainSpec> {
    let library = ChainLibrary::open(chain_library_path());
    let document = library.to_chain_document(name).with_context(|| {
        format!("Chain '{name}' not found. Use 'takehost-batch chains list' to see saved chains.")
    })?;
    let base = std::env::current_dir().unwrap_or_else(|_| Path::new(".").to_path_buf());
    Ok(ChainSpec::from_json(&document.to_json()?, &base)?)
}

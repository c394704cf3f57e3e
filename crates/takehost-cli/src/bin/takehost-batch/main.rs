//! takehost-batch - process many takes in place and manage named chains.

mod chains;
mod run;

use clap::{Parser, Subcommand};
use takehost_cli::common::init_logging;

#[derive(Parser)]
#[command(name = "takehost-batch")]
#[command(author, version, about = "Batch processing and named chains for takehost", long_about = None)]
struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process takes in place through one chain, backing up the originals
    Run(run::RunArgs),

    /// Manage the named chain library
    Chains(chains::ChainsArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging("info", cli.verbose);

    match cli.command {
        Commands::Run(args) => run::run(args),
        Commands::Chains(args) => chains::run(args),
    }
}

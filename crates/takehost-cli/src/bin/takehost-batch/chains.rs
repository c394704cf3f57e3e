//! `takehost-batch chains`: the named chain library.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Subcommand};
use takehost_config::{
    ChainEntry, ChainLibrary, ChainSpec, chain_library_path, ensure_user_config_dir,
};

#[derive(Args)]
pub struct ChainsArgs {
    #[command(subcommand)]
    action: ChainsAction,
}

#[derive(Subcommand)]
enum ChainsAction {
    /// List saved chains
    List,

    /// Save a chain file under a name
    Save {
        /// Chain name
        name: String,
        /// Chain description (JSON) to store
        #[arg(long, value_name = "FILE")]
        from: PathBuf,
    },

    /// Delete a saved chain
    Delete {
        /// Chain name
        name: String,
    },

    /// Write a saved chain as a chain file
    Export {
        /// Chain name
        name: String,
        /// Destination chain file
        output: PathBuf,
    },
}

pub fn run(args: ChainsArgs) -> anyhow::Result<()> {
    let mut library = ChainLibrary::open(chain_library_path());

    match args.action {
        ChainsAction::List => {
            let names = library.names();
            if names.is_empty() {
                println!("No saved chains in {}", library.path().display());
            }
            for name in names {
                let slots = library.get(name).map_or(0, <[ChainEntry]>::len);
                println!("{name:<24} {slots} plugin(s)");
            }
        }
        ChainsAction::Save { name, from } => {
            let spec = ChainSpec::load(&from)
                .with_context(|| format!("Failed to load chain {}", from.display()))?;
            ensure_user_config_dir()?;
            library.insert(name.clone(), to_entries(&spec))?;
            println!("Saved chain '{name}' ({} plugin(s))", spec.len());
        }
        ChainsAction::Delete { name } => {
            if !library.remove(&name)? {
                anyhow::bail!("Chain '{name}' not found");
            }
            println!("Deleted chain '{name}'");
        }
        ChainsAction::Export { name, output } => {
            let document = library
                .to_chain_document(&name)
                .with_context(|| format!("Chain '{name}' not found"))?;
            document.save(&output)?;
            println!("Exported chain '{name}' to {}", output.display());
        }
    }

    Ok(())
}

/// Resolved slots as library entries with absolute paths.
fn to_entries(spec: &ChainSpec) -> Vec<ChainEntry> {
    spec.slots()
        .iter()
        .map(|slot| {
            let entry = ChainEntry::new(slot.plugin_path.to_string_lossy()).with_bypass(slot.bypass);
            match &slot.preset_path {
                Some(preset) => entry.with_preset(preset.to_string_lossy()),
                None => entry,
            }
        })
        .collect()
}

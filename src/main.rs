//! `buddyvault` command line: inspect stored buddy lists and storage keys.

use std::path::PathBuf;

use anyhow::{Context, Result};
use buddyvault::{
    decode_key, encode_key, logging::init_logging, BuddyStorage, FsBuddyStorage, Settings,
};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::debug;

#[derive(Parser)]
#[command(name = "buddyvault")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUDDYVAULT_GIT_COMMIT"), ")"))]
#[command(about = "Inspect persisted buddy lists", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Settings file (TOML, YAML or JSON)
    #[arg(short, long, env = "BUDDYVAULT_CONFIG")]
    config: Option<PathBuf>,

    /// Overrides `storage.root`
    #[arg(long)]
    root: Option<PathBuf>,

    /// Overrides `storage.zone`
    #[arg(short, long)]
    zone: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Storage key conversions
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
    #[command(flatten)]
    Store(StoreCommand),
}

/// Commands that open the store.
#[derive(Subcommand)]
enum StoreCommand {
    /// Print the buddy list of an owner as JSON
    Show {
        owner: String,
        /// Print the stored record as is, without applying the list policy
        #[arg(long)]
        raw: bool,
    },
    /// Print the offline variables of an owner as JSON
    Vars { owner: String },
    /// List owners with a stored buddy list
    Owners,
    /// Delete the stored buddy list of an owner
    Delete { owner: String },
}

#[derive(Subcommand)]
enum KeyAction {
    /// Owner name to storage key
    Encode { name: String },
    /// Storage key to owner name
    Decode { key: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings =
        Settings::load_from(cli.config.as_deref()).context("Failed to load settings")?;
    if let Some(root) = cli.root {
        settings.storage.root = root;
    }
    if let Some(zone) = cli.zone {
        settings.storage.zone = zone;
    }
    settings.validate().context("Invalid settings")?;

    init_logging(&settings.logging).map_err(|e| anyhow::anyhow!("{e}"))?;
    debug!(dir = %settings.storage.dir().display(), "Settings loaded");

    match cli.command {
        Commands::Key { action } => run_key(action),
        Commands::Store(command) => run_store(&settings, command),
    }
}

fn run_key(action: KeyAction) -> Result<()> {
    match action {
        KeyAction::Encode { name } => println!("{}", encode_key(&name)),
        KeyAction::Decode { key } => {
            let name = decode_key(&key).with_context(|| format!("'{key}' is not a storage key"))?;
            println!("{name}");
        }
    }
    Ok(())
}

fn run_store(
    settings: &Settings,
    command: StoreCommand,
) -> Result<()> {
    let mut store = FsBuddyStorage::from_settings(settings);
    store.init().context("Failed to open buddy storage")?;

    match command {
        StoreCommand::Show { owner, raw: true } => {
            let record = store.load_record(&owner)?;
            println!("{}", serde_json::to_string_pretty(&record.to_value())?);
        }
        StoreCommand::Show { owner, raw: false } => {
            let loaded = store.load_list(&owner)?;
            let skipped: Vec<_> = loaded
                .skipped
                .iter()
                .map(|s| json!({ "name": s.name, "reason": s.error.to_string() }))
                .collect();
            let out = json!({ "list": loaded.list, "skipped": skipped });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        StoreCommand::Vars { owner } => {
            let vars = store.get_offline_variables(&owner)?;
            println!("{}", serde_json::to_string_pretty(&vars)?);
        }
        StoreCommand::Owners => {
            for owner in store.stored_owners()? {
                println!("{owner}");
            }
        }
        StoreCommand::Delete { owner } => {
            store.delete_list(&owner)?;
            println!("deleted {owner}");
        }
    }

    store.destroy();
    Ok(())
}

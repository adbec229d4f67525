//! # codable-store - Record Store Inspector
//!
//! Small command line tool for looking inside a store without the Rust
//! record types at hand. It opens the sled database described by a
//! configuration file (or `./data` by default) and works on raw namespaces:
//!
//! - `ids <namespace>`: list the IDs stored in a namespace
//! - `dump <namespace>`: print every entry, decoded to JSON when the
//!   configured codec allows it and as base64 otherwise
//! - `delete <namespace> <id>`: remove one entry
//!
//! The `defaults` and `memory` backends only live inside one process, so a
//! separate inspector process would always see them empty. They are refused.

use anyhow::{bail, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::{Parser, Subcommand};
use log::debug;
use std::io::{self, Write};
use std::path::PathBuf;

use codable_store::{Backend, BackingStore, KvEngine, StoreConfig};

#[derive(Parser, Debug)]
#[command(name = "codable-store", version, about = "Inspect a codable record store")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backing store (overrides config file); only sled can be inspected
    #[arg(long)]
    backend: Option<Backend>,

    /// Storage path (overrides config file)
    #[arg(long)]
    storage_path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// List the IDs stored under a namespace
    Ids { namespace: String },
    /// Print every entry stored under a namespace
    Dump { namespace: String },
    /// Remove one entry; missing entries are ignored
    Delete { namespace: String, id: String },
}

/// Work out the effective configuration.
///
/// # Configuration Priority
/// 1. Command line arguments (highest priority)
/// 2. Configuration file
/// 3. Sled at the default storage path (lowest priority)
fn resolve_config(cli: &Cli) -> Result<StoreConfig> {
    let mut config = match &cli.config {
        Some(path) => StoreConfig::load(path)?,
        None => StoreConfig {
            backend: Backend::Sled,
            ..StoreConfig::default()
        },
    };
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Some(path) = &cli.storage_path {
        config.storage_path = path.clone();
    }

    if config.backend != Backend::Sled {
        bail!(
            "the {} backend only lives inside the process that writes it; \
             use --backend sled or a sled configuration file",
            config.backend
        );
    }
    Ok(config)
}

/// Execute one subcommand against `engine`, writing results to `out`.
fn run<S: BackingStore>(command: Command, engine: &KvEngine<S>, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Ids { namespace } => {
            let mut ids: Vec<String> = engine.ids_in(&namespace)?.into_iter().collect();
            ids.sort();
            for id in ids {
                writeln!(out, "{}", id)?;
            }
        }
        Command::Dump { namespace } => {
            for (id, bytes) in engine.raw_entries_in(&namespace)? {
                match engine.codec().decode::<serde_json::Value>(&bytes) {
                    Ok(value) => writeln!(out, "{}\t{}", id, value)?,
                    Err(e) => {
                        debug!("Value of '{}' is not self-describing: {}", id, e);
                        writeln!(out, "{}\tbase64:{}", id, STANDARD.encode(&bytes))?;
                    }
                }
            }
        }
        Command::Delete { namespace, id } => {
            engine.remove_raw(&namespace, &id)?;
            writeln!(out, "OK")?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // Use RUST_LOG to control verbosity, e.g. RUST_LOG=debug
    env_logger::init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    debug!("Effective configuration: {:?}", config);

    let engine = config.open_engine()?;
    let stdout = io::stdout();
    run(cli.command, &engine, &mut stdout.lock())
}

//! Cardfile CLI entry point.
//!
//! Thin wrapper around the cardfile-store library: parses
//! `cardfile <dbfile> <action> [params]`, initializes logging, runs
//! one action against the store, and exits non-zero on any failure.
//! The library itself never terminates the process; only this layer
//! does.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use cardfile_store::{OpenMode, RecordStore, SLOT_COUNT};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "cardfile",
    about = "Fixed-slot single-file address record store",
    version,
    author
)]
struct Cli {
    /// Path to the database file
    dbfile: PathBuf,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Create a fresh database, truncating any existing file
    #[command(visible_alias = "c")]
    Create,

    /// Print the record stored at an id
    #[command(visible_alias = "g")]
    Get {
        /// Slot id (0..99)
        id: u32,
    },

    /// Store a record at an id; the slot must be empty
    #[command(visible_alias = "s")]
    Set {
        /// Slot id (0..99)
        id: u32,
        /// Contact name (truncated to 511 bytes)
        name: String,
        /// Contact email (truncated to 511 bytes)
        email: String,
    },

    /// Delete the record at an id
    #[command(visible_alias = "d")]
    Delete {
        /// Slot id (0..99)
        id: u32,
    },

    /// List all stored records in id order
    #[command(visible_alias = "l")]
    List,
}

impl Action {
    /// Actions other than `create` load the existing table.
    const fn open_mode(&self) -> OpenMode {
        match self {
            Self::Create => OpenMode::Create,
            _ => OpenMode::Update,
        }
    }

    const fn id(&self) -> Option<u32> {
        match self {
            Self::Get { id } | Self::Set { id, .. } | Self::Delete { id } => Some(*id),
            Self::Create | Self::List => None,
        }
    }
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    // Match the historical usage message for ids past the table end.
    if let Some(id) = cli.action.id()
        && id as usize >= SLOT_COUNT
    {
        bail!("there's not that many records (max id {})", SLOT_COUNT - 1);
    }

    let mut store = RecordStore::open(&cli.dbfile, cli.action.open_mode())
        .with_context(|| format!("failed to open database {}", cli.dbfile.display()))?;
    tracing::debug!(dbfile = %cli.dbfile.display(), "database opened");

    match cli.action {
        Action::Create => {
            store.initialize();
            store.persist()?;
        }
        Action::Get { id } => {
            println!("{}", store.get(id)?);
        }
        Action::Set { id, name, email } => {
            store.set(id, &name, &email)?;
            store.persist()?;
        }
        Action::Delete { id } => {
            store.delete(id)?;
            store.persist()?;
        }
        Action::List => {
            for record in store.records() {
                println!("{record}");
            }
        }
    }

    store.close()?;
    Ok(())
}

//! Command-line handlers
//!
//! Each submodule handles one area of the logbook:
//! - `geo` - locator encode/decode, distance, nearby references
//! - `qso` - logging, listing and deleting contacts; DX spots
//! - `adif` - ADIF import/export
//! - `sync` - remote logbook import/push and directory lookup
//! - `settings` - show, read and change settings

pub mod adif;
pub mod geo;
pub mod qso;
pub mod settings;
pub mod sync;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::sync::Mutex;

use hamlog::reference::CatalogFile;
use hamlog::store::SqliteStore;
use hamlog::{Logbook, Result};

#[derive(Parser)]
#[command(name = "hamlog")]
#[command(version)]
#[command(about = "Amateur radio contact logbook with Maidenhead tools and remote sync")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Logbook database file (":memory:" for a throwaway logbook)
    #[arg(long, global = true, default_value = "hamlog.db")]
    pub db: String,

    /// Park/summit catalog file replacing the built-in references
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encode a coordinate as a 6-character locator
    Grid(geo::GridArgs),

    /// Decode a locator to the centre of its square
    Decode(geo::DecodeArgs),

    /// Great-circle distance between two locators
    Distance(geo::DistanceArgs),

    /// Nearest park and summit to a coordinate
    Nearest(geo::NearestArgs),

    /// Log a contact
    Log(qso::LogArgs),

    /// List logged contacts
    List(qso::ListArgs),

    /// Delete a contact by id
    Delete(qso::DeleteArgs),

    /// Delete every contact
    Clear(qso::ClearArgs),

    /// Show DX spots from a cluster dump
    Spots(qso::SpotsArgs),

    /// Import contacts from an ADIF file
    ImportAdif(adif::ImportArgs),

    /// Export the logbook as ADIF
    Export(adif::ExportArgs),

    /// Import the remote logbook and merge it
    Fetch(sync::RemoteArgs),

    /// Push unsynced contacts to the remote logbook
    Push(sync::RemoteArgs),

    /// Look up a callsign in a directory file
    Lookup(sync::LookupArgs),

    /// Show or change settings
    Settings(settings::SettingsArgs),
}

/// Shared state for one CLI invocation
pub struct Context {
    pub logbook: Mutex<Logbook<SqliteStore>>,
    pub json: bool,
}

impl Context {
    pub async fn open(db: &str, catalog: Option<&Path>, json: bool) -> Result<Self> {
        let store = if db == ":memory:" {
            SqliteStore::open_in_memory().await?
        } else {
            SqliteStore::open(PathBuf::from(db)).await?
        };
        let mut logbook = Logbook::open(store).await?;
        if let Some(path) = catalog {
            let (parks, summits) = CatalogFile::load(path).await?.into_catalogs();
            logbook = logbook.with_catalogs(parks, summits);
        }
        Ok(Self {
            logbook: Mutex::new(logbook),
            json,
        })
    }

    /// Print `value` as JSON, or run `text` for human output
    pub fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce(&T)) -> Result<()> {
        emit(self.json, value, text)
    }
}

pub fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        text(value);
    }
    Ok(())
}

pub async fn run(cli: Cli) -> Result<()> {
    // Pure geometry needs no logbook
    match &cli.command {
        Commands::Grid(args) => return geo::grid(args, cli.json),
        Commands::Decode(args) => return geo::decode(args, cli.json),
        Commands::Distance(args) => return geo::distance(args, cli.json),
        _ => {}
    }

    let ctx = Context::open(&cli.db, cli.catalog.as_deref(), cli.json).await?;
    match cli.command {
        Commands::Grid(_) | Commands::Decode(_) | Commands::Distance(_) => Ok(()),
        Commands::Nearest(args) => geo::nearest(&ctx, args).await,
        Commands::Log(args) => qso::log(&ctx, args).await,
        Commands::List(args) => qso::list(&ctx, args).await,
        Commands::Delete(args) => qso::delete(&ctx, args).await,
        Commands::Clear(args) => qso::clear(&ctx, args).await,
        Commands::Spots(args) => qso::spots(&ctx, args).await,
        Commands::ImportAdif(args) => adif::import(&ctx, args).await,
        Commands::Export(args) => adif::export(&ctx, args).await,
        Commands::Fetch(args) => sync::fetch(&ctx, args).await,
        Commands::Push(args) => sync::push(&ctx, args).await,
        Commands::Lookup(args) => sync::lookup(&ctx, args).await,
        Commands::Settings(args) => settings::run(&ctx, args).await,
    }
}

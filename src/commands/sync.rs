//! Remote logbook and directory commands

use std::path::PathBuf;

use clap::Args;

use super::Context;
use hamlog::sync::{self, JsonFileDirectory, JsonFileRemote};
use hamlog::Result;

#[derive(Args)]
pub struct RemoteArgs {
    /// Remote logbook file (JSON array of records)
    pub remote: PathBuf,
}

#[derive(Args)]
pub struct LookupArgs {
    pub callsign: String,

    /// Directory file (JSON object keyed by callsign)
    #[arg(long)]
    pub directory: PathBuf,
}

pub async fn fetch(ctx: &Context, args: RemoteArgs) -> Result<()> {
    let remote = JsonFileRemote::new(args.remote);
    let report = sync::import_remote(&ctx.logbook, &remote).await?;
    ctx.emit(&report, |r| {
        println!(
            "Fetched {} ({} skipped): {} new, {} newly synced, {} in log",
            r.fetched, r.skipped, r.imported, r.newly_synced, r.total
        )
    })
}

pub async fn push(ctx: &Context, args: RemoteArgs) -> Result<()> {
    let remote = JsonFileRemote::new(args.remote);
    let pushed = sync::push_unsynced(&ctx.logbook, &remote).await?;
    ctx.emit(&pushed, |n| println!("Pushed {} contacts", n))
}

pub async fn lookup(ctx: &Context, args: LookupArgs) -> Result<()> {
    let timeout = ctx.logbook.lock().await.settings().provider_timeout_secs;
    let directory = JsonFileDirectory::load(&args.directory).await?;
    let entry = sync::lookup_station(&directory, &args.callsign, timeout).await?;
    ctx.emit(&entry, |e| match e {
        Some(e) => println!("{}  {}  {}", e.name, e.location, e.grid_locator),
        None => println!("No directory entry for {}", args.callsign),
    })
}

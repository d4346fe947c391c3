//! Contact commands
//!
//! - log: validate and save a contact, with optional directory lookup,
//!   reference auto-fill and auto-sync
//! - list / delete / clear
//! - spots: normalize a cluster dump and optionally log one spot

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Args;

use super::Context;
use hamlog::adif::{Band, Mode};
use hamlog::error::Error;
use hamlog::geo::Coordinate;
use hamlog::qso::{filter_spots, normalize_spots, Contact, ContactDraft, RawSpot};
use hamlog::sync::{self, JsonFileDirectory, JsonFileRemote};
use hamlog::{LogOutcome, Result};

#[derive(Args)]
pub struct LogArgs {
    pub callsign: String,

    #[arg(long, default_value = "40m")]
    pub band: Band,

    #[arg(long, default_value = "SSB")]
    pub mode: Mode,

    #[arg(long, default_value = "59")]
    pub rst_sent: String,

    #[arg(long, default_value = "59")]
    pub rst_rcvd: String,

    #[arg(long, default_value = "100W")]
    pub power: String,

    /// Operator name
    #[arg(long)]
    pub name: Option<String>,

    /// Operator location (QTH)
    #[arg(long)]
    pub qth: Option<String>,

    /// Maidenhead locator of the other station
    #[arg(long)]
    pub grid: Option<String>,

    /// Park reference, e.g. I-0123
    #[arg(long)]
    pub park: Option<String>,

    /// Summit reference, e.g. I/LO-123
    #[arg(long)]
    pub summit: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Handle of an audio recording of the contact
    #[arg(long)]
    pub audio: Option<String>,

    /// Contact time (RFC 3339); defaults to now
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,

    /// Log even if it duplicates an existing contact
    #[arg(long)]
    pub force: bool,

    /// Directory file to fill name, QTH and locator from
    #[arg(long)]
    pub lookup: Option<PathBuf>,

    /// Operating position "LAT,LON" for park/summit auto-fill
    #[arg(long, allow_hyphen_values = true)]
    pub position: Option<String>,

    /// Remote logbook file to push to when auto-sync is enabled
    #[arg(long)]
    pub remote: Option<PathBuf>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only contacts logged since UTC midnight
    #[arg(long)]
    pub today: bool,

    /// Only contacts not yet pushed
    #[arg(long)]
    pub unsynced: bool,

    /// Callsign substring filter
    #[arg(long)]
    pub filter: Option<String>,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub id: String,
}

#[derive(Args)]
pub struct ClearArgs {
    /// Confirm deleting every contact
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct SpotsArgs {
    /// JSON array of cluster spots
    pub file: PathBuf,

    /// Callsign substring filter
    #[arg(long)]
    pub filter: Option<String>,

    /// Log the spot with this id
    #[arg(long)]
    pub log: Option<String>,
}

fn parse_position(raw: &str) -> Result<Coordinate> {
    let (lat, lon) = raw
        .split_once(',')
        .ok_or_else(|| Error::InvalidInput(format!("position '{}' is not LAT,LON", raw)))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|_| Error::InvalidInput(format!("position '{}' is not LAT,LON", raw)))
    };
    Coordinate::new(parse(lat)?, parse(lon)?)
}

pub async fn log(ctx: &Context, args: LogArgs) -> Result<()> {
    let mut draft = ContactDraft {
        band: args.band,
        mode: args.mode,
        rst_sent: args.rst_sent,
        rst_rcvd: args.rst_rcvd,
        power: args.power,
        grid_locator: args.grid.unwrap_or_default(),
        park_reference: args.park,
        summit_reference: args.summit,
        notes: args.notes,
        audio_handle: args.audio,
        ..ContactDraft::for_callsign(args.callsign)
    };

    let (settings, home) = {
        let book = ctx.logbook.lock().await;
        (book.settings().clone(), book.settings().home_coordinate())
    };

    if let Some(path) = &args.lookup {
        match JsonFileDirectory::load(path).await {
            Ok(directory) => {
                sync::enrich_from_directory(
                    &directory,
                    &mut draft,
                    home,
                    settings.provider_timeout_secs,
                )
                .await;
            }
            Err(e) => log::warn!("Directory {} unavailable: {}", path.display(), e),
        }
    }
    // Explicit flags win over the directory
    if let Some(name) = args.name {
        draft.operator_name = name;
    }
    if let Some(qth) = args.qth {
        draft.operator_location = qth;
    }
    if !settings.audio_recording_enabled {
        draft.audio_handle = None;
    }

    let timestamp = args.at.unwrap_or_else(Utc::now);
    let outcome = {
        let mut book = ctx.logbook.lock().await;
        if let Some(raw) = &args.position {
            book.fill_references(&mut draft, parse_position(raw)?)?;
        }
        book.log_contact(draft, timestamp, args.force).await?
    };

    ctx.emit(&outcome, |o| match o {
        LogOutcome::Logged(c) => println!("Logged {}", describe(c)),
        LogOutcome::Duplicate(c) => println!(
            "Possible duplicate of {} (use --force to log anyway)",
            describe(c)
        ),
    })?;

    if let (LogOutcome::Logged(_), true, Some(path)) =
        (&outcome, settings.auto_sync_enabled, &args.remote)
    {
        // The contact is already saved; a failed push leaves it for the next sync
        match sync::push_unsynced(&ctx.logbook, &JsonFileRemote::new(path)).await {
            Ok(pushed) => log::info!("Auto-sync pushed {} contacts", pushed),
            Err(e) => log::warn!("Auto-sync failed: {}", e),
        }
    }
    Ok(())
}

pub async fn list(ctx: &Context, args: ListArgs) -> Result<()> {
    let book = ctx.logbook.lock().await;
    let needle = args.filter.unwrap_or_default().trim().to_uppercase();

    let contacts: Vec<&Contact> = if args.today {
        book.today(Utc::now())
    } else {
        book.contacts().iter().collect()
    };
    let contacts: Vec<&Contact> = contacts
        .into_iter()
        .filter(|c| !args.unsynced || !c.synced)
        .filter(|c| needle.is_empty() || c.callsign.as_str().contains(&needle))
        .collect();

    ctx.emit(&contacts, |list| {
        for c in list {
            println!("{}  {}", c.id, describe(c));
        }
        println!("{} contacts", list.len());
    })
}

pub async fn delete(ctx: &Context, args: DeleteArgs) -> Result<()> {
    let deleted = ctx.logbook.lock().await.delete_contact(&args.id).await?;
    if !deleted {
        return Err(Error::InvalidInput(format!("no contact with id {}", args.id)));
    }
    ctx.emit(&args.id, |id| println!("Deleted {}", id))
}

pub async fn clear(ctx: &Context, args: ClearArgs) -> Result<()> {
    if !args.yes {
        return Err(Error::InvalidInput(
            "refusing to clear the logbook without --yes".to_string(),
        ));
    }
    let removed = ctx.logbook.lock().await.clear().await?;
    ctx.emit(&removed, |n| println!("Removed {} contacts", n))
}

pub async fn spots(ctx: &Context, args: SpotsArgs) -> Result<()> {
    if !ctx.logbook.lock().await.settings().spots_enabled {
        return Err(Error::Config(
            "DX spots are disabled (settings set spots-enabled true)".to_string(),
        ));
    }
    let bytes = tokio::fs::read(&args.file).await?;
    let raw: Vec<RawSpot> = serde_json::from_slice(&bytes)?;
    let spots = normalize_spots(raw, Utc::now());

    if let Some(id) = &args.log {
        let spot = spots
            .iter()
            .find(|s| &s.id == id)
            .ok_or_else(|| Error::InvalidInput(format!("no spot with id {}", id)))?;
        let outcome = ctx
            .logbook
            .lock()
            .await
            .log_contact(spot.to_draft(), Utc::now(), false)
            .await?;
        return ctx.emit(&outcome, |o| match o {
            LogOutcome::Logged(c) => println!("Logged {}", describe(c)),
            LogOutcome::Duplicate(c) => println!("Possible duplicate of {}", describe(c)),
        });
    }

    let shown = filter_spots(&spots, args.filter.as_deref().unwrap_or_default());
    ctx.emit(&shown, |list| {
        for s in list {
            println!(
                "{}  {:<10} {:>10} {:<5} de {} {}",
                s.id, s.dx_callsign, s.frequency_mhz, s.mode, s.spotter_callsign, s.time_of_day
            );
        }
    })
}

fn describe(c: &Contact) -> String {
    let mut line = format!(
        "{} {} {} {} {}/{}",
        c.timestamp.format("%Y-%m-%d %H:%M"),
        c.callsign,
        c.band,
        c.mode,
        c.rst_sent,
        c.rst_rcvd
    );
    if let Some(grid) = &c.grid_locator {
        line.push_str(&format!(" {}", grid));
    }
    if let Some(km) = c.distance_km {
        line.push_str(&format!(" {} km", km));
    }
    if let Some(park) = &c.park_reference {
        line.push_str(&format!(" [{}]", park));
    }
    if let Some(summit) = &c.summit_reference {
        line.push_str(&format!(" [{}]", summit));
    }
    if !c.synced {
        line.push_str(" *");
    }
    line
}

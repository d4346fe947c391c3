//! Locator and reference commands

use clap::Args;
use serde::Serialize;

use super::{emit, Context};
use hamlog::geo::{self, Coordinate, GridLocator};
use hamlog::Result;

#[derive(Args)]
pub struct GridArgs {
    /// Latitude in degrees (south negative)
    #[arg(allow_hyphen_values = true)]
    pub latitude: f64,
    /// Longitude in degrees (west negative)
    #[arg(allow_hyphen_values = true)]
    pub longitude: f64,
}

#[derive(Args)]
pub struct DecodeArgs {
    pub locator: String,
}

#[derive(Args)]
pub struct DistanceArgs {
    pub from: String,
    pub to: String,
}

#[derive(Args)]
pub struct NearestArgs {
    #[arg(allow_hyphen_values = true)]
    pub latitude: f64,
    #[arg(allow_hyphen_values = true)]
    pub longitude: f64,
}

#[derive(Serialize)]
struct DistanceReport {
    from: GridLocator,
    to: GridLocator,
    distance_km: u32,
}

pub fn grid(args: &GridArgs, json: bool) -> Result<()> {
    let locator = geo::encode(Coordinate::new(args.latitude, args.longitude)?);
    emit(json, &locator, |l| println!("{}", l))
}

pub fn decode(args: &DecodeArgs, json: bool) -> Result<()> {
    let centre = geo::decode(&args.locator)?;
    emit(json, &centre, |c| println!("{}", c))
}

pub fn distance(args: &DistanceArgs, json: bool) -> Result<()> {
    let from = GridLocator::parse(&args.from)?;
    let to = GridLocator::parse(&args.to)?;
    let report = DistanceReport {
        distance_km: geo::distance_km(from.center(), to.center()),
        from,
        to,
    };
    emit(json, &report, |r| {
        println!("{} -> {}: {} km", r.from, r.to, r.distance_km)
    })
}

pub async fn nearest(ctx: &Context, args: NearestArgs) -> Result<()> {
    let position = Coordinate::new(args.latitude, args.longitude)?;
    let suggestion = ctx.logbook.lock().await.suggest_references(position)?;
    ctx.emit(&suggestion, |s| {
        match &s.park {
            Some(p) => println!("Park:   {} {}", p.id, p.name),
            None => println!("Park:   none nearby"),
        }
        match &s.summit {
            Some(r) => println!("Summit: {} {}", r.id, r.name),
            None => println!("Summit: none nearby"),
        }
    })
}

// Amateur Radio Band Definitions
// Reference: ARRL Band Plan and ADIF 3.1.4 Specification
//
// This module provides the band enumeration and frequency-to-band conversion.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Amateur radio bands carried in the logbook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Band {
    B160m,
    B80m,
    B60m,
    #[default]
    B40m,
    B30m,
    B20m,
    B17m,
    B15m,
    B12m,
    B10m,
    B6m,
    B2m,
    B1_25m,
    B70cm,
    B33cm,
    B23cm,
}

impl Band {
    pub const ALL: [Band; 16] = [
        Band::B160m,
        Band::B80m,
        Band::B60m,
        Band::B40m,
        Band::B30m,
        Band::B20m,
        Band::B17m,
        Band::B15m,
        Band::B12m,
        Band::B10m,
        Band::B6m,
        Band::B2m,
        Band::B1_25m,
        Band::B70cm,
        Band::B33cm,
        Band::B23cm,
    ];

    /// ADIF band name
    pub fn as_str(&self) -> &'static str {
        match self {
            Band::B160m => "160m",
            Band::B80m => "80m",
            Band::B60m => "60m",
            Band::B40m => "40m",
            Band::B30m => "30m",
            Band::B20m => "20m",
            Band::B17m => "17m",
            Band::B15m => "15m",
            Band::B12m => "12m",
            Band::B10m => "10m",
            Band::B6m => "6m",
            Band::B2m => "2m",
            Band::B1_25m => "1.25m",
            Band::B70cm => "70cm",
            Band::B33cm => "33cm",
            Band::B23cm => "23cm",
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for Band {
    type Err = Error;

    /// Case-insensitive ("20M" and "20m" both parse)
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Band::ALL
            .iter()
            .copied()
            .find(|b| b.as_str() == wanted)
            .ok_or_else(|| Error::InvalidInput(format!("unknown band '{}'", s.trim())))
    }
}

impl TryFrom<String> for Band {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Band> for String {
    fn from(band: Band) -> Self {
        band.as_str().to_string()
    }
}

/// Returns the band whose allocation contains `freq_mhz`
pub fn freq_to_band(freq_mhz: f64) -> Option<Band> {
    match freq_mhz {
        // HF Bands
        f if (1.8..=2.0).contains(&f) => Some(Band::B160m),
        f if (3.5..=4.0).contains(&f) => Some(Band::B80m),
        f if (5.0..=5.5).contains(&f) => Some(Band::B60m), // Channelized in US
        f if (7.0..=7.3).contains(&f) => Some(Band::B40m),
        f if (10.1..=10.15).contains(&f) => Some(Band::B30m),
        f if (14.0..=14.35).contains(&f) => Some(Band::B20m),
        f if (18.068..=18.168).contains(&f) => Some(Band::B17m),
        f if (21.0..=21.45).contains(&f) => Some(Band::B15m),
        f if (24.89..=24.99).contains(&f) => Some(Band::B12m),
        f if (28.0..=29.7).contains(&f) => Some(Band::B10m),
        // VHF/UHF Bands
        f if (50.0..=54.0).contains(&f) => Some(Band::B6m),
        f if (144.0..=148.0).contains(&f) => Some(Band::B2m),
        f if (222.0..=225.0).contains(&f) => Some(Band::B1_25m),
        f if (420.0..=450.0).contains(&f) => Some(Band::B70cm),
        f if (902.0..=928.0).contains(&f) => Some(Band::B33cm),
        f if (1240.0..=1300.0).contains(&f) => Some(Band::B23cm),
        _ => None,
    }
}

/// Best-effort band for a spot frequency string in MHz
///
/// Exact band-plan matches win; anything else falls through to coarse
/// thresholds so that a slightly out-of-band cluster report still lands on
/// the nearest band below it. Unparsable input defaults to 40m.
pub fn infer_band(freq_mhz: &str) -> Band {
    let f: f64 = match freq_mhz.trim().parse() {
        Ok(f) if f >= 0.0 => f,
        _ => return Band::B40m,
    };

    if let Some(band) = freq_to_band(f) {
        return band;
    }

    match f {
        f if f < 2.0 => Band::B160m,
        f if f < 4.0 => Band::B80m,
        f if f < 6.0 => Band::B60m,
        f if f < 8.0 => Band::B40m,
        f if f < 11.0 => Band::B30m,
        f if f < 15.0 => Band::B20m,
        f if f < 19.0 => Band::B17m,
        f if f < 22.0 => Band::B15m,
        f if f < 25.0 => Band::B12m,
        f if f < 30.0 => Band::B10m,
        f if f < 60.0 => Band::B6m,
        f if f < 150.0 => Band::B2m,
        f if f < 450.0 => Band::B70cm,
        _ => Band::B40m,
    }
}

//! DX cluster spots
//!
//! Spots are ephemeral; they only ever seed a new contact draft. Raw spots
//! from a cluster feed are loosely shaped and get defaults here, once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ContactDraft;
use crate::adif::{infer_band, Mode};

/// A spot as delivered by a cluster feed (every field optional)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSpot {
    #[serde(alias = "dxCall")]
    pub dx_callsign: Option<String>,
    #[serde(alias = "freq")]
    pub frequency: Option<String>,
    pub mode: Option<String>,
    #[serde(alias = "spotter")]
    pub spotter_callsign: Option<String>,
    #[serde(alias = "time")]
    pub time_of_day: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DxSpot {
    pub id: String,
    pub dx_callsign: String,
    pub frequency_mhz: String,
    pub mode: Mode,
    pub spotter_callsign: String,
    pub time_of_day: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl DxSpot {
    /// Normalize a raw spot; `index` keeps ids unique within one batch
    pub fn from_raw(raw: RawSpot, index: usize, now: DateTime<Utc>) -> Self {
        let mode = raw
            .mode
            .as_deref()
            .and_then(|m| m.parse::<Mode>().ok())
            .unwrap_or(Mode::Ssb);

        Self {
            id: format!("live-{}-{}", now.timestamp_millis(), index),
            dx_callsign: filled(raw.dx_callsign, "UNKNOWN").to_uppercase(),
            frequency_mhz: filled(raw.frequency, "0.000"),
            mode,
            spotter_callsign: filled(raw.spotter_callsign, "SYS").to_uppercase(),
            time_of_day: raw
                .time_of_day
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| now.format("%H:%M").to_string()),
            comment: raw
                .comment
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        }
    }

    /// Pre-fill a logging form from this spot
    pub fn to_draft(&self) -> ContactDraft {
        ContactDraft {
            band: infer_band(&self.frequency_mhz),
            mode: self.mode,
            ..ContactDraft::for_callsign(self.dx_callsign.clone())
        }
    }
}

/// Normalize a batch of raw spots, preserving feed order
pub fn normalize_spots(raw: Vec<RawSpot>, now: DateTime<Utc>) -> Vec<DxSpot> {
    raw.into_iter()
        .enumerate()
        .map(|(i, s)| DxSpot::from_raw(s, i, now))
        .collect()
}

/// Case-insensitive substring filter on the DX callsign
pub fn filter_spots<'a>(spots: &'a [DxSpot], needle: &str) -> Vec<&'a DxSpot> {
    let needle = needle.trim().to_uppercase();
    spots
        .iter()
        .filter(|s| needle.is_empty() || s.dx_callsign.contains(&needle))
        .collect()
}

fn filled(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adif::Band;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 18, 42, 0).unwrap()
    }

    #[test]
    fn test_raw_spot_defaults() {
        let spot = DxSpot::from_raw(RawSpot::default(), 3, now());
        assert_eq!(spot.dx_callsign, "UNKNOWN");
        assert_eq!(spot.frequency_mhz, "0.000");
        assert_eq!(spot.mode, Mode::Ssb);
        assert_eq!(spot.spotter_callsign, "SYS");
        assert_eq!(spot.time_of_day, "18:42");
        assert!(spot.comment.is_none());
        assert!(spot.id.ends_with("-3"));
    }

    #[test]
    fn test_parse_cluster_json() {
        let json = r#"[
            {"dxCall": "ea8abc", "freq": "14.074", "mode": "FT8", "spotter": "IZ3MEZ", "time": "1840", "comment": "CQ"},
            {"dxCall": "JA1XYZ", "freq": "7.010", "mode": "CW", "spotter": "I2ABC"}
        ]"#;
        let raw: Vec<RawSpot> = serde_json::from_str(json).unwrap();
        let spots = normalize_spots(raw, now());
        assert_eq!(spots.len(), 2);
        assert_eq!(spots[0].dx_callsign, "EA8ABC");
        assert_eq!(spots[0].comment.as_deref(), Some("CQ"));
        assert_ne!(spots[0].id, spots[1].id);
    }

    #[test]
    fn test_spot_prefills_draft() {
        let spot = DxSpot::from_raw(
            RawSpot {
                dx_callsign: Some("EA8ABC".to_string()),
                frequency: Some("21.074".to_string()),
                mode: Some("ft8".to_string()),
                ..Default::default()
            },
            0,
            now(),
        );
        let draft = spot.to_draft();
        assert_eq!(draft.callsign, "EA8ABC");
        assert_eq!(draft.band, Band::B15m);
        assert_eq!(draft.mode, Mode::Ft8);
        assert_eq!(draft.rst_sent, "59");
    }

    #[test]
    fn test_filter_spots() {
        let raw = vec![
            RawSpot { dx_callsign: Some("EA8ABC".into()), ..Default::default() },
            RawSpot { dx_callsign: Some("JA1XYZ".into()), ..Default::default() },
        ];
        let spots = normalize_spots(raw, now());
        assert_eq!(filter_spots(&spots, "ea8").len(), 1);
        assert_eq!(filter_spots(&spots, "").len(), 2);
    }
}

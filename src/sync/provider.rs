//! External provider contracts and boundary normalization
//!
//! Directory lookup and remote logbook services are asynchronous and may
//! fail or hang; implementations live outside this crate (or in
//! `sync::file_provider` for the file-backed stand-ins). Whatever they return is
//! loosely shaped and is normalized here, once, before it reaches the
//! reconciliation engine.

use std::future::Future;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::adif::{Band, Mode};
use crate::error::{Error, ProviderError, Result};
use crate::geo::GridLocator;
use crate::qso::contact::{non_blank, non_empty_or};
use crate::qso::{Callsign, Contact, DEFAULT_RST};

/// Station details returned by a callsign directory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "qth")]
    pub location: String,
    #[serde(default, alias = "locator")]
    pub grid_locator: String,
    #[serde(default, alias = "image")]
    pub image_url: Option<String>,
}

/// Callsign directory (QRZ-style) lookup
pub trait DirectoryLookup: Send + Sync {
    fn lookup(
        &self,
        callsign: &Callsign,
    ) -> impl Future<Output = std::result::Result<Option<DirectoryEntry>, ProviderError>> + Send;
}

/// Remote logbook service
pub trait RemoteLogbook: Send + Sync {
    /// Every contact the remote side holds
    fn fetch_all(
        &self,
    ) -> impl Future<Output = std::result::Result<Vec<RemoteRecord>, ProviderError>> + Send;

    /// Upload contacts not yet on the remote side
    fn push_unsynced(
        &self,
        contacts: &[Contact],
    ) -> impl Future<Output = std::result::Result<(), ProviderError>> + Send;
}

/// A contact as a remote logbook reports it; every field may be missing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRecord {
    pub id: Option<String>,
    pub timestamp: Option<String>,
    #[serde(alias = "call")]
    pub callsign: Option<String>,
    pub rst_sent: Option<String>,
    pub rst_rcvd: Option<String>,
    pub band: Option<String>,
    pub mode: Option<String>,
    pub power: Option<String>,
    #[serde(alias = "name")]
    pub operator_name: Option<String>,
    #[serde(alias = "qth")]
    pub operator_location: Option<String>,
    #[serde(alias = "locator")]
    pub grid_locator: Option<String>,
    #[serde(alias = "potaRef")]
    pub park_reference: Option<String>,
    #[serde(alias = "sotaRef")]
    pub summit_reference: Option<String>,
    pub notes: Option<String>,
    #[serde(alias = "distance")]
    pub distance_km: Option<f64>,
    #[serde(alias = "profileImage")]
    pub profile_image_url: Option<String>,
}

impl From<&Contact> for RemoteRecord {
    fn from(c: &Contact) -> Self {
        Self {
            id: Some(c.id.clone()),
            timestamp: Some(c.timestamp.to_rfc3339()),
            callsign: Some(c.callsign.to_string()),
            rst_sent: Some(c.rst_sent.clone()),
            rst_rcvd: Some(c.rst_rcvd.clone()),
            band: Some(c.band.to_string()),
            mode: Some(c.mode.to_string()),
            power: Some(c.power.clone()),
            operator_name: Some(c.operator_name.clone()),
            operator_location: Some(c.operator_location.clone()),
            grid_locator: c.grid_locator.as_ref().map(|g| g.to_string()),
            park_reference: c.park_reference.clone(),
            summit_reference: c.summit_reference.clone(),
            notes: c.notes.clone(),
            distance_km: c.distance_km.map(f64::from),
            profile_image_url: c.profile_image_url.clone(),
        }
    }
}

impl RemoteRecord {
    /// Coerce into a strict contact flagged `synced`
    pub fn into_contact(self) -> Result<Contact> {
        let callsign = Callsign::parse(self.callsign.as_deref().unwrap_or_default())?;
        let timestamp = parse_timestamp(self.timestamp.as_deref().unwrap_or_default())
            .map_err(|e| Error::InvalidInput(format!("{}: {}", callsign, e)))?;
        let band = self
            .band
            .as_deref()
            .ok_or_else(|| Error::InvalidInput(format!("{}: missing band", callsign)))?
            .parse::<Band>()?;
        let mode = self
            .mode
            .as_deref()
            .ok_or_else(|| Error::InvalidInput(format!("{}: missing mode", callsign)))?
            .parse::<Mode>()?;

        let grid_locator = self
            .grid_locator
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .and_then(|g| GridLocator::parse(g).ok());

        // Records without an id get one derived from what identifies the QSO,
        // so repeated fetches of the same record agree
        let id = non_blank(self.id)
            .unwrap_or_else(|| format!("remote-{}-{}", callsign, timestamp.timestamp()));

        Ok(Contact {
            id,
            timestamp,
            callsign,
            rst_sent: non_empty_or(self.rst_sent.unwrap_or_default(), DEFAULT_RST),
            rst_rcvd: non_empty_or(self.rst_rcvd.unwrap_or_default(), DEFAULT_RST),
            band,
            mode,
            power: self.power.unwrap_or_default().trim().to_string(),
            operator_name: self.operator_name.unwrap_or_default().trim().to_string(),
            operator_location: self.operator_location.unwrap_or_default().trim().to_string(),
            grid_locator,
            park_reference: non_blank(self.park_reference),
            summit_reference: non_blank(self.summit_reference),
            notes: non_blank(self.notes),
            distance_km: self
                .distance_km
                .filter(|d| d.is_finite() && *d >= 0.0)
                .map(|d| d.round() as u32),
            audio_handle: None,
            profile_image_url: non_blank(self.profile_image_url),
            synced: true,
        })
    }
}

/// RFC 3339, or a bare "YYYY-MM-DD HH:MM:SS" / "YYYY-MM-DDTHH:MM:SS" taken as UTC
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::InvalidInput("missing timestamp".to_string()));
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(naive.and_utc());
        }
    }
    Err(Error::InvalidInput(format!("unrecognized timestamp '{}'", raw)))
}

/// Outcome of normalizing one remote batch
#[derive(Debug, Default)]
pub struct RemoteBatch {
    pub contacts: Vec<Contact>,
    pub skipped: usize,
    pub messages: Vec<String>,
}

/// Normalize a remote batch, skipping (and reporting) records that cannot be coerced
pub fn normalize_remote_records(records: Vec<RemoteRecord>) -> RemoteBatch {
    let mut batch = RemoteBatch::default();
    for record in records {
        match record.into_contact() {
            Ok(contact) => batch.contacts.push(contact),
            Err(e) => {
                log::warn!("Skipping remote record: {}", e);
                batch.skipped += 1;
                batch.messages.push(e.to_string());
            }
        }
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loose_record_normalized() {
        let json = r#"{
            "id": "q-1",
            "timestamp": "2026-01-03T15:26:00Z",
            "callsign": "w1aw",
            "rstSent": "57",
            "band": "20M",
            "mode": "usb",
            "name": "Hiram",
            "qth": "Newington",
            "locator": "fn31pr",
            "distance": 6543.6,
            "synced": false
        }"#;
        let record: RemoteRecord = serde_json::from_str(json).unwrap();
        let contact = record.into_contact().unwrap();
        assert_eq!(contact.id, "q-1");
        assert_eq!(contact.callsign.as_str(), "W1AW");
        assert_eq!(contact.rst_sent, "57");
        assert_eq!(contact.rst_rcvd, "59");
        assert_eq!(contact.band, Band::B20m);
        assert_eq!(contact.mode, Mode::Ssb);
        assert_eq!(contact.operator_location, "Newington");
        assert_eq!(contact.grid_locator.unwrap().as_str(), "FN31pr");
        assert_eq!(contact.distance_km, Some(6544));
        assert!(contact.synced);
    }

    #[test]
    fn test_timestamp_formats() {
        assert!(parse_timestamp("2026-01-03T15:26:00+01:00").is_ok());
        assert!(parse_timestamp("2026-01-03 15:26:00").is_ok());
        assert!(parse_timestamp("2026-01-03T15:26:00.250").is_ok());
        assert!(parse_timestamp("yesterday").is_err());
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn test_batch_skips_bad_records() {
        let records = vec![
            RemoteRecord {
                callsign: Some("K2ABC".into()),
                timestamp: Some("2026-01-03 10:00:00".into()),
                band: Some("40m".into()),
                mode: Some("CW".into()),
                ..Default::default()
            },
            RemoteRecord {
                callsign: Some("".into()),
                ..Default::default()
            },
            RemoteRecord {
                callsign: Some("N0CALL".into()),
                timestamp: Some("2026-01-03 10:00:00".into()),
                band: Some("11m".into()),
                mode: Some("CW".into()),
                ..Default::default()
            },
        ];
        let batch = normalize_remote_records(records);
        assert_eq!(batch.contacts.len(), 1);
        assert_eq!(batch.skipped, 2);
        assert_eq!(batch.messages.len(), 2);
        assert!(!batch.contacts[0].id.is_empty());
    }

    #[test]
    fn test_missing_id_is_stable_across_fetches() {
        let record = RemoteRecord {
            callsign: Some("k2abc".into()),
            timestamp: Some("2026-01-03T10:00:00Z".into()),
            band: Some("40m".into()),
            mode: Some("CW".into()),
            ..Default::default()
        };
        let first = record.clone().into_contact().unwrap();
        let second = record.into_contact().unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.id, "remote-K2ABC-1767434400");
    }

    #[test]
    fn test_contact_roundtrips_through_remote_record() {
        let contact = crate::qso::ContactDraft::for_callsign("IZ2ABC")
            .into_contact(Utc::now())
            .unwrap();
        let back = RemoteRecord::from(&contact).into_contact().unwrap();
        assert_eq!(back.id, contact.id);
        assert_eq!(back.timestamp, contact.timestamp);
        assert!(back.synced);
    }
}

//! Contact (QSO) record
//!
//! A contact is immutable once created, apart from its `synced` flag and an
//! optional audio attachment. Domain fields are never edited in place; a
//! correction means deleting and re-logging.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::adif::{Band, Mode};
use crate::error::{Error, Result};
use crate::geo::GridLocator;

/// Default signal report for phone contacts
pub const DEFAULT_RST: &str = "59";
pub const DEFAULT_POWER: &str = "100W";

fn default_rst() -> String {
    DEFAULT_RST.to_string()
}

/// An amateur radio callsign, stored upper-case
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Callsign(String);

impl Callsign {
    pub fn parse(raw: &str) -> Result<Self> {
        let call = raw.trim();
        if call.is_empty() {
            return Err(Error::InvalidInput("callsign is empty".to_string()));
        }
        if call.chars().any(char::is_whitespace) {
            return Err(Error::InvalidInput(format!(
                "callsign '{}' contains whitespace",
                call
            )));
        }
        Ok(Self(call.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison
    pub fn matches(&self, other: &Callsign) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl std::fmt::Display for Callsign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Callsign {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Callsign> for String {
    fn from(call: Callsign) -> Self {
        call.0
    }
}

/// A logged contact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub callsign: Callsign,
    #[serde(default = "default_rst")]
    pub rst_sent: String,
    #[serde(default = "default_rst")]
    pub rst_rcvd: String,
    pub band: Band,
    pub mode: Mode,
    #[serde(default)]
    pub power: String,
    #[serde(default)]
    pub operator_name: String,
    #[serde(default)]
    pub operator_location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_locator: Option<GridLocator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub park_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summit_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub synced: bool,
}

impl Contact {
    /// Same contact, flagged as present on the remote logbook
    pub fn into_synced(mut self) -> Self {
        self.synced = true;
        self
    }
}

/// Unvalidated contact as entered on the logging form
#[derive(Debug, Clone, PartialEq)]
pub struct ContactDraft {
    pub callsign: String,
    pub rst_sent: String,
    pub rst_rcvd: String,
    pub band: Band,
    pub mode: Mode,
    pub power: String,
    pub operator_name: String,
    pub operator_location: String,
    pub grid_locator: String,
    pub park_reference: Option<String>,
    pub summit_reference: Option<String>,
    pub notes: Option<String>,
    pub distance_km: Option<u32>,
    pub audio_handle: Option<String>,
    pub profile_image_url: Option<String>,
}

impl Default for ContactDraft {
    fn default() -> Self {
        Self {
            callsign: String::new(),
            rst_sent: default_rst(),
            rst_rcvd: default_rst(),
            band: Band::B40m,
            mode: Mode::Ssb,
            power: DEFAULT_POWER.to_string(),
            operator_name: String::new(),
            operator_location: String::new(),
            grid_locator: String::new(),
            park_reference: None,
            summit_reference: None,
            notes: None,
            distance_km: None,
            audio_handle: None,
            profile_image_url: None,
        }
    }
}

impl ContactDraft {
    pub fn for_callsign(callsign: impl Into<String>) -> Self {
        Self {
            callsign: callsign.into(),
            ..Default::default()
        }
    }

    /// Validate the draft into a new local (unsynced) contact
    ///
    /// An unparsable locator does not abort logging; it is dropped with a warning.
    pub fn into_contact(self, timestamp: DateTime<Utc>) -> Result<Contact> {
        let callsign = Callsign::parse(&self.callsign)?;

        let grid_locator = match self.grid_locator.trim() {
            "" => None,
            raw => match GridLocator::parse(raw) {
                Ok(grid) => Some(grid),
                Err(e) => {
                    log::warn!("Dropping locator for {}: {}", callsign, e);
                    None
                }
            },
        };

        Ok(Contact {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp,
            callsign,
            rst_sent: non_empty_or(self.rst_sent, DEFAULT_RST),
            rst_rcvd: non_empty_or(self.rst_rcvd, DEFAULT_RST),
            band: self.band,
            mode: self.mode,
            power: self.power.trim().to_string(),
            operator_name: self.operator_name.trim().to_string(),
            operator_location: self.operator_location.trim().to_string(),
            grid_locator,
            park_reference: non_blank(self.park_reference),
            summit_reference: non_blank(self.summit_reference),
            notes: non_blank(self.notes),
            distance_km: self.distance_km,
            audio_handle: non_blank(self.audio_handle),
            profile_image_url: non_blank(self.profile_image_url),
            synced: false,
        })
    }
}

pub(crate) fn non_empty_or(value: String, default: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 3, 15, 26, 0).unwrap()
    }

    #[test]
    fn test_callsign_normalized_upper() {
        let call = Callsign::parse("  iz2abc/p ").unwrap();
        assert_eq!(call.as_str(), "IZ2ABC/P");
        assert!(call.matches(&Callsign::parse("IZ2ABC/P").unwrap()));
        assert!(Callsign::parse("   ").is_err());
        assert!(Callsign::parse("W1 AW").is_err());
    }

    #[test]
    fn test_draft_defaults() {
        let contact = ContactDraft::for_callsign("w1aw").into_contact(ts()).unwrap();
        assert_eq!(contact.callsign.as_str(), "W1AW");
        assert_eq!(contact.rst_sent, "59");
        assert_eq!(contact.rst_rcvd, "59");
        assert_eq!(contact.band, Band::B40m);
        assert_eq!(contact.mode, Mode::Ssb);
        assert_eq!(contact.power, "100W");
        assert!(!contact.synced);
        assert!(uuid::Uuid::parse_str(&contact.id).is_ok());
    }

    #[test]
    fn test_draft_rejects_empty_callsign() {
        let err = ContactDraft::default().into_contact(ts()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_draft_bad_locator_falls_back() {
        let draft = ContactDraft {
            grid_locator: "XYZ".to_string(),
            park_reference: Some("  ".to_string()),
            ..ContactDraft::for_callsign("K2ABC")
        };
        let contact = draft.into_contact(ts()).unwrap();
        assert!(contact.grid_locator.is_none());
        assert!(contact.park_reference.is_none());
    }

    #[test]
    fn test_contact_json_roundtrip_is_lossless() {
        let draft = ContactDraft {
            grid_locator: "jn45ol".to_string(),
            summit_reference: Some("I/LO-123".to_string()),
            distance_km: Some(42),
            audio_handle: Some("blob:1".to_string()),
            ..ContactDraft::for_callsign("IK2XYZ")
        };
        let contact = draft.into_contact(ts()).unwrap();
        let json = serde_json::to_string(&contact).unwrap();
        assert!(json.contains("\"gridLocator\":\"JN45ol\""));
        let back: Contact = serde_json::from_str(&json).unwrap();
        assert_eq!(back, contact);
    }
}

// ADIF Parser
// Reads ADIF text into loosely-typed records, then validates records into
// local contacts for import.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::bands::{freq_to_band, Band};
use super::modes::Mode;
use super::time::parse_adif_datetime;
use crate::error::{Error, Result};
use crate::geo::GridLocator;
use crate::qso::{Callsign, Contact, DEFAULT_RST};

/// A single ADIF record (one QSO)
#[derive(Debug, Clone, Default)]
pub struct AdifRecord {
    /// All fields as key-value pairs (uppercase keys)
    pub fields: HashMap<String, String>,
}

impl AdifRecord {
    pub fn new() -> Self {
        Self { fields: HashMap::new() }
    }

    /// Get a field value (case-insensitive lookup); empty values count as absent
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(&key.to_uppercase())
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
    }

    pub fn has(&self, key: &str) -> bool {
        self.fields.contains_key(&key.to_uppercase())
    }

    pub fn call(&self) -> Option<&str> { self.get("CALL") }
    pub fn band(&self) -> Option<&str> { self.get("BAND") }
    pub fn mode(&self) -> Option<&str> { self.get("MODE") }
    pub fn qso_date(&self) -> Option<&str> { self.get("QSO_DATE") }
    pub fn time_on(&self) -> Option<&str> { self.get("TIME_ON") }
    pub fn gridsquare(&self) -> Option<&str> { self.get("GRIDSQUARE") }
    pub fn freq(&self) -> Option<f64> {
        self.get("FREQ").and_then(|s| s.parse().ok())
    }

    /// Timestamp from QSO_DATE + TIME_ON
    pub fn timestamp(&self) -> Result<DateTime<Utc>> {
        let date = self
            .qso_date()
            .ok_or_else(|| Error::InvalidInput("record missing QSO_DATE".to_string()))?;
        let time = self
            .time_on()
            .ok_or_else(|| Error::InvalidInput("record missing TIME_ON".to_string()))?;
        parse_adif_datetime(date, time)
    }

    /// Validate into a local contact (synced=false)
    ///
    /// BAND falls back to FREQ when absent. An invalid GRIDSQUARE is dropped,
    /// not fatal.
    pub fn to_contact(&self) -> Result<Contact> {
        let callsign = Callsign::parse(self.call().unwrap_or_default())?;
        let timestamp = self.timestamp()?;

        let band = match self.band() {
            Some(b) => b.parse::<Band>()?,
            None => self.freq().and_then(freq_to_band).ok_or_else(|| {
                Error::InvalidInput(format!("record for {} has no usable BAND/FREQ", callsign))
            })?,
        };
        let mode = self
            .mode()
            .ok_or_else(|| Error::InvalidInput(format!("record for {} missing MODE", callsign)))?
            .parse::<Mode>()?;

        let grid_locator = self.gridsquare().and_then(|g| GridLocator::parse(g).ok());
        let text = |key: &str| self.get(key).map(|s| s.to_string());

        Ok(Contact {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp,
            callsign,
            rst_sent: text("RST_SENT").unwrap_or_else(|| DEFAULT_RST.to_string()),
            rst_rcvd: text("RST_RCVD").unwrap_or_else(|| DEFAULT_RST.to_string()),
            band,
            mode,
            power: text("TX_PWR").unwrap_or_default(),
            operator_name: text("NAME").unwrap_or_default(),
            operator_location: text("QTH").unwrap_or_default(),
            grid_locator,
            park_reference: text("POTA_REF"),
            summit_reference: text("SOTA_REF"),
            notes: text("COMMENT"),
            distance_km: text("DISTANCE").and_then(|d| d.parse::<f64>().ok()).map(|d| d.round().max(0.0) as u32),
            audio_handle: None,
            profile_image_url: None,
            synced: false,
        })
    }
}

/// Parsed ADIF file
#[derive(Debug, Clone, Default)]
pub struct AdifFile {
    /// Header fields (before <EOH>)
    pub header: HashMap<String, String>,
    /// QSO records
    pub records: Vec<AdifRecord>,
}

/// Parse an ADIF string into records
///
/// Records without a CALL field are skipped.
pub fn parse_adif(content: &str) -> AdifFile {
    let mut file = AdifFile::default();

    // ASCII uppercasing keeps byte offsets aligned with `content`
    let content_upper = content.to_ascii_uppercase();
    let body_start = match content_upper.find("<EOH>") {
        Some(eoh_pos) => {
            parse_fields_into(&content[..eoh_pos], &mut file.header);
            eoh_pos + 5
        }
        None => 0,
    };

    let body = &content[body_start..];
    let body_upper = &content_upper[body_start..];
    let mut current_pos = 0;

    while let Some(eor_offset) = body_upper[current_pos..].find("<EOR>") {
        let record_end = current_pos + eor_offset;
        let record_str = &body[current_pos..record_end];

        if !record_str.trim().is_empty() {
            let mut record = AdifRecord::new();
            parse_fields_into(record_str, &mut record.fields);
            if record.has("CALL") {
                file.records.push(record);
            }
        }

        current_pos = record_end + 5;
    }

    file
}

/// Enumerated fields some loggers annotate as "CODE // description"
const COMMENTED_FIELDS: [&str; 2] = ["STATE", "CNTY"];

/// Parse ADIF fields from a string section into a HashMap
fn parse_fields_into(content: &str, map: &mut HashMap<String, String>) {
    let mut pos = 0;
    let bytes = content.as_bytes();

    while pos < bytes.len() {
        match bytes[pos..].iter().position(|&b| b == b'<') {
            Some(offset) => pos += offset + 1,
            None => break,
        }

        let field_end = match bytes[pos..].iter().position(|&b| b == b'>') {
            Some(offset) => pos + offset,
            None => break,
        };

        let field_spec = &content[pos..field_end];
        pos = field_end + 1;

        // NAME:LENGTH or NAME:LENGTH:TYPE; bare NAME for control tags
        let mut parts = field_spec.split(':');
        let field_name = parts.next().unwrap_or_default().trim().to_uppercase();
        if field_name.is_empty() || field_name == "EOH" || field_name == "EOR" {
            continue;
        }
        let length: usize = parts.next().and_then(|l| l.trim().parse().ok()).unwrap_or(0);

        if length == 0 {
            map.insert(field_name, String::new());
            continue;
        }

        // Length counts bytes; a length that splits a UTF-8 character is malformed
        match pos.checked_add(length).and_then(|end| content.get(pos..end)) {
            Some(value) => {
                let clean = if COMMENTED_FIELDS.contains(&field_name.as_str()) {
                    // Strip trailing comments ("CA // California")
                    value.split(" //").next().unwrap_or(value).trim()
                } else {
                    value.trim()
                };
                map.insert(field_name, clean.to_string());
                pos += length;
            }
            None => {
                log::warn!("Skipping malformed ADIF field {} (length {})", field_name, length);
            }
        }
    }
}

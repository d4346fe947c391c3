//! File-backed providers
//!
//! Stand-ins for the remote logbook and callsign directory that read and
//! write JSON files. Used by the CLI and the session tests; a real service
//! client implements the same traits.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::provider::{DirectoryEntry, DirectoryLookup, RemoteLogbook, RemoteRecord};
use crate::error::ProviderError;
use crate::qso::{Callsign, Contact};

/// Remote logbook kept as a JSON array of records in one file
#[derive(Debug, Clone)]
pub struct JsonFileRemote {
    path: PathBuf,
}

impl JsonFileRemote {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_records(&self) -> Result<Vec<RemoteRecord>, ProviderError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ProviderError::Network(e.to_string())),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes).map_err(|e| ProviderError::Malformed(e.to_string()))
    }
}

impl RemoteLogbook for JsonFileRemote {
    async fn fetch_all(&self) -> Result<Vec<RemoteRecord>, ProviderError> {
        let records = self.read_records().await?;
        log::debug!("Fetched {} records from {}", records.len(), self.path.display());
        Ok(records)
    }

    async fn push_unsynced(&self, contacts: &[Contact]) -> Result<(), ProviderError> {
        let mut records = self.read_records().await?;
        let before = records.len();

        for contact in contacts {
            let known = records
                .iter()
                .any(|r| r.id.as_deref() == Some(contact.id.as_str()));
            if !known {
                records.push(RemoteRecord::from(contact));
            }
        }

        let json = serde_json::to_vec_pretty(&records)
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        log::debug!(
            "Pushed {} new records to {}",
            records.len() - before,
            self.path.display()
        );
        Ok(())
    }
}

/// Callsign directory loaded from a JSON object keyed by callsign
#[derive(Debug, Clone, Default)]
pub struct JsonFileDirectory {
    entries: HashMap<String, DirectoryEntry>,
}

impl JsonFileDirectory {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let bytes = tokio::fs::read(path.as_ref())
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        let raw: HashMap<String, DirectoryEntry> =
            serde_json::from_slice(&bytes).map_err(|e| ProviderError::Malformed(e.to_string()))?;
        Ok(Self::from_entries(raw))
    }

    pub fn from_entries(entries: HashMap<String, DirectoryEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(call, entry)| (call.trim().to_uppercase(), entry))
                .collect(),
        }
    }
}

impl DirectoryLookup for JsonFileDirectory {
    async fn lookup(&self, callsign: &Callsign) -> Result<Option<DirectoryEntry>, ProviderError> {
        Ok(self.entries.get(callsign.as_str()).cloned())
    }
}

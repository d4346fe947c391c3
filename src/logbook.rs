//! Logbook state
//!
//! Owns the contact log, the settings and the store they persist to. Every
//! mutation writes through to the store before the in-memory state changes,
//! so a failed write leaves the logbook as it was.
//!
//! The logbook is a plain value; concurrent callers share it behind a
//! `tokio::sync::Mutex` (see `sync::session`).

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::adif::{self, ImportResult};
use crate::error::{Error, Result};
use crate::geo::{distance_km, Coordinate, GridLocator};
use crate::qso::{find_duplicate, todays_contacts, Contact, ContactDraft};
use crate::reference::{builtin_parks, builtin_summits, find_nearest_reference, Reference};
use crate::settings::Settings;
use crate::store::{load_json, save_json, KeyValueStore, CONTACTS_KEY, SETTINGS_KEY};
use crate::sync::{merge_remote_import, DirectoryEntry, ReconciliationResult};

/// Result of trying to log a contact
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "contact", rename_all = "camelCase")]
pub enum LogOutcome {
    Logged(Contact),
    /// Not saved: an existing contact already covers it. Retry with `force`.
    Duplicate(Contact),
}

/// Nearest park and summit for a position, as enabled in the settings
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceSuggestion {
    pub park: Option<Reference>,
    pub summit: Option<Reference>,
}

pub struct Logbook<S: KeyValueStore> {
    store: S,
    contacts: Vec<Contact>,
    settings: Settings,
    parks: Vec<Reference>,
    summits: Vec<Reference>,
}

impl<S: KeyValueStore> Logbook<S> {
    /// Load contacts and settings from `store`; missing keys start empty
    pub async fn open(store: S) -> Result<Self> {
        let mut contacts: Vec<Contact> = load_json(&store, CONTACTS_KEY).await?.unwrap_or_default();
        let settings: Settings = load_json(&store, SETTINGS_KEY).await?.unwrap_or_default();

        // Logs written by older versions may not be sorted
        contacts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        log::info!(
            "Logbook loaded: {} contacts ({} unsynced)",
            contacts.len(),
            contacts.iter().filter(|c| !c.synced).count()
        );
        log::debug!("Settings: {:?}", settings.redacted());

        Ok(Self {
            store,
            contacts,
            settings,
            parks: builtin_parks(),
            summits: builtin_summits(),
        })
    }

    /// Replace the built-in park and summit catalogs
    pub fn with_catalogs(mut self, parks: Vec<Reference>, summits: Vec<Reference>) -> Self {
        self.parks = parks;
        self.summits = summits;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All contacts, newest first
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn today(&self, now: DateTime<Utc>) -> Vec<&Contact> {
        todays_contacts(&self.contacts, now)
    }

    pub fn unsynced_count(&self) -> usize {
        self.contacts.iter().filter(|c| !c.synced).count()
    }

    pub async fn update_settings(&mut self, settings: Settings) -> Result<()> {
        save_json(&self.store, SETTINGS_KEY, &settings).await?;
        log::info!("Settings updated: {:?}", settings.redacted());
        self.settings = settings;
        Ok(())
    }

    /// Validate and log a contact at `timestamp`
    ///
    /// Unless `force` is set, a contact that duplicates an existing one is
    /// not saved and the existing one is returned instead. A missing
    /// distance is filled from the locator and the home position.
    pub async fn log_contact(
        &mut self,
        draft: ContactDraft,
        timestamp: DateTime<Utc>,
        force: bool,
    ) -> Result<LogOutcome> {
        let mut contact = draft.into_contact(timestamp)?;

        if !force {
            if let Some(existing) = find_duplicate(&self.contacts, &contact.callsign, timestamp) {
                log::info!(
                    "Possible duplicate of {} logged at {}",
                    existing.callsign,
                    existing.timestamp
                );
                return Ok(LogOutcome::Duplicate(existing.clone()));
            }
        }

        if contact.distance_km.is_none() {
            if let Some(grid) = &contact.grid_locator {
                contact.distance_km = Some(distance_km(self.settings.home_coordinate(), grid.center()));
            }
        }

        let mut next = self.contacts.clone();
        let at = next.partition_point(|c| c.timestamp > contact.timestamp);
        next.insert(at, contact.clone());
        self.commit(next).await?;

        log::info!("Logged {} on {} {}", contact.callsign, contact.band, contact.mode);
        Ok(LogOutcome::Logged(contact))
    }

    /// Remove a contact by id; `false` when no such contact exists
    pub async fn delete_contact(&mut self, id: &str) -> Result<bool> {
        if !self.contacts.iter().any(|c| c.id == id) {
            return Ok(false);
        }
        let next: Vec<Contact> = self.contacts.iter().filter(|c| c.id != id).cloned().collect();
        self.commit(next).await?;
        log::info!("Deleted contact {}", id);
        Ok(true)
    }

    /// Remove every contact; returns how many were removed
    pub async fn clear(&mut self) -> Result<usize> {
        let removed = self.contacts.len();
        self.commit(Vec::new()).await?;
        log::info!("Cleared {} contacts", removed);
        Ok(removed)
    }

    /// Fold a normalized remote batch into the log and persist the result
    pub async fn apply_remote(&mut self, remote: &[Contact]) -> Result<ReconciliationResult> {
        let result = merge_remote_import(&self.contacts, remote);
        self.commit(result.contacts.clone()).await?;
        Ok(result)
    }

    /// Replace the whole log with `contacts`, kept newest first
    pub async fn replace_contacts(&mut self, mut contacts: Vec<Contact>) -> Result<()> {
        contacts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        self.commit(contacts).await
    }

    /// Import an ADIF document, merging it like a local batch
    ///
    /// Records that duplicate existing contacts are dropped; imported
    /// contacts stay unsynced.
    pub async fn import_adif(&mut self, content: &str) -> Result<ImportResult> {
        let (incoming, mut result) = adif::import_contacts(content);

        let mut next = self.contacts.clone();
        let mut added = 0;
        for contact in incoming {
            if find_duplicate(&next, &contact.callsign, contact.timestamp).is_some() {
                result
                    .error_messages
                    .push(format!("{}: duplicate of a logged contact", contact.callsign));
                continue;
            }
            next.push(contact);
            added += 1;
        }
        result.imported = added;

        next.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        self.commit(next).await?;
        Ok(result)
    }

    pub fn export_adif(&self) -> Result<String> {
        adif::export_contacts(&self.contacts)
    }

    /// Nearest enabled park and summit within the configured threshold
    pub fn suggest_references(&self, position: Coordinate) -> Result<ReferenceSuggestion> {
        let threshold = self.settings.reference_threshold_deg;
        let mut suggestion = ReferenceSuggestion::default();
        if self.settings.parks_enabled {
            suggestion.park = find_nearest_reference(&self.parks, position, threshold)?.cloned();
        }
        if self.settings.summits_enabled {
            suggestion.summit = find_nearest_reference(&self.summits, position, threshold)?.cloned();
        }
        Ok(suggestion)
    }

    /// Fill empty park/summit fields of `draft` from the operating position
    pub fn fill_references(&self, draft: &mut ContactDraft, position: Coordinate) -> Result<()> {
        let suggestion = self.suggest_references(position)?;
        if draft.park_reference.is_none() {
            draft.park_reference = suggestion.park.map(|p| p.id);
        }
        if draft.summit_reference.is_none() {
            draft.summit_reference = suggestion.summit.map(|s| s.id);
        }
        Ok(())
    }

    /// Persist `next`, then adopt it
    async fn commit(&mut self, next: Vec<Contact>) -> Result<()> {
        save_json(&self.store, CONTACTS_KEY, &next)
            .await
            .map_err(|e| Error::Store(format!("failed to save logbook: {}", e)))?;
        self.contacts = next;
        Ok(())
    }
}

/// Copy directory details into a draft and compute the distance from `home`
///
/// Only fields the directory actually provides are overwritten.
pub fn apply_directory_entry(draft: &mut ContactDraft, entry: &DirectoryEntry, home: Coordinate) {
    if !entry.name.trim().is_empty() {
        draft.operator_name = entry.name.trim().to_string();
    }
    if !entry.location.trim().is_empty() {
        draft.operator_location = entry.location.trim().to_string();
    }
    if let Some(url) = entry.image_url.as_deref().filter(|u| !u.trim().is_empty()) {
        draft.profile_image_url = Some(url.to_string());
    }
    match GridLocator::parse(&entry.grid_locator) {
        Ok(grid) => {
            draft.distance_km = Some(distance_km(home, grid.center()));
            draft.grid_locator = grid.to_string();
        }
        Err(_) if entry.grid_locator.trim().is_empty() => {}
        Err(e) => log::warn!("Directory returned an unusable locator: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 18, 10, 0, 0).unwrap()
    }

    async fn logbook() -> Logbook<MemoryStore> {
        Logbook::open(MemoryStore::new()).await.unwrap()
    }

    #[tokio::test]
    async fn test_log_and_reload() {
        let mut book = logbook().await;
        book.log_contact(ContactDraft::for_callsign("W1AW"), t0(), false)
            .await
            .unwrap();
        book.log_contact(ContactDraft::for_callsign("K2ABC"), t0() + Duration::hours(1), false)
            .await
            .unwrap();

        let reopened = Logbook::open(book.store).await.unwrap();
        let calls: Vec<&str> = reopened.contacts().iter().map(|c| c.callsign.as_str()).collect();
        assert_eq!(calls, vec!["K2ABC", "W1AW"]);
        assert_eq!(reopened.unsynced_count(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_warning_and_force() {
        let mut book = logbook().await;
        book.log_contact(ContactDraft::for_callsign("W1AW"), t0(), false)
            .await
            .unwrap();

        let outcome = book
            .log_contact(ContactDraft::for_callsign("w1aw"), t0() + Duration::seconds(30), false)
            .await
            .unwrap();
        assert!(matches!(outcome, LogOutcome::Duplicate(_)));
        assert_eq!(book.contacts().len(), 1);

        let outcome = book
            .log_contact(ContactDraft::for_callsign("w1aw"), t0() + Duration::seconds(30), true)
            .await
            .unwrap();
        assert!(matches!(outcome, LogOutcome::Logged(_)));
        assert_eq!(book.contacts().len(), 2);
    }

    #[tokio::test]
    async fn test_distance_filled_from_locator() {
        let mut book = logbook().await;
        let mut settings = book.settings().clone();
        settings.my_locator = "JN61".to_string();
        book.update_settings(settings).await.unwrap();

        let mut draft = ContactDraft::for_callsign("IZ2ABC");
        draft.grid_locator = "JN45".to_string();
        let outcome = book.log_contact(draft, t0(), false).await.unwrap();
        let LogOutcome::Logged(contact) = outcome else {
            panic!("expected a logged contact");
        };
        assert_eq!(contact.distance_km, Some(549));
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let mut book = logbook().await;
        let LogOutcome::Logged(first) = book
            .log_contact(ContactDraft::for_callsign("W1AW"), t0(), false)
            .await
            .unwrap()
        else {
            panic!("expected a logged contact");
        };
        book.log_contact(ContactDraft::for_callsign("K2ABC"), t0(), false)
            .await
            .unwrap();

        assert!(book.delete_contact(&first.id).await.unwrap());
        assert!(!book.delete_contact(&first.id).await.unwrap());
        assert_eq!(book.contacts().len(), 1);

        assert_eq!(book.clear().await.unwrap(), 1);
        assert!(book.contacts().is_empty());
    }

    #[tokio::test]
    async fn test_adif_import_skips_duplicates() {
        let mut book = logbook().await;
        let adif = "<CALL:4>W1AW <QSO_DATE:8>20260418 <TIME_ON:6>100000 <BAND:3>20m <MODE:2>CW <EOR>\n\
                    <CALL:4>W1AW <QSO_DATE:8>20260418 <TIME_ON:6>100020 <BAND:3>20m <MODE:2>CW <EOR>\n\
                    <CALL:5>K2ABC <QSO_DATE:8>20260418 <TIME_ON:4>1100 <BAND:3>40m <MODE:3>FT8 <EOR>\n";
        let result = book.import_adif(adif).await.unwrap();
        assert_eq!(result.total_records, 3);
        assert_eq!(result.imported, 2);
        assert_eq!(book.contacts().len(), 2);
        assert_eq!(book.contacts()[0].callsign.as_str(), "K2ABC");

        let exported = book.export_adif().unwrap();
        assert!(exported.contains("<CALL:4>W1AW"));
    }

    #[tokio::test]
    async fn test_export_empty_log_rejected() {
        let book = logbook().await;
        assert!(matches!(book.export_adif(), Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_reference_suggestions_follow_settings() {
        let mut book = logbook().await;
        let stelvio = Coordinate::new(46.55, 10.45).unwrap();

        let mut draft = ContactDraft::for_callsign("IZ2ABC");
        book.fill_references(&mut draft, stelvio).unwrap();
        assert_eq!(draft.park_reference.as_deref(), Some("I-0123"));
        assert!(draft.summit_reference.is_none());

        let mut settings = book.settings().clone();
        settings.parks_enabled = false;
        book.update_settings(settings).await.unwrap();
        let suggestion = book.suggest_references(stelvio).unwrap();
        assert!(suggestion.park.is_none());
    }

    #[tokio::test]
    async fn test_custom_catalogs_replace_builtin() {
        let acadia = Reference::new("K-0001", "Acadia", Coordinate::new(44.35, -68.21).unwrap());
        let book = logbook().await.with_catalogs(vec![acadia], Vec::new());

        let near_acadia = Coordinate::new(44.40, -68.25).unwrap();
        let suggestion = book.suggest_references(near_acadia).unwrap();
        assert_eq!(suggestion.park.map(|p| p.id).as_deref(), Some("K-0001"));
        assert!(suggestion.summit.is_none());

        let stelvio = Coordinate::new(46.55, 10.45).unwrap();
        assert!(book.suggest_references(stelvio).unwrap().park.is_none());
    }

    #[tokio::test]
    async fn test_today_filter() {
        let mut book = logbook().await;
        book.log_contact(ContactDraft::for_callsign("W1AW"), t0(), false)
            .await
            .unwrap();
        book.log_contact(ContactDraft::for_callsign("K2ABC"), t0() - Duration::days(1), false)
            .await
            .unwrap();
        let today = book.today(t0() + Duration::hours(2));
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].callsign.as_str(), "W1AW");
    }

    #[test]
    fn test_apply_directory_entry() {
        let mut draft = ContactDraft::for_callsign("IZ2ABC");
        let entry = DirectoryEntry {
            name: "Mario Rossi".to_string(),
            location: "Milano".to_string(),
            grid_locator: "jn45ol".to_string(),
            image_url: Some("https://example.org/iz2abc.jpg".to_string()),
        };
        let home = Coordinate::new(41.8719, 12.5674).unwrap();
        apply_directory_entry(&mut draft, &entry, home);
        assert_eq!(draft.operator_name, "Mario Rossi");
        assert_eq!(draft.grid_locator, "JN45ol");
        assert!(draft.distance_km.is_some());
        assert!(draft.profile_image_url.is_some());

        let mut untouched = ContactDraft::for_callsign("K2ABC");
        untouched.operator_name = "Kept".to_string();
        apply_directory_entry(&mut untouched, &DirectoryEntry::default(), home);
        assert_eq!(untouched.operator_name, "Kept");
        assert!(untouched.distance_km.is_none());
    }
}

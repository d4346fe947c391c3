//! Sync sessions against external providers
//!
//! Every provider call is bounded by the configured timeout. An inbound
//! import fetches without holding the logbook lock and merges against the
//! log as it is when the batch arrives, so contacts logged meanwhile are
//! kept. An outbound push holds the lock until the remote side answers, so
//! exactly the contacts that were sent get flagged synced.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex;

use super::merge::{mark_synced_after_outbound_sync, pending_sync};
use super::provider::{normalize_remote_records, DirectoryEntry, DirectoryLookup, RemoteLogbook};
use crate::error::{Error, ProviderError, Result};
use crate::geo::Coordinate;
use crate::logbook::{apply_directory_entry, Logbook};
use crate::qso::{Callsign, ContactDraft};
use crate::store::KeyValueStore;

/// Callsigns shorter than this are not worth a directory query
pub const MIN_LOOKUP_LEN: usize = 3;

/// Counters from one inbound import
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub fetched: usize,
    pub skipped: usize,
    pub imported: usize,
    pub newly_synced: usize,
    pub total: usize,
}

async fn with_timeout<T>(
    secs: u64,
    fut: impl Future<Output = std::result::Result<T, ProviderError>>,
) -> Result<T> {
    match tokio::time::timeout(Duration::from_secs(secs), fut).await {
        Ok(result) => result.map_err(Error::from),
        Err(_) => Err(Error::Timeout(secs)),
    }
}

/// Fetch the remote logbook and merge it into the local one
pub async fn import_remote<S, R>(logbook: &Mutex<Logbook<S>>, remote: &R) -> Result<ImportReport>
where
    S: KeyValueStore,
    R: RemoteLogbook,
{
    let timeout_secs = {
        let book = logbook.lock().await;
        book.settings().require_api_key()?;
        book.settings().provider_timeout_secs
    };

    let records = with_timeout(timeout_secs, remote.fetch_all()).await?;
    let fetched = records.len();
    let batch = normalize_remote_records(records);

    let mut book = logbook.lock().await;
    let result = book.apply_remote(&batch.contacts).await?;

    let report = ImportReport {
        fetched,
        skipped: batch.skipped,
        imported: result.imported,
        newly_synced: result.newly_synced,
        total: result.contacts.len(),
    };
    log::info!(
        "Remote import: {} fetched, {} skipped, {} new, {} newly synced, {} total",
        report.fetched,
        report.skipped,
        report.imported,
        report.newly_synced,
        report.total
    );
    Ok(report)
}

/// Push unsynced contacts and flag them synced once the remote accepts them
///
/// Returns how many contacts were pushed. On failure the log is unchanged.
pub async fn push_unsynced<S, R>(logbook: &Mutex<Logbook<S>>, remote: &R) -> Result<usize>
where
    S: KeyValueStore,
    R: RemoteLogbook,
{
    let mut book = logbook.lock().await;
    book.settings().require_api_key()?;

    let pending = pending_sync(book.contacts());
    if pending.is_empty() {
        log::debug!("Nothing to push");
        return Ok(0);
    }

    let timeout_secs = book.settings().provider_timeout_secs;
    if let Err(e) = with_timeout(timeout_secs, remote.push_unsynced(&pending)).await {
        log::warn!("Push of {} contacts failed: {}", pending.len(), e);
        return Err(e);
    }

    let marked = mark_synced_after_outbound_sync(book.contacts());
    book.replace_contacts(marked).await?;
    log::info!("Pushed {} contacts", pending.len());
    Ok(pending.len())
}

/// Look up a callsign in the directory
///
/// Returns `Ok(None)` for callsigns too short to query or unknown to the
/// directory.
pub async fn lookup_station<D>(
    directory: &D,
    callsign: &str,
    timeout_secs: u64,
) -> Result<Option<DirectoryEntry>>
where
    D: DirectoryLookup,
{
    if callsign.trim().chars().count() < MIN_LOOKUP_LEN {
        return Ok(None);
    }
    let callsign = Callsign::parse(callsign)?;
    let entry = with_timeout(timeout_secs, directory.lookup(&callsign)).await?;
    match &entry {
        Some(_) => log::debug!("Directory hit for {}", callsign),
        None => log::debug!("Directory has no entry for {}", callsign),
    }
    Ok(entry)
}

/// Fill a draft from the directory before logging
///
/// A failing or slow directory never blocks logging: the error is logged
/// and the draft is left as it was. Returns whether an entry was applied.
pub async fn enrich_from_directory<D>(
    directory: &D,
    draft: &mut ContactDraft,
    home: Coordinate,
    timeout_secs: u64,
) -> bool
where
    D: DirectoryLookup,
{
    match lookup_station(directory, &draft.callsign, timeout_secs).await {
        Ok(Some(entry)) => {
            apply_directory_entry(draft, &entry, home);
            true
        }
        Ok(None) => false,
        Err(e) => {
            log::warn!("Directory lookup for {} failed: {}", draft.callsign, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qso::{Contact, ContactDraft};
    use crate::store::MemoryStore;
    use crate::sync::RemoteRecord;
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubRemote {
        records: Vec<RemoteRecord>,
        fail_push: bool,
        pushed: AtomicUsize,
    }

    impl StubRemote {
        fn new(records: Vec<RemoteRecord>) -> Self {
            Self {
                records,
                fail_push: false,
                pushed: AtomicUsize::new(0),
            }
        }
    }

    impl RemoteLogbook for StubRemote {
        async fn fetch_all(&self) -> std::result::Result<Vec<RemoteRecord>, ProviderError> {
            Ok(self.records.clone())
        }

        async fn push_unsynced(&self, contacts: &[Contact]) -> std::result::Result<(), ProviderError> {
            if self.fail_push {
                return Err(ProviderError::Rejected("quota exceeded".to_string()));
            }
            self.pushed.fetch_add(contacts.len(), Ordering::SeqCst);
            Ok(())
        }
    }

    struct HangingRemote;

    impl RemoteLogbook for HangingRemote {
        async fn fetch_all(&self) -> std::result::Result<Vec<RemoteRecord>, ProviderError> {
            std::future::pending().await
        }

        async fn push_unsynced(&self, _contacts: &[Contact]) -> std::result::Result<(), ProviderError> {
            std::future::pending().await
        }
    }

    struct OneEntryDirectory;

    impl DirectoryLookup for OneEntryDirectory {
        async fn lookup(
            &self,
            callsign: &Callsign,
        ) -> std::result::Result<Option<DirectoryEntry>, ProviderError> {
            Ok((callsign.as_str() == "IZ2ABC").then(|| DirectoryEntry {
                name: "Mario Rossi".to_string(),
                ..Default::default()
            }))
        }
    }

    struct FailingDirectory;

    impl DirectoryLookup for FailingDirectory {
        async fn lookup(
            &self,
            _callsign: &Callsign,
        ) -> std::result::Result<Option<DirectoryEntry>, ProviderError> {
            Err(ProviderError::Network("connection refused".to_string()))
        }
    }

    struct HangingDirectory;

    impl DirectoryLookup for HangingDirectory {
        async fn lookup(
            &self,
            _callsign: &Callsign,
        ) -> std::result::Result<Option<DirectoryEntry>, ProviderError> {
            std::future::pending().await
        }
    }

    async fn logbook_with_key() -> Mutex<Logbook<MemoryStore>> {
        let mut book = Logbook::open(MemoryStore::new()).await.unwrap();
        let mut settings = book.settings().clone();
        settings.api_key = "test-key".to_string();
        settings.provider_timeout_secs = 1;
        book.update_settings(settings).await.unwrap();
        Mutex::new(book)
    }

    fn record(call: &str, ts: &str) -> RemoteRecord {
        RemoteRecord {
            callsign: Some(call.to_string()),
            timestamp: Some(ts.to_string()),
            band: Some("20m".to_string()),
            mode: Some("SSB".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_import_merges_and_reports() {
        let logbook = logbook_with_key().await;
        let t0 = Utc.with_ymd_and_hms(2026, 4, 18, 10, 0, 0).unwrap();
        logbook
            .lock()
            .await
            .log_contact(ContactDraft::for_callsign("W1AW"), t0, false)
            .await
            .unwrap();

        let remote = StubRemote::new(vec![
            record("W1AW", "2026-04-18T10:00:20Z"),
            record("K2ABC", "2026-04-17T08:00:00Z"),
            record("", "2026-04-17T08:00:00Z"),
        ]);
        let report = import_remote(&logbook, &remote).await.unwrap();
        assert_eq!(report.fetched, 3);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.imported, 1);
        assert_eq!(report.newly_synced, 1);
        assert_eq!(report.total, 2);

        let book = logbook.lock().await;
        assert!(book.contacts().iter().all(|c| c.synced));

        // A second run changes nothing
        drop(book);
        let again = import_remote(&logbook, &remote).await.unwrap();
        assert_eq!(again.imported, 0);
        assert_eq!(again.total, 2);
    }

    #[tokio::test]
    async fn test_missing_api_key_is_config_error() {
        let logbook = Mutex::new(Logbook::open(MemoryStore::new()).await.unwrap());
        let remote = StubRemote::new(Vec::new());
        assert!(matches!(
            import_remote(&logbook, &remote).await,
            Err(Error::Config(_))
        ));
        assert!(matches!(
            push_unsynced(&logbook, &remote).await,
            Err(Error::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_push_marks_synced() {
        let logbook = logbook_with_key().await;
        let t0 = Utc::now();
        {
            let mut book = logbook.lock().await;
            book.log_contact(ContactDraft::for_callsign("W1AW"), t0, false)
                .await
                .unwrap();
            book.log_contact(
                ContactDraft::for_callsign("K2ABC"),
                t0 - ChronoDuration::hours(1),
                false,
            )
            .await
            .unwrap();
        }

        let remote = StubRemote::new(Vec::new());
        assert_eq!(push_unsynced(&logbook, &remote).await.unwrap(), 2);
        assert_eq!(remote.pushed.load(Ordering::SeqCst), 2);
        assert_eq!(logbook.lock().await.unsynced_count(), 0);

        // Nothing left to push
        assert_eq!(push_unsynced(&logbook, &remote).await.unwrap(), 0);
        assert_eq!(remote.pushed.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_push_leaves_log_unchanged() {
        let logbook = logbook_with_key().await;
        logbook
            .lock()
            .await
            .log_contact(ContactDraft::for_callsign("W1AW"), Utc::now(), false)
            .await
            .unwrap();

        let mut remote = StubRemote::new(Vec::new());
        remote.fail_push = true;
        let err = push_unsynced(&logbook, &remote).await.unwrap_err();
        assert!(matches!(err, Error::Provider(ProviderError::Rejected(_))));
        assert_eq!(logbook.lock().await.unsynced_count(), 1);
    }

    #[tokio::test]
    async fn test_hanging_provider_times_out() {
        let logbook = logbook_with_key().await;
        assert!(matches!(
            import_remote(&logbook, &HangingRemote).await,
            Err(Error::Timeout(1))
        ));
        assert!(logbook.lock().await.contacts().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_station() {
        let directory = OneEntryDirectory;
        assert!(lookup_station(&directory, "IZ", 1).await.unwrap().is_none());
        let entry = lookup_station(&directory, "iz2abc", 1).await.unwrap().unwrap();
        assert_eq!(entry.name, "Mario Rossi");
        assert!(lookup_station(&directory, "K2ABC", 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_enrich_applies_directory_entry() {
        let home = Coordinate::new(41.8719, 12.5674).unwrap();
        let mut draft = ContactDraft::for_callsign("IZ2ABC");
        assert!(enrich_from_directory(&OneEntryDirectory, &mut draft, home, 1).await);
        assert_eq!(draft.operator_name, "Mario Rossi");

        let mut short = ContactDraft::for_callsign("IZ");
        assert!(!enrich_from_directory(&OneEntryDirectory, &mut short, home, 1).await);
    }

    #[tokio::test]
    async fn test_failing_directory_does_not_block_logging() {
        let logbook = logbook_with_key().await;
        let home = Coordinate::new(41.8719, 12.5674).unwrap();

        let mut draft = ContactDraft::for_callsign("W1AW");
        draft.operator_name = "Hiram".to_string();
        assert!(!enrich_from_directory(&FailingDirectory, &mut draft, home, 1).await);
        assert_eq!(draft.operator_name, "Hiram");

        let mut other = ContactDraft::for_callsign("K2ABC");
        assert!(!enrich_from_directory(&HangingDirectory, &mut other, home, 1).await);

        let mut book = logbook.lock().await;
        let outcome = book.log_contact(draft, Utc::now(), false).await.unwrap();
        assert!(matches!(outcome, crate::logbook::LogOutcome::Logged(_)));
        let outcome = book.log_contact(other, Utc::now(), false).await.unwrap();
        assert!(matches!(outcome, crate::logbook::LogOutcome::Logged(_)));
        assert_eq!(book.contacts().len(), 2);
    }
}

//! Remote logbook synchronisation
//!
//! - `merge`: pure reconciliation of local and remote logs
//! - `provider`: async provider traits and remote record normalization
//! - `session`: timeout-bounded import/push/lookup against providers
//! - `file_provider`: JSON file implementations of the provider traits

pub mod file_provider;
pub mod merge;
pub mod provider;
pub mod session;

pub use file_provider::{JsonFileDirectory, JsonFileRemote};
pub use merge::{
    mark_synced_after_outbound_sync, merge_remote_import, pending_sync, ReconciliationResult,
};
pub use provider::{
    normalize_remote_records, DirectoryEntry, DirectoryLookup, RemoteBatch, RemoteLogbook,
    RemoteRecord,
};
pub use session::{
    enrich_from_directory, import_remote, lookup_station, push_unsynced, ImportReport,
    MIN_LOOKUP_LEN,
};

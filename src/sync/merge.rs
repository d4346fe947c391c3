//! Logbook reconciliation
//!
//! Pure, synchronous merge of a local contact log with a remote one. No I/O;
//! the remote collection is fetched beforehand by the session layer.
//!
//! Sync state per contact only moves forward: `synced=false` -> `synced=true`.
//!
//! # Invariants
//! - Every remote contact is kept and flagged synced.
//! - A local contact is dropped only when it duplicates something already in
//!   the merged set (same callsign ignoring case, < 60 s apart).
//! - Output is sorted newest first; equal timestamps keep their input order.
//! - Feeding the output back in as `local` with the same `remote` yields the
//!   same collection.

use serde::Serialize;

use crate::qso::{is_duplicate, Contact};

/// Merged log plus counters for reporting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationResult {
    pub contacts: Vec<Contact>,
    /// Remote contacts that had no counterpart in the local log
    pub imported: usize,
    /// Unsynced local contacts now represented by their synced remote copy
    pub newly_synced: usize,
}

/// Merge a remote import into the local log
pub fn merge_remote_import(local: &[Contact], remote: &[Contact]) -> ReconciliationResult {
    let mut merged: Vec<Contact> = remote.iter().cloned().map(Contact::into_synced).collect();
    let remote_len = merged.len();

    let mut matched_remote = vec![false; remote_len];
    let mut newly_synced = 0;

    for l in local {
        match merged.iter().position(|m| is_duplicate(l, m)) {
            Some(idx) => {
                if idx < remote_len {
                    matched_remote[idx] = true;
                }
                if !l.synced {
                    newly_synced += 1;
                }
            }
            None => merged.push(l.clone()),
        }
    }

    let imported = matched_remote.iter().filter(|m| !**m).count();

    // Vec::sort_by is stable: equal timestamps keep remote-then-local order
    merged.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    ReconciliationResult {
        contacts: merged,
        imported,
        newly_synced,
    }
}

/// Flag every unsynced contact as synced after a successful outbound push
///
/// Count, order and every other field are untouched.
pub fn mark_synced_after_outbound_sync(local: &[Contact]) -> Vec<Contact> {
    local.iter().cloned().map(Contact::into_synced).collect()
}

/// Contacts still waiting for an outbound push, in log order
pub fn pending_sync(local: &[Contact]) -> Vec<Contact> {
    local.iter().filter(|c| !c.synced).cloned().collect()
}

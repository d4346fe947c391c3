// Duplicate detection and log filters
//
// Two contacts are the same QSO when the callsigns match (case-insensitive)
// and the timestamps are less than DUPLICATE_WINDOW_SECS apart. Band and mode
// are deliberately not compared: remote logs often disagree on them.

use chrono::{DateTime, Duration, Utc};

use super::{Callsign, Contact};

pub const DUPLICATE_WINDOW_SECS: i64 = 60;

/// Duplicate test on raw callsign + timestamp
pub fn is_duplicate_of(
    callsign: &Callsign,
    timestamp: DateTime<Utc>,
    other: &Contact,
) -> bool {
    if !callsign.matches(&other.callsign) {
        return false;
    }
    let delta = (timestamp - other.timestamp).abs();
    delta < Duration::seconds(DUPLICATE_WINDOW_SECS)
}

pub fn is_duplicate(a: &Contact, b: &Contact) -> bool {
    is_duplicate_of(&a.callsign, a.timestamp, b)
}

/// First logged contact that would make a new entry a duplicate
pub fn find_duplicate<'a>(
    log: &'a [Contact],
    callsign: &Callsign,
    timestamp: DateTime<Utc>,
) -> Option<&'a Contact> {
    log.iter().find(|c| is_duplicate_of(callsign, timestamp, c))
}

/// Contacts at or after `since`, in log order
fn contacts_since(log: &[Contact], since: DateTime<Utc>) -> Vec<&Contact> {
    log.iter().filter(|c| c.timestamp >= since).collect()
}

/// Contacts logged since UTC midnight of `now`
pub fn todays_contacts(log: &[Contact], now: DateTime<Utc>) -> Vec<&Contact> {
    let midnight = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .unwrap_or(now);
    contacts_since(log, midnight)
}

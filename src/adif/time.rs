//! ADIF date/time helpers
//!
//! Conversions between contact timestamps and the ADIF `QSO_DATE` (YYYYMMDD)
//! and `TIME_ON` (HHMM or HHMMSS) fields. All times are UTC.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::{Error, Result};

/// YYYYMMDD
pub fn format_qso_date(ts: &DateTime<Utc>) -> String {
    ts.format("%Y%m%d").to_string()
}

/// HHMMSS
pub fn format_time_on(ts: &DateTime<Utc>) -> String {
    ts.format("%H%M%S").to_string()
}

/// Normalize time string to 6-character HHMMSS format (ADIF standard)
///
/// Accepts HHMM, HHMMSS, HH:MM[:SS] and "YYYY-MM-DD HH:MM:SS".
pub fn normalize_time_to_hhmmss(time_str: &str) -> String {
    let clean = time_str.trim();

    // Datetime form: keep only the time part
    let clean = if clean.contains('-') && clean.contains(' ') {
        clean.rsplit(' ').next().unwrap_or(clean)
    } else {
        clean
    };

    let digits = clean.replace(':', "");
    if digits.len() >= 6 {
        digits[..6].to_string()
    } else if digits.is_empty() {
        "000000".to_string()
    } else {
        format!("{:0<6}", digits)
    }
}

/// Validate ADIF date format (YYYYMMDD)
pub fn is_valid_adif_date(date_str: &str) -> bool {
    date_str.len() == 8
        && date_str.chars().all(|c| c.is_ascii_digit())
        && NaiveDate::parse_from_str(date_str, "%Y%m%d")
            .map(|d| (1900..=2100).contains(&chrono::Datelike::year(&d)))
            .unwrap_or(false)
}

/// Validate ADIF time format (HHMM or HHMMSS)
pub fn is_valid_adif_time(time_str: &str) -> bool {
    let len = time_str.len();
    if len != 4 && len != 6 {
        return false;
    }
    if !time_str.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    NaiveTime::parse_from_str(&normalize_time_to_hhmmss(time_str), "%H%M%S").is_ok()
}

/// Combine ADIF `QSO_DATE` and `TIME_ON` into a UTC instant
pub fn parse_adif_datetime(qso_date: &str, time_on: &str) -> Result<DateTime<Utc>> {
    let qso_date = qso_date.trim();
    let time_on = time_on.trim();

    if !is_valid_adif_date(qso_date) {
        return Err(Error::InvalidInput(format!("invalid QSO_DATE '{}'", qso_date)));
    }
    if !is_valid_adif_time(time_on) {
        return Err(Error::InvalidInput(format!("invalid TIME_ON '{}'", time_on)));
    }

    let date = NaiveDate::parse_from_str(qso_date, "%Y%m%d")
        .map_err(|e| Error::InvalidInput(format!("invalid QSO_DATE '{}': {}", qso_date, e)))?;
    let time = NaiveTime::parse_from_str(&normalize_time_to_hhmmss(time_on), "%H%M%S")
        .map_err(|e| Error::InvalidInput(format!("invalid TIME_ON '{}': {}", time_on, e)))?;

    Ok(Utc.from_utc_datetime(&date.and_time(time)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_time_to_hhmmss() {
        assert_eq!(normalize_time_to_hhmmss("1234"), "123400");
        assert_eq!(normalize_time_to_hhmmss("123456"), "123456");
        assert_eq!(normalize_time_to_hhmmss("23:24:45"), "232445");
        assert_eq!(normalize_time_to_hhmmss("2026-01-08 23:24:45"), "232445");
        assert_eq!(normalize_time_to_hhmmss(""), "000000");
    }

    #[test]
    fn test_is_valid_adif_date() {
        assert!(is_valid_adif_date("20260108"));
        assert!(!is_valid_adif_date("2026-01-08"));
        assert!(!is_valid_adif_date("20261301"));
        assert!(!is_valid_adif_date("20260230"));
    }

    #[test]
    fn test_is_valid_adif_time() {
        assert!(is_valid_adif_time("1234"));
        assert!(is_valid_adif_time("123456"));
        assert!(!is_valid_adif_time("2400"));
        assert!(!is_valid_adif_time("12345"));
    }

    #[test]
    fn test_parse_and_format_roundtrip() {
        let ts = parse_adif_datetime("20260103", "1526").unwrap();
        assert_eq!(format_qso_date(&ts), "20260103");
        assert_eq!(format_time_on(&ts), "152600");
        assert!(parse_adif_datetime("2026013", "1526").is_err());
        assert!(parse_adif_datetime("20260103", "9999").is_err());
    }
}

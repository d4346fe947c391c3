// ADIF (Amateur Data Interchange Format) Parser and Writer
// Reference: https://adif.org/

pub mod bands;
pub mod modes;
pub mod parser;
pub mod time;
pub mod writer;

pub use bands::{freq_to_band, infer_band, Band};
pub use modes::{normalize_mode, Mode, ModeGroup};
pub use parser::{parse_adif, AdifFile, AdifRecord};
pub use writer::{write_adif, write_record, PROGRAM_ID};

use crate::error::Result;
use crate::qso::Contact;

/// Result of importing an ADIF document
#[derive(Debug, Default, serde::Serialize)]
pub struct ImportResult {
    pub total_records: usize,
    pub imported: usize,
    pub errors: usize,
    pub error_messages: Vec<String>,
}

/// Validate every record of an ADIF document into local contacts
///
/// Bad records are counted and reported, never fatal for the batch.
pub fn import_contacts(content: &str) -> (Vec<Contact>, ImportResult) {
    let file = parse_adif(content);
    let mut result = ImportResult {
        total_records: file.records.len(),
        ..Default::default()
    };

    let mut contacts = Vec::with_capacity(file.records.len());
    for record in &file.records {
        match record.to_contact() {
            Ok(contact) => {
                result.imported += 1;
                contacts.push(contact);
            }
            Err(e) => {
                result.errors += 1;
                result.error_messages.push(format!(
                    "{}: {}",
                    record.call().unwrap_or("?"),
                    e
                ));
            }
        }
    }

    log::info!(
        "ADIF import: {} records, {} imported, {} errors",
        result.total_records,
        result.imported,
        result.errors
    );

    (contacts, result)
}

/// Export contacts as an ADIF document; an empty log has nothing to export
pub fn export_contacts(contacts: &[Contact]) -> Result<String> {
    if contacts.is_empty() {
        return Err(crate::error::Error::InvalidInput(
            "logbook is empty, nothing to export".to_string(),
        ));
    }
    Ok(write_adif(contacts, "HamLog Pro Export"))
}

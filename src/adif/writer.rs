// ADIF Writer
// Serializes contacts to ADIF text for export and outbound sync payloads.

use super::time::{format_qso_date, format_time_on};
use crate::qso::Contact;

/// Program identifier written to the export header
pub const PROGRAM_ID: &str = "HAMLOGPRO";

fn field(out: &mut String, name: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    // ADIF lengths are byte counts
    out.push_str(&format!("<{}:{}>{}", name, value.len(), value));
}

/// Ordered (name, value) pairs for one contact; empty values are omitted
pub fn contact_fields(contact: &Contact) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("CALL", contact.callsign.to_string()),
        ("QSO_DATE", format_qso_date(&contact.timestamp)),
        ("TIME_ON", format_time_on(&contact.timestamp)),
        ("BAND", contact.band.to_string()),
        ("MODE", contact.mode.to_string()),
        ("RST_SENT", contact.rst_sent.clone()),
        ("RST_RCVD", contact.rst_rcvd.clone()),
        ("TX_PWR", contact.power.clone()),
        ("NAME", contact.operator_name.clone()),
        ("QTH", contact.operator_location.clone()),
    ];
    if let Some(grid) = &contact.grid_locator {
        fields.push(("GRIDSQUARE", grid.to_string()));
    }
    if let Some(park) = &contact.park_reference {
        fields.push(("POTA_REF", park.clone()));
    }
    if let Some(summit) = &contact.summit_reference {
        fields.push(("SOTA_REF", summit.clone()));
    }
    if let Some(distance) = contact.distance_km {
        fields.push(("DISTANCE", distance.to_string()));
    }
    if let Some(notes) = &contact.notes {
        fields.push(("COMMENT", notes.clone()));
    }
    fields.retain(|(_, v)| !v.is_empty());
    fields
}

/// One record, terminated by <EOR>
pub fn write_record(contact: &Contact) -> String {
    let mut out = String::new();
    for (name, value) in contact_fields(contact) {
        field(&mut out, name, &value);
    }
    out.push_str("<EOR>");
    out
}

/// Full ADIF document with header
pub fn write_adif(contacts: &[Contact], title: &str) -> String {
    let mut out = String::new();
    out.push_str(title);
    out.push_str("\nADIF Export\n");
    field(&mut out, "ADIF_VER", "3.1.4");
    out.push('\n');
    field(&mut out, "PROGRAMID", PROGRAM_ID);
    out.push('\n');
    out.push_str("<EOH>\n\n");

    for contact in contacts {
        out.push_str(&write_record(contact));
        out.push('\n');
    }
    out
}

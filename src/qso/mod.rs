// Contact record model
// Contacts, drafts, DX spots and duplicate rules.

pub mod contact;
pub mod dupes;
pub mod spot;

pub use contact::{Callsign, Contact, ContactDraft, DEFAULT_POWER, DEFAULT_RST};
pub use dupes::{
    find_duplicate, is_duplicate, is_duplicate_of, todays_contacts,
    DUPLICATE_WINDOW_SECS,
};
pub use spot::{filter_spots, normalize_spots, DxSpot, RawSpot};

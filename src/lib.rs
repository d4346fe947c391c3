// HamLog library
// Contact logging, Maidenhead geometry, ADIF interchange and remote sync

pub mod adif;
pub mod error;
pub mod geo;
pub mod logbook;
pub mod qso;
pub mod reference;
pub mod settings;
pub mod store;
pub mod sync;

pub use error::{Error, ProviderError, Result};
pub use logbook::{apply_directory_entry, LogOutcome, Logbook, ReferenceSuggestion};
pub use settings::Settings;

// ADIF Mode handling
// Reference: https://adif.org/314/ADIF_314.htm#Mode_Enumeration
//
// The logbook carries a closed set of operating modes; submodes that commonly
// show up as MODE in foreign logs (USB, LSB, BPSK31) fold into their parent.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Mode group for award categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeGroup {
    Phone, // Voice modes: SSB, FM, AM
    CW,    // Morse code
    Data,  // Digital modes: FT8, RTTY, PSK, etc.
    Image, // SSTV
}

impl ModeGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeGroup::Phone => "PHONE",
            ModeGroup::CW => "CW",
            ModeGroup::Data => "DATA",
            ModeGroup::Image => "IMAGE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Mode {
    #[default]
    Ssb,
    Cw,
    Ft8,
    Ft4,
    Fm,
    Am,
    Rtty,
    Psk31,
    Js8,
    Sstv,
}

impl Mode {
    pub const ALL: [Mode; 10] = [
        Mode::Ssb,
        Mode::Cw,
        Mode::Ft8,
        Mode::Ft4,
        Mode::Fm,
        Mode::Am,
        Mode::Rtty,
        Mode::Psk31,
        Mode::Js8,
        Mode::Sstv,
    ];

    /// ADIF mode name
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Ssb => "SSB",
            Mode::Cw => "CW",
            Mode::Ft8 => "FT8",
            Mode::Ft4 => "FT4",
            Mode::Fm => "FM",
            Mode::Am => "AM",
            Mode::Rtty => "RTTY",
            Mode::Psk31 => "PSK31",
            Mode::Js8 => "JS8",
            Mode::Sstv => "SSTV",
        }
    }

    pub fn group(&self) -> ModeGroup {
        match self {
            Mode::Cw => ModeGroup::CW,
            Mode::Ssb | Mode::Fm | Mode::Am => ModeGroup::Phone,
            Mode::Sstv => ModeGroup::Image,
            Mode::Ft8 | Mode::Ft4 | Mode::Rtty | Mode::Psk31 | Mode::Js8 => ModeGroup::Data,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = normalize_mode(s);
        match normalized.as_str() {
            "USB" | "LSB" => return Ok(Mode::Ssb),
            "BPSK31" | "PSK" => return Ok(Mode::Psk31),
            _ => {}
        }
        Mode::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == normalized)
            .ok_or_else(|| Error::InvalidInput(format!("unknown mode '{}'", s.trim())))
    }
}

impl TryFrom<String> for Mode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Mode> for String {
    fn from(mode: Mode) -> Self {
        mode.as_str().to_string()
    }
}

/// Normalize a mode string to standard ADIF format
pub fn normalize_mode(mode: &str) -> String {
    mode.trim().to_uppercase()
}

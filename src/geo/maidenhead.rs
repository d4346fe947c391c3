// Maidenhead Grid Locator Codec
// Converts between decimal-degree coordinates and 4/6 character grid locators
//
// Layout (origin at -180°, -90°):
//   chars 0-1  field       A-R   20° lon x 10° lat
//   chars 2-3  square      0-9    2° lon x  1° lat
//   chars 4-5  sub-square  a-x    5' lon x 2.5' lat
//
// decode() always returns the centre of the 4-character square. A 6-character
// locator is validated in full but the sub-square does not refine the point.

use serde::{Deserialize, Serialize};

use super::Coordinate;
use crate::error::{Error, Result};

const FIELD_COUNT: usize = 18;
const SQUARE_COUNT: usize = 10;
const SUBSQUARE_COUNT: usize = 24;

// Shifted coordinates are clamped just below their upper bound so that
// lat=90 / lon=180 land in the last cell instead of one past it.
const MAX_SHIFTED_LON: f64 = 360.0 - 1e-9;
const MAX_SHIFTED_LAT: f64 = 180.0 - 1e-9;

/// A validated 4 or 6 character Maidenhead locator
///
/// Stored canonically: upper-case field letters, lower-case sub-square letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GridLocator(String);

impl GridLocator {
    /// Validate and canonicalize a locator string
    pub fn parse(locator: &str) -> Result<Self> {
        let trimmed = locator.trim();
        let bytes = trimmed.as_bytes();
        let len = bytes.len();

        if len < 4 {
            return Err(Error::InvalidLocator(format!(
                "'{}' is shorter than 4 characters",
                trimmed
            )));
        }
        if len != 4 && len != 6 {
            return Err(Error::InvalidLocator(format!(
                "'{}' must be 4 or 6 characters",
                trimmed
            )));
        }

        let mut canonical = String::with_capacity(len);
        for (i, &b) in bytes.iter().enumerate() {
            let ok = match i {
                0 | 1 => matches!(b.to_ascii_uppercase(), b'A'..=b'R'),
                2 | 3 => b.is_ascii_digit(),
                _ => matches!(b.to_ascii_lowercase(), b'a'..=b'x'),
            };
            if !ok {
                return Err(Error::InvalidLocator(format!(
                    "'{}' has an out-of-range character at position {}",
                    trimmed,
                    i + 1
                )));
            }
            canonical.push(match i {
                0 | 1 => b.to_ascii_uppercase() as char,
                2 | 3 => b as char,
                _ => b.to_ascii_lowercase() as char,
            });
        }

        Ok(Self(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 4-character square this locator belongs to
    pub fn square(&self) -> &str {
        &self.0[..4]
    }

    pub fn has_subsquare(&self) -> bool {
        self.0.len() == 6
    }

    /// Centre of the 4-character square
    pub fn center(&self) -> Coordinate {
        let b = self.0.as_bytes();
        let lon_field = (b[0] - b'A') as f64;
        let lat_field = (b[1] - b'A') as f64;
        let lon_square = (b[2] - b'0') as f64;
        let lat_square = (b[3] - b'0') as f64;

        // Each field is 20° x 10°, each square 2° x 1°; +1/+0.5 for centre
        Coordinate {
            latitude: -90.0 + lat_field * 10.0 + lat_square + 0.5,
            longitude: -180.0 + lon_field * 20.0 + lon_square * 2.0 + 1.0,
        }
    }
}

impl std::fmt::Display for GridLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for GridLocator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for GridLocator {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<GridLocator> for String {
    fn from(grid: GridLocator) -> Self {
        grid.0
    }
}

/// Encode a coordinate as a 6-character locator
pub fn encode(coordinate: Coordinate) -> GridLocator {
    let lon = (coordinate.longitude + 180.0).clamp(0.0, MAX_SHIFTED_LON);
    let lat = (coordinate.latitude + 90.0).clamp(0.0, MAX_SHIFTED_LAT);

    let field_lon = index(lon / 20.0, FIELD_COUNT);
    let field_lat = index(lat / 10.0, FIELD_COUNT);
    let square_lon = index((lon % 20.0) / 2.0, SQUARE_COUNT);
    let square_lat = index(lat % 10.0, SQUARE_COUNT);
    let sub_lon = index((lon % 2.0) * 12.0, SUBSQUARE_COUNT);
    let sub_lat = index((lat % 1.0) * 24.0, SUBSQUARE_COUNT);

    let mut out = String::with_capacity(6);
    out.push((b'A' + field_lon) as char);
    out.push((b'A' + field_lat) as char);
    out.push((b'0' + square_lon) as char);
    out.push((b'0' + square_lat) as char);
    out.push((b'a' + sub_lon) as char);
    out.push((b'a' + sub_lat) as char);
    GridLocator(out)
}

/// Decode a locator string to the centre of its 4-character square
pub fn decode(locator: &str) -> Result<Coordinate> {
    Ok(GridLocator::parse(locator)?.center())
}

fn index(value: f64, count: usize) -> u8 {
    (value.floor().max(0.0) as usize).min(count - 1) as u8
}

// Activation reference matching - parks and summits
//
// Matching uses a planar distance in degrees, which only holds for the small
// search radius used here (default 0.2°, a few tens of km).
//
// Catalog order is part of the contract: the FIRST entry under the threshold
// wins, even when a later entry is closer.

pub mod catalog;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geo::Coordinate;

pub use catalog::{builtin_parks, builtin_summits, CatalogFile};

/// Default search radius in degrees
pub const DEFAULT_THRESHOLD_DEG: f64 = 0.2;

/// A park or summit catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub id: String,
    pub name: String,
    pub coordinate: Coordinate,
}

impl Reference {
    pub fn new(id: impl Into<String>, name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coordinate,
        }
    }

    /// Planar distance in degrees from `origin`
    pub fn planar_distance_deg(&self, origin: Coordinate) -> f64 {
        let d_lat = self.coordinate.latitude - origin.latitude;
        let d_lon = self.coordinate.longitude - origin.longitude;
        (d_lat * d_lat + d_lon * d_lon).sqrt()
    }
}

/// Return the first catalog entry strictly closer than `threshold_degrees`
///
/// `Ok(None)` means nothing is nearby; that is an expected outcome, not an error.
pub fn find_nearest_reference<'a>(
    catalog: &'a [Reference],
    origin: Coordinate,
    threshold_degrees: f64,
) -> Result<Option<&'a Reference>> {
    if !threshold_degrees.is_finite() || threshold_degrees <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "reference threshold must be positive, got {}",
            threshold_degrees
        )));
    }

    Ok(catalog
        .iter()
        .find(|r| r.planar_distance_deg(origin) < threshold_degrees))
}

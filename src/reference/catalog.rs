// Built-in sample catalogs
// A small static set of park (POTA-style) and summit (SOTA-style) references
// used when the caller does not supply its own catalog.
//
// Order matters for matching; keep entries in their published order.

use std::path::Path;

use serde::Deserialize;

use super::Reference;
use crate::error::Result;
use crate::geo::Coordinate;

/// Static catalog row
#[derive(Debug, Clone, Copy)]
pub struct ReferenceSeed {
    pub id: &'static str,
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

pub static PARKS: &[ReferenceSeed] = &[
    ReferenceSeed { id: "I-0123", name: "Parco Nazionale dello Stelvio", lat: 46.50, lon: 10.50 },
    ReferenceSeed { id: "I-0456", name: "Parco Regionale dei Colli Euganei", lat: 45.31, lon: 11.71 },
];

pub static SUMMITS: &[ReferenceSeed] = &[
    ReferenceSeed { id: "I/LO-123", name: "Monte Generoso", lat: 45.92, lon: 9.01 },
    ReferenceSeed { id: "I/VE-045", name: "Monte Grappa", lat: 45.87, lon: 11.80 },
];

fn materialize(seeds: &[ReferenceSeed]) -> Vec<Reference> {
    seeds
        .iter()
        .map(|s| Reference {
            id: s.id.to_string(),
            name: s.name.to_string(),
            coordinate: Coordinate {
                latitude: s.lat,
                longitude: s.lon,
            },
        })
        .collect()
}

pub fn builtin_parks() -> Vec<Reference> {
    materialize(PARKS)
}

pub fn builtin_summits() -> Vec<Reference> {
    materialize(SUMMITS)
}

/// User catalog file; a missing list keeps the built-in one
#[derive(Debug, Default, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub parks: Option<Vec<Reference>>,
    #[serde(default)]
    pub summits: Option<Vec<Reference>>,
}

impl CatalogFile {
    /// Read a JSON catalog, rejecting entries with impossible coordinates
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path.as_ref()).await?;
        let file: CatalogFile = serde_json::from_slice(&bytes)?;
        for entry in file.parks.iter().chain(file.summits.iter()).flatten() {
            Coordinate::new(entry.coordinate.latitude, entry.coordinate.longitude)?;
        }
        log::info!(
            "Loaded catalog {}: {} parks, {} summits",
            path.as_ref().display(),
            file.parks.as_ref().map_or(0, Vec::len),
            file.summits.as_ref().map_or(0, Vec::len)
        );
        Ok(file)
    }

    pub fn into_catalogs(self) -> (Vec<Reference>, Vec<Reference>) {
        (
            self.parks.unwrap_or_else(builtin_parks),
            self.summits.unwrap_or_else(builtin_summits),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_catalog_file_overrides_parks_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"{"parks":[{"id":"K-0001","name":"Acadia","coordinate":{"latitude":44.35,"longitude":-68.21}}]}"#,
        )
        .unwrap();

        let (parks, summits) = CatalogFile::load(&path).await.unwrap().into_catalogs();
        assert_eq!(parks.len(), 1);
        assert_eq!(parks[0].id, "K-0001");
        assert_eq!(summits, builtin_summits());
    }

    #[tokio::test]
    async fn test_catalog_file_rejects_bad_coordinates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"{"summits":[{"id":"X","name":"Nowhere","coordinate":{"latitude":95.0,"longitude":0.0}}]}"#,
        )
        .unwrap();
        assert!(CatalogFile::load(&path).await.is_err());
    }

    #[test]
    fn test_seeds_are_valid_coordinates() {
        for seed in PARKS.iter().chain(SUMMITS.iter()) {
            assert!(Coordinate::new(seed.lat, seed.lon).is_ok(), "{}", seed.id);
        }
    }

    #[test]
    fn test_catalog_order_preserved() {
        let ids: Vec<String> = builtin_summits().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["I/LO-123", "I/VE-045"]);
    }
}

//! Curated quest catalog.
//!
//! The catalog is loaded once at start-up and never mutated afterwards. It
//! is passed by reference (usually behind an `Arc`) to the matcher and the
//! itinerary builder, so tests can substitute synthetic catalogs.

mod error;
mod progress;

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::domain::{GeoPoint, PointOfInterest};

pub use error::CatalogError;
pub use progress::{ExplorationProgress, overall_progress, progress_label, region_progress};

/// Catalog shipped with the server.
const EMBEDDED_CATALOG: &str = include_str!("../../data/catalog.json");

/// A named area grouping curated quests.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Region {
    pub id: String,
    pub name: String,
    pub center: GeoPoint,
    pub quests: Vec<PointOfInterest>,
}

#[derive(Deserialize)]
struct CatalogFile {
    regions: Vec<Region>,
}

/// Read-only collection of curated quests, grouped into regions.
///
/// Iteration order is stable: regions in file order, quests in region
/// order. The matcher relies on this order for tie-breaking.
#[derive(Debug, Clone, Default)]
pub struct QuestCatalog {
    regions: Vec<Region>,
}

impl QuestCatalog {
    /// Build a catalog from regions, rejecting duplicate quest ids.
    pub fn new(regions: Vec<Region>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for quest in regions.iter().flat_map(|r| r.quests.iter()) {
            if !seen.insert(quest.id.as_str()) {
                return Err(CatalogError::DuplicateId(quest.id.clone()));
            }
        }
        Ok(Self { regions })
    }

    /// Parse a catalog from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.regions)
    }

    /// Load a catalog from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// The catalog compiled into the binary.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    /// All quests in catalog order.
    pub fn quests(&self) -> impl Iterator<Item = &PointOfInterest> {
        self.regions.iter().flat_map(|r| r.quests.iter())
    }

    pub fn get(&self, id: &str) -> Option<&PointOfInterest> {
        self.quests().find(|q| q.id == id)
    }

    /// Total number of quests.
    pub fn len(&self) -> usize {
        self.regions.iter().map(|r| r.quests.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builder for small catalogs, mostly used in tests.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    regions: Vec<Region>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new region; subsequent quests are added to it.
    pub fn region(mut self, id: &str, name: &str, center: GeoPoint) -> Self {
        self.regions.push(Region {
            id: id.to_string(),
            name: name.to_string(),
            center,
            quests: Vec::new(),
        });
        self
    }

    /// Add a quest to the most recent region, creating a default one if needed.
    pub fn quest(mut self, quest: PointOfInterest) -> Self {
        if self.regions.is_empty() {
            self = self.region("default", "Default", quest.location);
        }
        if let Some(region) = self.regions.last_mut() {
            region.quests.push(quest);
        }
        self
    }

    pub fn build(self) -> Result<QuestCatalog, CatalogError> {
        QuestCatalog::new(self.regions)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::domain::QuestCategory;

    fn poi(id: &str, lat: f64, lng: f64) -> PointOfInterest {
        PointOfInterest::new(
            id,
            id.to_uppercase(),
            QuestCategory::Scenic,
            GeoPoint::new(lat, lng).unwrap(),
            10,
        )
    }

    #[test]
    fn embedded_catalog_loads() {
        let catalog = QuestCatalog::embedded().unwrap();
        assert!(!catalog.is_empty());
        assert!(catalog.region("bavaria").is_some());
        assert!(catalog.get("sn-bastei").is_some());
    }

    #[test]
    fn iteration_order_is_file_order() {
        let catalog = CatalogBuilder::new()
            .region("a", "A", GeoPoint::new(0.0, 0.0).unwrap())
            .quest(poi("a1", 0.0, 0.0))
            .quest(poi("a2", 0.0, 0.1))
            .region("b", "B", GeoPoint::new(1.0, 1.0).unwrap())
            .quest(poi("b1", 1.0, 1.0))
            .build()
            .unwrap();

        let ids: Vec<_> = catalog.quests().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2", "b1"]);
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.regions().len(), 2);
    }

    #[test]
    fn duplicate_ids_rejected() {
        let result = CatalogBuilder::new()
            .quest(poi("x", 0.0, 0.0))
            .quest(poi("x", 1.0, 1.0))
            .build();
        assert!(matches!(result, Err(CatalogError::DuplicateId(id)) if id == "x"));
    }

    #[test]
    fn builder_creates_default_region() {
        let catalog = CatalogBuilder::new().quest(poi("q", 3.0, 4.0)).build().unwrap();
        assert_eq!(catalog.regions()[0].id, "default");
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"regions": [{{"id": "r", "name": "R", "center": {{"lat": 1.0, "lng": 2.0}},
               "quests": [{{"id": "q1", "title": "Q1", "description": "", "category": "food",
                            "location": {{"lat": 1.0, "lng": 2.0}}, "rewardPoints": 25}}]}}]}}"#
        )
        .unwrap();

        let catalog = QuestCatalog::from_path(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("q1").unwrap().reward_points, 25);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = QuestCatalog::from_path(dir.path().join("nope.json"));
        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }

    #[test]
    fn invalid_coordinates_rejected() {
        let json = r#"{"regions": [{"id": "r", "name": "R", "center": {"lat": 100.0, "lng": 2.0}, "quests": []}]}"#;
        assert!(matches!(
            QuestCatalog::from_json(json),
            Err(CatalogError::Json(_))
        ));
    }
}

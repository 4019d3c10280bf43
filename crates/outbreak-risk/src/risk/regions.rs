use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::domain::{CatalogError, ValidationError};

/// `[latitude, longitude]`.
pub type Coordinate = [f64; 2];

/// Reference data for a place, including its historical base risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub identifier: String,
    pub name: String,
    pub base_risk_score: f64,
    pub center: Coordinate,
    /// Polygon boundary, only consumed by map renderers.
    pub coordinates: Vec<Coordinate>,
}

impl Region {
    pub fn new(
        identifier: &str,
        name: &str,
        base_risk_score: f64,
        center: Coordinate,
        coordinates: Vec<Coordinate>,
    ) -> Self {
        Self {
            identifier: identifier.to_string(),
            name: name.to_string(),
            base_risk_score,
            center,
            coordinates,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut error = ValidationError::new();
        if self.identifier.trim().is_empty() {
            error.push("identifier", "must not be empty");
        }
        if !(0.0..=1.0).contains(&self.base_risk_score) {
            error.push(
                format!("{}.baseRiskScore", self.identifier),
                format!("must be between 0 and 1, got {}", self.base_risk_score),
            );
        }
        error.into_result()
    }
}

/// Read-only lookup of regions by identifier.
pub trait RegionCatalog: Send + Sync {
    fn all(&self) -> Vec<Region>;
    fn get_by_identifier(&self, identifier: &str) -> Result<Region, CatalogError>;
}

/// Failure loading a catalog file.
#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("unable to read region catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("region catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Catalog fixed at construction time.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticRegionCatalog {
    regions: Vec<Region>,
}

impl StaticRegionCatalog {
    /// Rejects out-of-range base scores and duplicate identifiers.
    pub fn from_regions(regions: Vec<Region>) -> Result<Self, ValidationError> {
        let mut error = ValidationError::new();
        let mut seen = HashSet::new();
        for region in &regions {
            if let Err(issues) = region.validate() {
                error.merge(issues);
            }
            if !seen.insert(region.identifier.as_str()) {
                error.push(
                    format!("{}.identifier", region.identifier),
                    "is declared more than once",
                );
            }
        }
        error.into_result()?;
        Ok(Self { regions })
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogLoadError> {
        let regions: Vec<Region> = serde_json::from_reader(reader)?;
        Ok(Self::from_regions(regions)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogLoadError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn standard() -> Self {
        Self {
            regions: vec![
                Region::new(
                    "region1",
                    "West Bengal",
                    0.72,
                    [23.0, 87.0],
                    vec![[22.5, 86.5], [22.5, 87.5], [23.5, 87.5], [23.5, 86.5]],
                ),
                Region::new(
                    "region2",
                    "Kerala",
                    0.65,
                    [10.8505, 76.2711],
                    vec![[10.5, 75.5], [10.5, 77.0], [11.5, 77.0], [11.5, 75.5]],
                ),
                Region::new(
                    "region3",
                    "Bangladesh (Rangpur)",
                    0.81,
                    [25.7439, 89.2752],
                    vec![[25.3, 88.8], [25.3, 89.7], [26.2, 89.7], [26.2, 88.8]],
                ),
                Region::new(
                    "region4",
                    "Malaysia (Perak)",
                    0.45,
                    [4.7711, 101.0449],
                    vec![[4.3, 100.6], [4.3, 101.4], [5.2, 101.4], [5.2, 100.6]],
                ),
            ],
        }
    }
}

impl Default for StaticRegionCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl RegionCatalog for StaticRegionCatalog {
    fn all(&self) -> Vec<Region> {
        self.regions.clone()
    }

    fn get_by_identifier(&self, identifier: &str) -> Result<Region, CatalogError> {
        self.regions
            .iter()
            .find(|region| region.identifier == identifier)
            .cloned()
            .ok_or_else(|| CatalogError::RegionNotFound(identifier.to_string()))
    }
}

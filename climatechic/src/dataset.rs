use anyhow::{Context, Result};
use geo::Polygon;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::geo_core::{check_polygon, polygon_from_ring, ring_from_polygon, BoundingBox};

/// Default bound on the number of boundary vertices accepted by the analyzer
pub const DEFAULT_MAX_VERTICES: usize = 10_000;

/// Plant recommended for a biome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloraEntry {
    pub name: String,
    /// Growth form (Tree, Grass, ...)
    #[serde(rename = "type")]
    pub kind: String,
    /// What the plant brings to the flock
    #[serde(alias = "chicken_benefit")]
    pub benefit: String,
}

impl FloraEntry {
    pub fn new(name: &str, kind: &str, benefit: &str) -> Self {
        FloraEntry {
            name: name.to_string(),
            kind: kind.to_string(),
            benefit: benefit.to_string(),
        }
    }
}

/// Named biogeographic region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RegionRecord", into = "RegionRecord")]
pub struct Region {
    /// Display name, unique within a dataset
    pub name: String,
    /// Key into the flora table
    pub biome_key: String,
    pub polygon: Polygon<f64>,
}

impl Region {
    pub fn new(name: &str, biome_key: &str, polygon: Polygon<f64>) -> Self {
        Region {
            name: name.to_string(),
            biome_key: biome_key.to_string(),
            polygon,
        }
    }
}

/// On-disk form of a region: a single exterior ring of `[lon, lat]` positions
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RegionRecord {
    name: String,
    biome_key: String,
    coordinates: Vec<[f64; 2]>,
}

impl TryFrom<RegionRecord> for Region {
    type Error = String;

    fn try_from(record: RegionRecord) -> std::result::Result<Self, Self::Error> {
        let polygon = polygon_from_ring(&record.coordinates);
        check_polygon(&polygon).map_err(|e| format!("region '{}': {}", record.name, e))?;
        Ok(Region {
            name: record.name,
            biome_key: record.biome_key,
            polygon,
        })
    }
}

impl From<Region> for RegionRecord {
    fn from(region: Region) -> Self {
        RegionRecord {
            coordinates: ring_from_polygon(&region.polygon),
            name: region.name,
            biome_key: region.biome_key,
        }
    }
}

/// Multipliers turning a boundary area into projections
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionFactors {
    /// Coordinate-unit area to "hectares"
    pub hectare_scale: f64,
    pub trees_per_hectare: f64,
    pub chickens_per_hectare: f64,
    /// Black soldier fly larvae, kg per week
    pub bsf_kg_per_week_per_hectare: f64,
}

impl Default for ProjectionFactors {
    fn default() -> Self {
        ProjectionFactors {
            hectare_scale: 10_000.0,
            trees_per_hectare: 100.0,
            chickens_per_hectare: 50.0,
            bsf_kg_per_week_per_hectare: 2.0,
        }
    }
}

fn default_max_vertices() -> usize {
    DEFAULT_MAX_VERTICES
}

/// Read-only reference data handed to the analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Candidate regions, evaluated in order
    pub regions: Vec<Region>,
    /// Biome key to recommended plants
    pub flora: BTreeMap<String, Vec<FloraEntry>>,
    /// Biome used when the boundary touches no region
    pub default_biome: String,
    #[serde(default)]
    pub factors: ProjectionFactors,
    #[serde(default = "default_max_vertices")]
    pub max_vertices: usize,
}

impl Dataset {
    /// The two East African demo regions and their flora
    pub fn builtin() -> Self {
        let regions = vec![
            Region::new(
                "Tropical_Rainforest_Region",
                "Tropical_Rainforest",
                BoundingBox::new(33.5, -1.5, 35.5, 1.5).to_polygon(),
            ),
            Region::new(
                "Tropical_Savanna_Region",
                "Tropical_Savanna",
                BoundingBox::new(36.0, -2.0, 38.0, 0.5).to_polygon(),
            ),
        ];

        let mut flora = BTreeMap::new();
        flora.insert(
            "Tropical_Rainforest".to_string(),
            vec![
                FloraEntry::new(
                    "Leucaena leucocephala",
                    "Tree",
                    "High-protein forage, shade",
                ),
                FloraEntry::new("Moringa oleifera", "Tree", "Vitamins, minerals, forage"),
                FloraEntry::new("Paspalum notatum", "Grass", "Ground cover, forage"),
            ],
        );
        flora.insert(
            "Tropical_Savanna".to_string(),
            vec![
                FloraEntry::new("Acacia tortilis", "Tree", "Shade, pods for forage"),
                FloraEntry::new("Cenchrus ciliaris", "Grass", "Drought-resistant forage"),
            ],
        );

        Dataset {
            regions,
            flora,
            default_biome: "Tropical_Savanna".to_string(),
            factors: ProjectionFactors::default(),
            max_vertices: DEFAULT_MAX_VERTICES,
        }
    }

    /// Parse and validate a dataset from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let dataset: Dataset = serde_json::from_str(json).context("Failed to parse dataset JSON")?;
        dataset.validate()?;
        Ok(dataset)
    }

    /// Load a dataset from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .context(format!("Failed to read dataset file: {:?}", path))?;
        Self::from_json_str(&json).context(format!("Invalid dataset file: {:?}", path))
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize dataset")
    }

    /// Check the invariants the analyzer relies on
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for region in &self.regions {
            if !seen.insert(region.name.as_str()) {
                anyhow::bail!("Duplicate region name: {}", region.name);
            }
        }

        let f = &self.factors;
        if !(f.hectare_scale.is_finite() && f.hectare_scale > 0.0) {
            anyhow::bail!("hectare_scale must be positive, got {}", f.hectare_scale);
        }
        for (label, value) in [
            ("trees_per_hectare", f.trees_per_hectare),
            ("chickens_per_hectare", f.chickens_per_hectare),
            ("bsf_kg_per_week_per_hectare", f.bsf_kg_per_week_per_hectare),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                anyhow::bail!("{} must be a non-negative number, got {}", label, value);
            }
        }

        if self.max_vertices == 0 {
            anyhow::bail!("max_vertices must be at least 1");
        }

        Ok(())
    }

    /// Plants for a biome, empty when the key has no entry
    pub fn flora_for(&self, biome_key: &str) -> &[FloraEntry] {
        match self.flora.get(biome_key) {
            Some(entries) => entries.as_slice(),
            None => {
                tracing::debug!(biome_key, "no flora entry for biome");
                &[]
            }
        }
    }

    pub fn region(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name == name)
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::builtin()
    }
}

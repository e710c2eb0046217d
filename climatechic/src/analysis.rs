use geo::{Area, BooleanOps, Intersects, MultiPolygon};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::commons::basic_functions::{round_to, truncate_count};
use crate::dataset::{Dataset, FloraEntry};
use crate::geo_core::Boundary;

/// Attached to every plan: areas are measured on raw lon/lat degrees
pub const PLANAR_AREA_NOTE: &str = "Area is computed on unprojected longitude/latitude \
coordinates and scaled by a fixed factor; hectare figures ignore latitude distortion \
and are an approximation.";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("invalid boundary: {0}")]
    InvalidBoundary(String),
}

/// Area-derived projections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    /// Rounded to 2 decimals
    pub land_area_hectares: f64,
    pub estimated_trees_year_5: u64,
    pub estimated_chickens_year_2: u64,
    pub black_soldier_fly_production_kg_week: u64,
    /// Rounded to 1 decimal, in [0, 100]
    pub region_overlap_percentage: f64,
}

/// Restoration plan for one boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Biome key the flora was looked up with
    pub biogeographic_region: String,
    /// Name of the winning region, None when the default biome was used
    pub matched_region: Option<String>,
    pub recommended_flora: Vec<FloraEntry>,
    pub simulation: Simulation,
    pub notes: Vec<String>,
}

/// Overlap of the merged boundary with one region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionOverlap<'a> {
    pub region_name: &'a str,
    pub biome_key: &'a str,
    /// Unrounded, 0..=100
    pub percentage: f64,
}

/// Analyze a boundary against the regions and flora of a dataset
///
/// The boundary pieces are merged first, so overlapping pieces are not double
/// counted. Regions are scored by the share of the merged boundary they cover;
/// the first region reaching the highest share wins. When no region is touched
/// the dataset's default biome is used.
pub fn analyze(boundary: &Boundary, dataset: &Dataset) -> Result<Plan, AnalysisError> {
    let vertices = boundary.vertex_count();
    if vertices > dataset.max_vertices {
        return Err(AnalysisError::InvalidBoundary(format!(
            "{} vertices exceeds the limit of {}",
            vertices, dataset.max_vertices
        )));
    }

    let raw_area = boundary.raw_area();
    if !(raw_area > 0.0) {
        return Err(AnalysisError::InvalidBoundary(format!(
            "area must be positive, got {}",
            raw_area
        )));
    }

    let combined = boundary.merged();
    let area = combined.unsigned_area();
    if !(area.is_finite() && area > 0.0) {
        return Err(AnalysisError::InvalidBoundary(format!(
            "merged area must be positive, got {}",
            area
        )));
    }

    let best = best_overlap(&combined, area, dataset);

    let (biome_key, matched_region, overlap) = match best {
        Some(hit) => (
            hit.biome_key.to_string(),
            Some(hit.region_name.to_string()),
            hit.percentage,
        ),
        None => (dataset.default_biome.clone(), None, 0.0),
    };

    tracing::info!(
        biome = %biome_key,
        overlap = overlap,
        "selected biogeographic region"
    );

    let factors = &dataset.factors;
    let hectares = area * factors.hectare_scale;

    Ok(Plan {
        recommended_flora: dataset.flora_for(&biome_key).to_vec(),
        biogeographic_region: biome_key,
        matched_region,
        simulation: Simulation {
            land_area_hectares: round_to(hectares, 2),
            estimated_trees_year_5: truncate_count(hectares * factors.trees_per_hectare),
            estimated_chickens_year_2: truncate_count(hectares * factors.chickens_per_hectare),
            black_soldier_fly_production_kg_week: truncate_count(
                hectares * factors.bsf_kg_per_week_per_hectare,
            ),
            region_overlap_percentage: round_to(overlap, 1),
        },
        notes: vec![PLANAR_AREA_NOTE.to_string()],
    })
}

/// Share of the merged boundary covered by every region it touches, in region order
pub fn region_overlaps<'a>(
    combined: &MultiPolygon<f64>,
    combined_area: f64,
    dataset: &'a Dataset,
) -> Vec<RegionOverlap<'a>> {
    dataset
        .regions
        .iter()
        .filter(|region| combined.intersects(&region.polygon))
        .map(|region| {
            let shared = combined
                .intersection(&MultiPolygon::new(vec![region.polygon.clone()]))
                .unsigned_area();
            let percentage = (shared / combined_area * 100.0).clamp(0.0, 100.0);
            tracing::debug!(region = %region.name, percentage, "region overlap");
            RegionOverlap {
                region_name: &region.name,
                biome_key: &region.biome_key,
                percentage,
            }
        })
        .collect()
}

/// Highest-scoring region, ties going to the earlier one
/// A region touching only along an edge (0% overlap) never wins
fn best_overlap<'a>(
    combined: &MultiPolygon<f64>,
    combined_area: f64,
    dataset: &'a Dataset,
) -> Option<RegionOverlap<'a>> {
    let mut best: Option<RegionOverlap<'a>> = None;
    let mut max_overlap = 0.0;
    for overlap in region_overlaps(combined, combined_area, dataset) {
        if overlap.percentage > max_overlap {
            max_overlap = overlap.percentage;
            best = Some(overlap);
        }
    }
    best
}

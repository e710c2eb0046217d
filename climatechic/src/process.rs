use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::analysis::{analyze, Plan};
use crate::boundary::boundary_from_geojson_file;
use crate::commons::global_variables::REPORT_SUFFIX;
use crate::dataset::Dataset;
use crate::report::generate_plan_report;

/// Result of processing one boundary file
#[derive(Debug, Clone)]
pub struct ProcessedBoundary {
    pub plan: Plan,
    pub report: String,
    /// Where the report text was saved
    pub report_path: PathBuf,
}

/// `<dir>/<stem>_report.txt` next to the boundary file
pub fn default_report_path(geojson_path: &Path) -> PathBuf {
    let stem = geojson_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "boundary".to_string());
    geojson_path.with_file_name(format!("{}{}", stem, REPORT_SUFFIX))
}

/// Load a GeoJSON boundary, analyze it and save the text report
pub fn process_geojson_file(
    geojson_path: &Path,
    dataset: &Dataset,
    report_path: Option<&Path>,
) -> Result<ProcessedBoundary> {
    tracing::info!(path = %geojson_path.display(), "processing boundary");

    let boundary = boundary_from_geojson_file(geojson_path)?;
    let plan = analyze(&boundary, dataset)
        .context(format!("Analysis failed for {:?}", geojson_path))?;
    let report = generate_plan_report(&plan);

    let report_path = report_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_report_path(geojson_path));
    std::fs::write(&report_path, &report)
        .context(format!("Failed to write report: {:?}", report_path))?;

    tracing::info!(report = %report_path.display(), "analysis complete");

    Ok(ProcessedBoundary {
        plan,
        report,
        report_path,
    })
}

use anyhow::{Context, Result};
use geo::{Geometry as GeoGeometry, Polygon};
use geojson::{Feature, GeoJson, Geometry, Value};
use std::path::Path;

use crate::analysis::AnalysisError;
use crate::geo_core::Boundary;

/// Load a boundary from a GeoJSON file
pub fn boundary_from_geojson_file<P: AsRef<Path>>(path: P) -> Result<Boundary> {
    let path = path.as_ref();
    let data = std::fs::read(path).context(format!("Failed to read GeoJSON file: {:?}", path))?;
    boundary_from_geojson_bytes(&data)
}

/// Load a boundary from GeoJSON bytes
pub fn boundary_from_geojson_bytes(geojson_data: &[u8]) -> Result<Boundary> {
    let geojson_str =
        std::str::from_utf8(geojson_data).context("GeoJSON data is not valid UTF-8")?;
    boundary_from_geojson_str(geojson_str)
}

/// Load a boundary from GeoJSON text
pub fn boundary_from_geojson_str(geojson_str: &str) -> Result<Boundary> {
    let geojson: GeoJson = geojson_str.parse().context("Failed to parse GeoJSON")?;
    boundary_from_geojson(&geojson)
}

/// Collect every polygon of a GeoJSON document into a boundary
///
/// FeatureCollection, Feature and bare Geometry documents are accepted.
/// Polygon and MultiPolygon geometries (also nested in a GeometryCollection)
/// are kept; other geometries are skipped with a warning.
pub fn boundary_from_geojson(geojson: &GeoJson) -> Result<Boundary> {
    let mut polygons = Vec::new();

    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for (idx, feature) in fc.features.iter().enumerate() {
                collect_feature(feature, &mut polygons)
                    .context(format!("Failed to read feature {}", idx))?;
            }
        }
        GeoJson::Feature(feature) => collect_feature(feature, &mut polygons)?,
        GeoJson::Geometry(geometry) => collect_geometry(geometry, &mut polygons)?,
    }

    if polygons.is_empty() {
        return Err(AnalysisError::InvalidBoundary(
            "GeoJSON contains no Polygon or MultiPolygon geometry".to_string(),
        )
        .into());
    }

    tracing::debug!(polygons = polygons.len(), "boundary loaded");
    Ok(Boundary::new(polygons)?)
}

fn collect_feature(feature: &Feature, polygons: &mut Vec<Polygon<f64>>) -> Result<()> {
    match feature.geometry.as_ref() {
        Some(geometry) => collect_geometry(geometry, polygons),
        None => {
            tracing::warn!("skipping feature without geometry");
            Ok(())
        }
    }
}

fn collect_geometry(geometry: &Geometry, polygons: &mut Vec<Polygon<f64>>) -> Result<()> {
    // The geo conversion indexes positions directly, so short ones must be caught first
    if let Some(reason) = malformed_positions(&geometry.value) {
        return Err(AnalysisError::InvalidBoundary(reason).into());
    }

    let geo_geom: GeoGeometry<f64> = geometry
        .try_into()
        .context("Failed to convert GeoJSON geometry to geo::Geometry")?;
    push_polygons(geo_geom, polygons);
    Ok(())
}

fn push_polygons(geom: GeoGeometry<f64>, polygons: &mut Vec<Polygon<f64>>) {
    match geom {
        GeoGeometry::Polygon(poly) => polygons.push(poly),
        GeoGeometry::MultiPolygon(mp) => polygons.extend(mp.0),
        GeoGeometry::Rect(rect) => polygons.push(rect.to_polygon()),
        GeoGeometry::GeometryCollection(gc) => {
            for inner in gc.0 {
                push_polygons(inner, polygons);
            }
        }
        _ => tracing::warn!("skipping non-polygonal geometry"),
    }
}

/// Reason the positions of a polygonal value are unusable, if any
fn malformed_positions(value: &Value) -> Option<String> {
    let check = |rings: &Vec<Vec<Vec<f64>>>| {
        rings
            .iter()
            .flatten()
            .find(|position| position.len() < 2)
            .map(|position| {
                format!(
                    "position {:?} needs at least a longitude and a latitude",
                    position
                )
            })
    };

    match value {
        Value::Polygon(rings) => check(rings),
        Value::MultiPolygon(polys) => polys.iter().find_map(|rings| check(rings)),
        Value::GeometryCollection(geometries) => geometries
            .iter()
            .find_map(|geometry| malformed_positions(&geometry.value)),
        _ => None,
    }
}

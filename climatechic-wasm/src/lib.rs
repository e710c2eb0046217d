use anyhow::Result;
use climatechic::analysis::{analyze, Plan};
use climatechic::boundary::boundary_from_geojson_str;
use climatechic::dataset::Dataset;
use climatechic::report::{generate_plan_report, plan_to_json};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Initialize the WASM module with panic hook
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Headline numbers shown next to the drawing
#[derive(Debug, Clone, PartialEq, Serialize)]
struct PlanSummary {
    region: String,
    hectares: f64,
    overlap_percentage: f64,
    flora_count: usize,
}

impl From<&Plan> for PlanSummary {
    fn from(plan: &Plan) -> Self {
        PlanSummary {
            region: plan.biogeographic_region.clone(),
            hectares: plan.simulation.land_area_hectares,
            overlap_percentage: plan.simulation.region_overlap_percentage,
            flora_count: plan.recommended_flora.len(),
        }
    }
}

/// Analyzer bound to a dataset, reused across drawings
#[wasm_bindgen]
pub struct WasmAnalyzer {
    dataset: Dataset,
}

#[wasm_bindgen]
impl WasmAnalyzer {
    /// Analyzer over the built-in demo regions
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            dataset: Dataset::builtin(),
        }
    }

    /// Analyzer over a dataset given as JSON
    ///
    /// # Errors
    /// Returns JsValue error if the dataset is malformed
    #[wasm_bindgen]
    pub fn from_dataset_json(dataset_json: &str) -> Result<WasmAnalyzer, JsValue> {
        let dataset = Dataset::from_json_str(dataset_json).map_err(to_js_error)?;
        Ok(Self { dataset })
    }

    /// Plan for a drawn boundary, as a JS object
    ///
    /// # Errors
    /// Returns JsValue error if the GeoJSON is invalid or the boundary has no area
    #[wasm_bindgen]
    pub fn analyze(&self, geojson_str: &str) -> Result<JsValue, JsValue> {
        let plan = plan_for(geojson_str, &self.dataset).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&plan)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Plan for a drawn boundary, as the plain-text report
    #[wasm_bindgen]
    pub fn report(&self, geojson_str: &str) -> Result<String, JsValue> {
        let plan = plan_for(geojson_str, &self.dataset).map_err(to_js_error)?;
        Ok(generate_plan_report(&plan))
    }

    /// Plan for a drawn boundary, as pretty-printed JSON
    #[wasm_bindgen]
    pub fn plan_json(&self, geojson_str: &str) -> Result<String, JsValue> {
        let plan = plan_for(geojson_str, &self.dataset).map_err(to_js_error)?;
        plan_to_json(&plan).map_err(to_js_error)
    }

    /// Region, hectares, overlap and flora count for a drawn boundary
    #[wasm_bindgen]
    pub fn summary(&self, geojson_str: &str) -> Result<JsValue, JsValue> {
        let plan = plan_for(geojson_str, &self.dataset).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&PlanSummary::from(&plan))
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Regions as a GeoJSON FeatureCollection, for overlaying on the map
    #[wasm_bindgen]
    pub fn regions_geojson(&self) -> String {
        regions_to_geojson(&self.dataset).to_string()
    }
}

impl Default for WasmAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Text report for a drawn boundary using the built-in regions
#[wasm_bindgen]
pub fn plan_report(geojson_str: &str) -> Result<String, JsValue> {
    WasmAnalyzer::new().report(geojson_str)
}

fn plan_for(geojson_str: &str, dataset: &Dataset) -> Result<Plan> {
    let boundary = boundary_from_geojson_str(geojson_str)?;
    Ok(analyze(&boundary, dataset)?)
}

fn regions_to_geojson(dataset: &Dataset) -> GeoJson {
    let features = dataset
        .regions
        .iter()
        .map(|region| {
            let mut feature = Feature::from(Geometry::new(geojson::Value::from(&region.polygon)));
            feature.set_property("name", region.name.clone());
            feature.set_property("biome_key", region.biome_key.clone());
            feature
        })
        .collect();

    GeoJson::from(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

fn to_js_error(e: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{:#}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAVANNA_PLOT: &str = r#"{
        "type": "Feature",
        "properties": {},
        "geometry": {
            "type": "Polygon",
            "coordinates": [[[36.5, -1.5], [37.0, -1.5], [37.0, -1.0], [36.5, -1.0], [36.5, -1.5]]]
        }
    }"#;

    #[test]
    fn test_plan_for_builtin_dataset() {
        let plan = plan_for(SAVANNA_PLOT, &Dataset::builtin()).unwrap();
        assert_eq!(plan.biogeographic_region, "Tropical_Savanna");

        let summary = PlanSummary::from(&plan);
        assert_eq!(summary.hectares, 2500.0);
        assert_eq!(summary.overlap_percentage, 100.0);
        assert_eq!(summary.flora_count, 2);
    }

    #[test]
    fn test_plan_for_invalid_geojson() {
        let err = plan_for("not geojson", &Dataset::builtin()).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse GeoJSON"));
    }

    #[test]
    fn test_report_via_analyzer() {
        let report = WasmAnalyzer::new().report(SAVANNA_PLOT).unwrap();
        assert!(report.contains("* Acacia tortilis (Tree) - Shade, pods for forage\n"));
    }

    #[test]
    fn test_regions_geojson() {
        let geojson = regions_to_geojson(&Dataset::builtin());
        match geojson {
            GeoJson::FeatureCollection(fc) => {
                assert_eq!(fc.features.len(), 2);
                assert_eq!(
                    fc.features[0].property("biome_key").and_then(|v| v.as_str()),
                    Some("Tropical_Rainforest")
                );
            }
            _ => panic!("expected a FeatureCollection"),
        }
    }
}

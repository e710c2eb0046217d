use anyhow::{Context, Result};
use std::fmt;

use crate::analysis::Plan;

pub const REPORT_TITLE: &str = "CLIMATECHIC RESTORATION PLAN";

/// Fixed schedule printed at the end of every plan
pub const OPERATIONAL_GUIDELINES: [&str; 4] = [
    "Months 1-3: Soil preparation and pioneer species planting",
    "Months 4-6: Introduce nitrogen-fixing plants and cover crops",
    "Months 7-12: Establish poultry infrastructure and initial flock",
    "Year 2: Scale integrated systems and value-added production",
];

/// Fifty `=` characters, used under the title and around printed reports
pub fn rule() -> String {
    "=".repeat(50)
}

/// Plain-text restoration report for a plan
pub struct PlanReport<'a>(pub &'a Plan);

impl fmt::Display for PlanReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan = self.0;
        let sim = &plan.simulation;

        writeln!(f, "{}", REPORT_TITLE)?;
        writeln!(f, "{}", rule())?;
        writeln!(f, "Region: {}", plan.biogeographic_region)?;
        writeln!(f, "Area: {:.2} hectares", sim.land_area_hectares)?;
        writeln!(f, "Region Overlap: {:.1}%", sim.region_overlap_percentage)?;
        writeln!(f)?;
        writeln!(f, "RECOMMENDED FLORA:")?;
        for flora in &plan.recommended_flora {
            writeln!(f, "* {} ({}) - {}", flora.name, flora.kind, flora.benefit)?;
        }
        writeln!(f)?;
        writeln!(f, "PROJECTIONS:")?;
        writeln!(f, "* Trees (Year 5): {}", sim.estimated_trees_year_5)?;
        writeln!(f, "* Chickens (Year 2): {}", sim.estimated_chickens_year_2)?;
        writeln!(
            f,
            "* BSF Production: {} kg/week",
            sim.black_soldier_fly_production_kg_week
        )?;
        writeln!(f)?;
        writeln!(f, "OPERATIONAL GUIDELINES:")?;
        for line in OPERATIONAL_GUIDELINES {
            writeln!(f, "* {}", line)?;
        }
        Ok(())
    }
}

/// Render a plan as the plain-text restoration report
pub fn generate_plan_report(plan: &Plan) -> String {
    PlanReport(plan).to_string()
}

/// Render a plan as pretty-printed JSON
pub fn plan_to_json(plan: &Plan) -> Result<String> {
    serde_json::to_string_pretty(plan).context("Failed to serialize plan to JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze, Simulation};
    use crate::dataset::{Dataset, FloraEntry};
    use crate::geo_core::{Boundary, BoundingBox};

    fn sample_plan() -> Plan {
        Plan {
            biogeographic_region: "Tropical_Rainforest".to_string(),
            matched_region: Some("Tropical_Rainforest_Region".to_string()),
            recommended_flora: vec![
                FloraEntry::new("Moringa oleifera", "Tree", "Vitamins, minerals, forage"),
                FloraEntry::new("Paspalum notatum", "Grass", "Ground cover, forage"),
            ],
            simulation: Simulation {
                land_area_hectares: 2500.0,
                estimated_trees_year_5: 250000,
                estimated_chickens_year_2: 125000,
                black_soldier_fly_production_kg_week: 5000,
                region_overlap_percentage: 100.0,
            },
            notes: vec![],
        }
    }

    #[test]
    fn test_report_layout() {
        let expected = "\
CLIMATECHIC RESTORATION PLAN
==================================================
Region: Tropical_Rainforest
Area: 2500.00 hectares
Region Overlap: 100.0%

RECOMMENDED FLORA:
* Moringa oleifera (Tree) - Vitamins, minerals, forage
* Paspalum notatum (Grass) - Ground cover, forage

PROJECTIONS:
* Trees (Year 5): 250000
* Chickens (Year 2): 125000
* BSF Production: 5000 kg/week

OPERATIONAL GUIDELINES:
* Months 1-3: Soil preparation and pioneer species planting
* Months 4-6: Introduce nitrogen-fixing plants and cover crops
* Months 7-12: Establish poultry infrastructure and initial flock
* Year 2: Scale integrated systems and value-added production
";
        assert_eq!(generate_plan_report(&sample_plan()), expected);
    }

    #[test]
    fn test_report_display_matches_generated() {
        let plan = sample_plan();
        assert_eq!(format!("{}", PlanReport(&plan)), generate_plan_report(&plan));
    }

    #[test]
    fn test_report_without_flora() {
        let mut plan = sample_plan();
        plan.recommended_flora.clear();
        let report = generate_plan_report(&plan);
        assert!(report.contains("RECOMMENDED FLORA:\n\nPROJECTIONS:"));
    }

    #[test]
    fn test_report_from_analysis() {
        let boundary =
            Boundary::from_polygon(BoundingBox::new(34.0, 0.0, 34.25, 0.1).to_polygon()).unwrap();
        let plan = analyze(&boundary, &Dataset::builtin()).unwrap();
        let report = generate_plan_report(&plan);
        assert!(report.contains("Region: Tropical_Rainforest\n"));
        assert!(report.contains("Area: 250.00 hectares\n"));
        assert!(report.contains("* Leucaena leucocephala (Tree) - High-protein forage, shade\n"));
    }

    #[test]
    fn test_plan_json() {
        let json = plan_to_json(&sample_plan()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["biogeographic_region"], "Tropical_Rainforest");
        assert_eq!(value["simulation"]["estimated_trees_year_5"], 250000);
        assert_eq!(value["recommended_flora"][0]["type"], "Tree");

        let parsed: Plan = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample_plan());
    }
}

// Example: analyzing a farm boundary drawn near the Kenya rainforest/savanna edge
// The boundary straddles both demo regions, so the larger share decides the biome
use anyhow::Result;
use climatechic::analysis::{analyze, region_overlaps};
use climatechic::boundary::boundary_from_geojson_str;
use climatechic::dataset::Dataset;
use climatechic::report::{generate_plan_report, plan_to_json};
use geo::Area;

fn main() -> Result<()> {
    println!("=== Example: Analyzing a boundary from GeoJSON ===\n");

    let geojson_data = r#"
    {
        "type": "Feature",
        "properties": {"name": "Shamba A"},
        "geometry": {
            "type": "Polygon",
            "coordinates": [[
                [35.3, -0.40],
                [36.4, -0.40],
                [36.4, -0.35],
                [35.3, -0.35],
                [35.3, -0.40]
            ]]
        }
    }
    "#;

    let boundary = boundary_from_geojson_str(geojson_data)?;
    let dataset = Dataset::builtin();

    println!("Polygons loaded: {}", boundary.len());
    println!("Vertices: {}", boundary.vertex_count());

    let combined = boundary.merged();
    println!("\nOverlap per region:");
    for overlap in region_overlaps(&combined, combined.unsigned_area(), &dataset) {
        println!(
            "  - {} ({}): {:.1}%",
            overlap.region_name, overlap.biome_key, overlap.percentage
        );
    }

    let plan = analyze(&boundary, &dataset)?;
    println!("\n{}", generate_plan_report(&plan));

    println!("Plan as JSON:");
    println!("{}", plan_to_json(&plan)?);

    Ok(())
}

/// Default output of the full drawing tool
pub const DRAWING_TOOL_FILENAME: &str = "climatechic_drawing_tool.html";
/// Default output of the click-to-draw page
pub const SIMPLE_MAP_FILENAME: &str = "simple_map.html";
/// Name given to the GeoJSON downloaded from the drawing pages
pub const DOWNLOAD_FILENAME: &str = "farm_boundary.geojson";
/// Suffix appended to the boundary file stem for the saved report
pub const REPORT_SUFFIX: &str = "_report.txt";

/// Drawing tool centre (Nairobi, Kenya) as (lat, lon)
pub const DEFAULT_CENTER: (f64, f64) = (-1.225, 36.775);
/// Click-to-draw page centre as (lat, lon)
pub const SIMPLE_MAP_CENTER: (f64, f64) = (-1.286, 36.817);
pub const DEFAULT_ZOOM: u8 = 12;

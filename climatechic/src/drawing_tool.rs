use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::commons::global_variables::{
    DEFAULT_CENTER, DEFAULT_ZOOM, DOWNLOAD_FILENAME, DRAWING_TOOL_FILENAME, SIMPLE_MAP_CENTER,
    SIMPLE_MAP_FILENAME,
};

/// Which drawing page to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapStyle {
    /// Base layers, draw and edit controls, export button, area readout
    Full,
    /// Click to add vertices, right-click to download
    Simple,
}

/// Self-contained Leaflet page for drawing a farm boundary
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingTool {
    pub style: MapStyle,
    /// (lat, lon)
    pub center: (f64, f64),
    pub zoom: u8,
}

impl DrawingTool {
    pub fn new(style: MapStyle) -> Self {
        let center = match style {
            MapStyle::Full => DEFAULT_CENTER,
            MapStyle::Simple => SIMPLE_MAP_CENTER,
        };
        DrawingTool {
            style,
            center,
            zoom: DEFAULT_ZOOM,
        }
    }

    pub fn with_center(mut self, lat: f64, lon: f64) -> Self {
        self.center = (lat, lon);
        self
    }

    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom;
        self
    }

    /// File name used when no output path is given
    pub fn default_filename(&self) -> &'static str {
        match self.style {
            MapStyle::Full => DRAWING_TOOL_FILENAME,
            MapStyle::Simple => SIMPLE_MAP_FILENAME,
        }
    }

    /// Render the HTML page
    pub fn render(&self) -> String {
        let template = match self.style {
            MapStyle::Full => FULL_TEMPLATE,
            MapStyle::Simple => SIMPLE_TEMPLATE,
        };
        template
            .replace("{{CENTER_LAT}}", &self.center.0.to_string())
            .replace("{{CENTER_LON}}", &self.center.1.to_string())
            .replace("{{ZOOM}}", &self.zoom.to_string())
            .replace("{{DOWNLOAD_NAME}}", DOWNLOAD_FILENAME)
    }

    /// Write the page, defaulting to `default_filename()` in the working directory
    pub fn write(&self, output: Option<&Path>) -> Result<PathBuf> {
        let path = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(self.default_filename()));

        std::fs::write(&path, self.render())
            .context(format!("Failed to write drawing tool: {:?}", path))?;

        tracing::info!(path = %path.display(), "drawing tool created");
        Ok(path)
    }
}

impl Default for DrawingTool {
    fn default() -> Self {
        Self::new(MapStyle::Full)
    }
}

const FULL_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8" />
    <title>ClimateChic Drawing Tool</title>
    <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
    <link rel="stylesheet" href="https://unpkg.com/leaflet-draw@1.0.4/dist/leaflet.draw.css" />
    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
    <script src="https://unpkg.com/leaflet-draw@1.0.4/dist/leaflet.draw.js"></script>
    <style>
        html, body { margin: 0; padding: 0; }
        #map { height: 100vh; width: 100%; }
        .tools { position: fixed; bottom: 20px; left: 20px; z-index: 1000; background: white;
                 padding: 10px; border-radius: 5px; box-shadow: 0 0 10px rgba(0,0,0,0.2); }
        .tools button { margin-top: 6px; }
        .measure { position: fixed; top: 10px; left: 60px; z-index: 1000; background: white;
                   padding: 4px 8px; border-radius: 4px; font-family: sans-serif; }
    </style>
</head>
<body>
    <div id="map"></div>
    <div class="tools">
        <h4>ClimateChic Tools</h4>
        <p>1. Draw your boundary</p>
        <p>2. Click download button to save GeoJSON</p>
        <p>3. Run: climatechic analyze YOUR_FILE.geojson</p>
        <button id="export">Download GeoJSON</button>
    </div>
    <div class="measure" id="measure">Area: -</div>

    <script>
        const map = L.map('map').setView([{{CENTER_LAT}}, {{CENTER_LON}}], {{ZOOM}});

        const osm = L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {
            attribution: '&copy; OpenStreetMap contributors'
        });
        const baseLayers = {
            'Satellite': L.tileLayer('https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}', {
                attribution: 'Esri'
            }),
            'Terrain': L.tileLayer('https://server.arcgisonline.com/ArcGIS/rest/services/World_Shaded_Relief/MapServer/tile/{z}/{y}/{x}', {
                attribution: 'Esri'
            }),
            'Dark Mode': L.tileLayer('https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png', {
                attribution: '&copy; CartoDB'
            }),
            'Street Map': osm
        };
        osm.addTo(map);

        const drawnItems = new L.FeatureGroup();
        map.addLayer(drawnItems);
        L.control.layers(baseLayers, { 'Boundary': drawnItems }).addTo(map);

        const drawControl = new L.Control.Draw({
            draw: {
                polyline: false,
                rectangle: true,
                circle: false,
                marker: false,
                circlemarker: false,
                polygon: true
            },
            edit: { featureGroup: drawnItems, edit: true }
        });
        map.addControl(drawControl);

        function updateMeasure() {
            let total = 0;
            drawnItems.eachLayer(function (layer) {
                total += L.GeometryUtil.geodesicArea(layer.getLatLngs()[0]);
            });
            document.getElementById('measure').textContent =
                'Area: ' + (total / 10000).toFixed(2) + ' ha';
        }

        map.on(L.Draw.Event.CREATED, function (e) {
            drawnItems.addLayer(e.layer);
            updateMeasure();
        });
        map.on(L.Draw.Event.EDITED, updateMeasure);
        map.on(L.Draw.Event.DELETED, updateMeasure);

        document.getElementById('export').onclick = function () {
            const data = drawnItems.toGeoJSON();
            const dataStr = 'data:text/json;charset=utf-8,' + encodeURIComponent(JSON.stringify(data));
            const anchor = document.createElement('a');
            anchor.setAttribute('href', dataStr);
            anchor.setAttribute('download', '{{DOWNLOAD_NAME}}');
            document.body.appendChild(anchor);
            anchor.click();
            anchor.remove();
        };

        const instructions = '<h3>ClimateChic Instructions</h3>' +
            '<ol>' +
            '<li>Use drawing tools to create your farm boundary</li>' +
            '<li>Click the download button to save as GeoJSON</li>' +
            '<li>Run the analysis on the downloaded file</li>' +
            '</ol>';
        L.marker([{{CENTER_LAT}}, {{CENTER_LON}}], {
            icon: L.divIcon({ html: '<div style="font-size: 24px; color: green;">!</div>', className: '' })
        }).bindPopup(instructions, { maxWidth: 300 }).addTo(map);
    </script>
</body>
</html>
"#;

const SIMPLE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8" />
    <title>ClimateChic Simple</title>
    <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
    <style>
        #map { height: 100vh; width: 100%; }
        .info { position: absolute; top: 10px; right: 10px; background: white; padding: 10px; z-index: 1000; }
    </style>
</head>
<body>
    <div id="map"></div>
    <div class="info">
        <h3>Draw your farm boundary</h3>
        <p>Click to add points, right-click to save as GeoJSON</p>
        <p>Then run: climatechic analyze {{DOWNLOAD_NAME}}</p>
    </div>

    <script>
        const map = L.map('map').setView([{{CENTER_LAT}}, {{CENTER_LON}}], {{ZOOM}});
        L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png').addTo(map);

        const drawnItems = new L.FeatureGroup();
        map.addLayer(drawnItems);
        let polygon = null;

        map.on('click', function (e) {
            if (!polygon) {
                polygon = L.polygon([e.latlng]);
                drawnItems.addLayer(polygon);
            } else {
                polygon.addLatLng(e.latlng);
            }
        });

        map.on('contextmenu', function () {
            if (polygon) {
                const geoJSON = polygon.toGeoJSON();
                const dataStr = 'data:text/json;charset=utf-8,' + encodeURIComponent(JSON.stringify(geoJSON));
                const anchor = document.createElement('a');
                anchor.setAttribute('href', dataStr);
                anchor.setAttribute('download', '{{DOWNLOAD_NAME}}');
                document.body.appendChild(anchor);
                anchor.click();
                anchor.remove();
                polygon = null;
            }
        });
    </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_full_page() {
        let html = DrawingTool::default().render();
        assert!(html.contains("setView([-1.225, 36.775], 12)"));
        assert!(html.contains("L.Control.Draw"));
        assert!(html.contains("polyline: false"));
        assert!(html.contains("'Satellite'"));
        assert!(html.contains("'Dark Mode'"));
        assert!(html.contains("farm_boundary.geojson"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_simple_page() {
        let tool = DrawingTool::new(MapStyle::Simple);
        assert_eq!(tool.default_filename(), "simple_map.html");
        let html = tool.render();
        assert!(html.contains("setView([-1.286, 36.817], 12)"));
        assert!(html.contains("contextmenu"));
        assert!(!html.contains("L.Control.Draw"));
    }

    #[test]
    fn test_custom_center() {
        let html = DrawingTool::default()
            .with_center(0.5, 34.5)
            .with_zoom(9)
            .render();
        assert!(html.contains("setView([0.5, 34.5], 9)"));
        assert!(html.contains("L.marker([0.5, 34.5]"));
    }

    #[test]
    fn test_write() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("tool.html");
        let path = DrawingTool::default().write(Some(&target)).unwrap();
        assert_eq!(path, target);
        let html = std::fs::read_to_string(path).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
    }
}

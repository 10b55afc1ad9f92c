//! The interactive map collaborator and its Leaflet implementation.
//!
//! [`InteractiveMap`] mirrors the Leaflet object model (base layer, markers
//! with popups, controls) and exports to JSON or to a standalone HTML page.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{FrqvizError, Result};
use crate::heatmap::plotly::escape_html;

/// Leaflet stylesheet referenced by exported pages
pub const LEAFLET_CSS_URL: &str = "https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.css";
/// Leaflet script referenced by exported pages
pub const LEAFLET_JS_URL: &str = "https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.js";

/// A (latitude, longitude) pair, serialized as `[lat, lng]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng(pub f64, pub f64);

impl LatLng {
    pub fn lat(&self) -> f64 {
        self.0
    }

    pub fn lng(&self) -> f64 {
        self.1
    }
}

/// Tile layer under the markers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseMap {
    pub name: String,
    pub url: String,
    pub attribution: String,
    pub max_zoom: u8,
}

impl BaseMap {
    /// OpenStreetMap Mapnik tiles
    pub fn open_street_map() -> Self {
        Self {
            name: "OpenStreetMap.Mapnik".to_string(),
            url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution:
                "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors"
                    .to_string(),
            max_zoom: 19,
        }
    }
}

impl Default for BaseMap {
    fn default() -> Self {
        Self::open_street_map()
    }
}

/// Popup attached to a marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    /// HTML content
    pub content: String,
    pub close_button: bool,
    pub auto_close: bool,
    pub close_on_escape_key: bool,
}

/// Map marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub location: LatLng,
    pub draggable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popup: Option<Popup>,
}

/// Corner a control is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Map controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Control {
    /// Distance scale indicator
    Scale { position: ControlPosition },
}

/// Something markers and controls can be added to
pub trait MapCanvas {
    fn add_layer(&mut self, marker: Marker);

    fn add_control(&mut self, control: Control);
}

/// Creates maps
pub trait MapBackend {
    type Map: MapCanvas;

    fn create_map(&self, basemap: BaseMap, center: LatLng, zoom: u8) -> Self::Map;
}

/// A populated interactive map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractiveMap {
    pub basemap: BaseMap,
    pub center: LatLng,
    pub zoom: u8,
    pub layers: Vec<Marker>,
    pub controls: Vec<Control>,
}

impl InteractiveMap {
    pub fn markers(&self) -> &[Marker] {
        &self.layers
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    /// Map as a JSON document
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Map as a standalone HTML page loading Leaflet
    pub fn to_html(&self) -> Result<String> {
        let spec = serde_json::to_string(self)?.replace("</", "<\\/");

        Ok(format!(
            r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <meta name="generator" content="frqviz {version}" />
  <meta name="created" content="{created}" />
  <title>{title}</title>
  <link rel="stylesheet" href="{css}" crossorigin="anonymous" />
  <script src="{js}" crossorigin="anonymous"></script>
  <style>
    html, body {{ height: 100%; margin: 0; }}
    #frqviz-map {{ height: 100%; width: 100%; }}
  </style>
</head>
<body>
  <div id="frqviz-map"></div>
  <script>
    const spec = {spec};
    const map = L.map("frqviz-map").setView(spec.center, spec.zoom);
    L.tileLayer(spec.basemap.url, {{
      attribution: spec.basemap.attribution,
      maxZoom: spec.basemap.max_zoom,
    }}).addTo(map);
    for (const layer of spec.layers) {{
      const marker = L.marker(layer.location, {{ draggable: layer.draggable }});
      if (layer.popup) {{
        marker.bindPopup(layer.popup.content, {{
          closeButton: layer.popup.close_button,
          autoClose: layer.popup.auto_close,
          closeOnEscapeKey: layer.popup.close_on_escape_key,
        }});
      }}
      marker.addTo(map);
    }}
    for (const control of spec.controls) {{
      if (control.type === "scale") {{
        L.control.scale({{ position: control.position }}).addTo(map);
      }}
    }}
  </script>
</body>
</html>
"#,
            version = env!("CARGO_PKG_VERSION"),
            created = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            title = escape_html("Sampling locations"),
            css = LEAFLET_CSS_URL,
            js = LEAFLET_JS_URL,
            spec = spec,
        ))
    }

    /// Write the map to `path`; `.json` writes the document, anything else HTML
    pub fn save(&self, path: &Path) -> Result<()> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        let content = match extension.as_str() {
            "json" => self.to_json()?,
            "html" | "htm" => self.to_html()?,
            other => {
                return Err(FrqvizError::InvalidParameter {
                    param: "output".to_string(),
                    message: format!("Unsupported map output '{}'. Use .html or .json", other),
                })
            }
        };

        std::fs::write(path, content)?;
        Ok(())
    }
}

impl MapCanvas for InteractiveMap {
    fn add_layer(&mut self, marker: Marker) {
        self.layers.push(marker);
    }

    fn add_control(&mut self, control: Control) {
        self.controls.push(control);
    }
}

/// Map backend producing [`InteractiveMap`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct LeafletBackend;

impl MapBackend for LeafletBackend {
    type Map = InteractiveMap;

    fn create_map(&self, basemap: BaseMap, center: LatLng, zoom: u8) -> InteractiveMap {
        InteractiveMap {
            basemap,
            center,
            zoom,
            layers: Vec::new(),
            controls: Vec::new(),
        }
    }
}

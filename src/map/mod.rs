//! Sampling-location maps.
//!
//! [`render`] places one marker per dataset row, each with a popup listing
//! the location, its coordinates and the caller's taxon columns, then adds a
//! scale control.

pub mod leaflet;
pub mod marker;

use std::time::Instant;
use tracing::{debug, info};

use crate::config::MapConfig;
use crate::dataset::TabularDataset;
use crate::error::Result;
use crate::logging::generate_render_id;

pub use leaflet::{
    BaseMap, Control, ControlPosition, InteractiveMap, LatLng, LeafletBackend, MapBackend,
    MapCanvas, Marker, Popup,
};
pub use marker::{build_markers, MarkerSpec};

use marker::MarkerColumns;

/// Initial map center
pub const DEFAULT_CENTER: LatLng = LatLng(0.0, 20.0);
/// Initial zoom level
pub const DEFAULT_ZOOM: u8 = 3;

/// Map construction options
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub basemap: BaseMap,
    pub center: LatLng,
    pub zoom: u8,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            basemap: BaseMap::open_street_map(),
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl From<&MapConfig> for MapOptions {
    fn from(config: &MapConfig) -> Self {
        Self {
            basemap: BaseMap::open_street_map(),
            center: LatLng(config.center[0], config.center[1]),
            zoom: config.zoom,
        }
    }
}

impl From<&MarkerSpec> for Marker {
    fn from(spec: &MarkerSpec) -> Self {
        Marker {
            location: LatLng(spec.latitude, spec.longitude),
            draggable: false,
            popup: Some(Popup {
                content: spec.popup_html(),
                close_button: false,
                auto_close: false,
                close_on_escape_key: false,
            }),
        }
    }
}

/// Render a map with one marker per row of `dataset`.
///
/// The dataset must expose `country`, `location`, `latitude` and `longitude`
/// as index or plain columns, plus every name in `taxon_columns`.
pub fn render<B, S>(
    dataset: &TabularDataset,
    taxon_columns: &[S],
    options: &MapOptions,
    backend: &B,
) -> Result<B::Map>
where
    B: MapBackend,
    S: AsRef<str>,
{
    let render_id = generate_render_id();
    let start = Instant::now();

    let table = dataset.reset_index();
    let columns = MarkerColumns::locate(&table, taxon_columns)?;

    let mut map = backend.create_map(options.basemap.clone(), options.center, options.zoom);

    for (i, row) in table.rows().iter().enumerate() {
        let spec = columns.marker(row, i)?;
        debug!(
            render_id = %render_id,
            row = i,
            location = %spec.location,
            country = %spec.country,
            "Adding marker"
        );
        map.add_layer(Marker::from(&spec));
    }

    map.add_control(Control::Scale {
        position: ControlPosition::BottomLeft,
    });

    info!(
        render_id = %render_id,
        markers = table.len(),
        taxa = taxon_columns.len(),
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Map rendered"
    );

    Ok(map)
}

/// Render with the default center, zoom and OpenStreetMap tiles
pub fn create_taxon_map<S: AsRef<str>>(
    dataset: &TabularDataset,
    taxon_columns: &[S],
) -> Result<InteractiveMap> {
    render(dataset, taxon_columns, &MapOptions::default(), &LeafletBackend)
}

//! # frqviz
//!
//! Frequency heatmaps and sampling-location maps for exploratory analysis of
//! tabular data.
//!
//! ## Key Features
//!
//! - **Frequency heatmaps**: reshape `frq_*` columns into a labelled matrix and
//!   emit a Plotly figure with percentage colorbar ticks
//! - **Sampling maps**: one Leaflet marker per location with a popup listing
//!   taxon counts
//! - **Pluggable rendering**: both renderers talk to narrow backend traits, so
//!   reshaping and layout logic can be exercised without a real renderer
//!
//! ## Architecture
//!
//! - **Data Layer**: [`dataset`] and [`loader`] hold and load tabular input
//! - **Renderers**: [`heatmap`] and [`map`] validate, reshape and delegate
//! - **Output**: Plotly/Leaflet documents, HTML pages and PNG previews

pub mod colormaps;
pub mod config;
pub mod dataset;
pub mod error;
pub mod heatmap;
pub mod loader;
pub mod logging;
pub mod map;

pub use config::Config;
pub use dataset::{TabularDataset, Value};
pub use error::{FrqvizError, Result};
pub use heatmap::{HeatmapOptions, PlotlyBackend, PlotlyFigure, TitleOption};
pub use logging::{
    generate_render_id, init_tracing, log_dataset_stats, log_error, log_operation_end,
    log_operation_start,
};
pub use map::{create_taxon_map, InteractiveMap, LeafletBackend, MapOptions};

//! Named color scales for heatmap rendering.
//!
//! Scales are sampled from `colorgrad` presets and exposed both as Plotly
//! colorscale stops (for figure documents) and as RGBA lookups (for raster
//! previews).

pub mod colormap;
pub mod diverging;
pub mod sequential;

pub use colormap::{available_colormaps, get_colormap, lerp_color, Colormap, SampledColormap};

//! Frequency heatmaps.
//!
//! [`render`] validates a dataset, reshapes its frequency columns into a
//! [`FrequencyMatrix`], works out the figure size and hands everything to a
//! [`HeatmapBackend`]. The figure is then styled with percentage colorbar
//! ticks and either displayed or returned.

pub mod figure;
pub mod layout;
pub mod matrix;
pub mod plotly;
pub mod png;

use std::time::Instant;
use tracing::{debug, info};

use crate::config::HeatmapConfig;
use crate::dataset::TabularDataset;
use crate::error::{FrqvizError, Result};
use crate::logging::generate_render_id;

pub use figure::{
    Aspect, AxisSide, AxisUpdate, ColorBar, HeatmapBackend, HeatmapFigure, ImshowRequest,
    TextAuto,
};
pub use matrix::{ColumnSelector, FrequencyMatrix, IndexSpec};
pub use plotly::{PlotlyBackend, PlotlyFigure, RendererTarget};

/// Lower bound of the color domain
pub const ZMIN: f64 = 0.0;
/// Upper bound of the color domain
pub const ZMAX: f64 = 1.0;
/// Rotation of the x tick labels, in degrees
pub const X_TICK_ANGLE: i32 = 30;

/// Which title the figure gets
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TitleOption {
    /// The dataset's title attribute, when it has one
    #[default]
    UseEmbedded,
    /// This exact title
    Explicit(String),
    /// No title
    None,
}

impl TitleOption {
    /// Title to use for `dataset`
    pub fn resolve(&self, dataset: &TabularDataset) -> Option<String> {
        match self {
            TitleOption::UseEmbedded => dataset.title().map(str::to_string),
            TitleOption::Explicit(title) => Some(title.clone()),
            TitleOption::None => None,
        }
    }
}

/// Options for [`render`]
#[derive(Debug, Clone)]
pub struct HeatmapOptions {
    /// Row label column(s); `None` uses the dataset's own index
    pub index: Option<IndexSpec>,
    /// Maximum number of rows; `None` (or 0) disables the check
    pub max_len: Option<usize>,
    pub col_width: u32,
    pub row_height: u32,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub colorbar: bool,
    /// Explicit width, overriding the computed one
    pub width: Option<u32>,
    /// Explicit height, overriding the computed one
    pub height: Option<u32>,
    pub text_auto: TextAuto,
    pub aspect: Aspect,
    pub color_scale: String,
    pub title: TitleOption,
    /// Display the figure instead of returning it
    pub show: bool,
    /// Renderer target used when displaying
    pub renderer: Option<String>,
    /// Extra attributes forwarded to the backend untouched
    pub passthrough: serde_json::Map<String, serde_json::Value>,
    /// Which columns hold frequencies
    pub columns: ColumnSelector,
}

impl Default for HeatmapOptions {
    fn default() -> Self {
        Self::from(&HeatmapConfig::default())
    }
}

impl From<&HeatmapConfig> for HeatmapOptions {
    fn from(config: &HeatmapConfig) -> Self {
        Self {
            index: config.index.clone().map(|names| match names.len() {
                1 => IndexSpec::Single(names[0].clone()),
                _ => IndexSpec::Multi(names),
            }),
            max_len: config.max_len,
            col_width: config.col_width,
            row_height: config.row_height,
            x_label: config.x_label.clone(),
            y_label: config.y_label.clone(),
            colorbar: config.colorbar,
            width: None,
            height: None,
            text_auto: config.text_auto.clone(),
            aspect: config.aspect,
            color_scale: config.color_scale.clone(),
            title: TitleOption::UseEmbedded,
            show: true,
            renderer: None,
            passthrough: serde_json::Map::new(),
            columns: ColumnSelector::Prefix(config.column_prefix.clone()),
        }
    }
}

/// Fail when the dataset has more rows than `max_len` allows
pub fn check_size(dataset: &TabularDataset, max_len: Option<usize>) -> Result<()> {
    match max_len {
        Some(limit) if limit > 0 && dataset.len() > limit => Err(FrqvizError::SizeLimitExceeded {
            limit,
            rows: dataset.len(),
        }),
        _ => Ok(()),
    }
}

/// Render a frequency heatmap.
///
/// Returns the figure when `options.show` is false. Otherwise the figure is
/// displayed through the backend and `None` is returned.
pub fn render<B: HeatmapBackend>(
    dataset: &TabularDataset,
    options: &HeatmapOptions,
    backend: &B,
) -> Result<Option<B::Figure>> {
    let render_id = generate_render_id();
    let start = Instant::now();

    check_size(dataset, options.max_len)?;

    let title = options.title.resolve(dataset);

    let index = options
        .index
        .clone()
        .unwrap_or_else(|| IndexSpec::from_dataset(dataset));

    let matrix = FrequencyMatrix::build(dataset, &index, &options.columns)?;

    debug!(
        render_id = %render_id,
        index = %index,
        rows = matrix.n_rows(),
        cols = matrix.n_cols(),
        "Frequency matrix built"
    );

    let width = options.width.unwrap_or_else(|| {
        layout::default_width(matrix.n_cols(), options.col_width, options.colorbar)
    });
    let height = options.height.unwrap_or_else(|| {
        layout::default_height(matrix.n_rows(), options.row_height, title.is_some())
    });

    let mut figure = backend.imshow(ImshowRequest {
        matrix: &matrix,
        zmin: ZMIN,
        zmax: ZMAX,
        width,
        height,
        text_auto: &options.text_auto,
        aspect: options.aspect,
        color_scale: &options.color_scale,
        title: title.as_deref(),
        passthrough: &options.passthrough,
    })?;

    style_figure(&mut figure, options);

    info!(
        render_id = %render_id,
        rows = matrix.n_rows(),
        cols = matrix.n_cols(),
        width = width,
        height = height,
        show = options.show,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Heatmap rendered"
    );

    if options.show {
        backend.show(&figure, options.renderer.as_deref())?;
        Ok(None)
    } else {
        Ok(Some(figure))
    }
}

fn style_figure<F: HeatmapFigure>(figure: &mut F, options: &HeatmapOptions) {
    figure.update_xaxes(AxisUpdate {
        side: Some(AxisSide::Bottom),
        tick_angle: Some(X_TICK_ANGLE),
        title: None,
    });

    if let Some(label) = &options.x_label {
        figure.update_xaxes(AxisUpdate {
            title: Some(label.clone()),
            ..AxisUpdate::default()
        });
    }
    if let Some(label) = &options.y_label {
        figure.update_yaxes(AxisUpdate {
            title: Some(label.clone()),
            ..AxisUpdate::default()
        });
    }

    figure.set_colorbar(ColorBar::frequency());

    if !options.colorbar {
        figure.set_colorbar_visible(false);
    }
}

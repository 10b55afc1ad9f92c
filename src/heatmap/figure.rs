//! The heatmap rendering collaborator.
//!
//! The renderer only reshapes data and computes layout numbers; building the
//! actual figure and displaying it is delegated to a [`HeatmapBackend`].

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{FrqvizError, Result};

use super::matrix::FrequencyMatrix;

/// Title of the frequency colorbar
pub const COLORBAR_TITLE: &str = "Frequency";
/// Colorbar tick positions
pub const COLORBAR_TICK_VALUES: [f64; 6] = [0.0, 0.2, 0.4, 0.6, 0.8, 1.0];
/// Colorbar tick labels
pub const COLORBAR_TICK_TEXT: [&str; 6] = ["0%", "20%", "40%", "60%", "80%", "100%"];

/// How cell values are written inside the cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextAuto {
    /// `true` writes raw values, `false` writes nothing
    Toggle(bool),
    /// d3-format specifier such as `.0%`
    Format(String),
}

impl TextAuto {
    /// Plotly texttemplate for this setting
    pub fn texttemplate(&self) -> Option<String> {
        match self {
            TextAuto::Toggle(false) => None,
            TextAuto::Toggle(true) => Some("%{z}".to_string()),
            TextAuto::Format(fmt) => Some(format!("%{{z:{}}}", fmt)),
        }
    }
}

impl Default for TextAuto {
    fn default() -> Self {
        TextAuto::Format(".0%".to_string())
    }
}

impl FromStr for TextAuto {
    type Err = FrqvizError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "true" => Ok(TextAuto::Toggle(true)),
            "false" | "" => Ok(TextAuto::Toggle(false)),
            fmt => Ok(TextAuto::Format(fmt.to_string())),
        }
    }
}

/// Cell aspect ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aspect {
    /// Cells stretch to fill the figure
    #[default]
    Auto,
    /// Cells are square
    Equal,
}

impl FromStr for Aspect {
    type Err = FrqvizError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Aspect::Auto),
            "equal" => Ok(Aspect::Equal),
            other => Err(FrqvizError::InvalidParameter {
                param: "aspect".to_string(),
                message: format!("Unknown aspect: {}. Must be 'auto' or 'equal'", other),
            }),
        }
    }
}

/// Where axis ticks are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisSide {
    Top,
    Bottom,
    Left,
    Right,
}

/// Partial update applied to an axis; `None` fields are left alone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisUpdate {
    pub side: Option<AxisSide>,
    pub tick_angle: Option<i32>,
    pub title: Option<String>,
}

/// Colorbar title and ticks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorBar {
    pub title: String,
    pub tick_values: Vec<f64>,
    pub tick_text: Vec<String>,
}

impl ColorBar {
    /// Percentage colorbar used for every frequency heatmap
    pub fn frequency() -> Self {
        Self {
            title: COLORBAR_TITLE.to_string(),
            tick_values: COLORBAR_TICK_VALUES.to_vec(),
            tick_text: COLORBAR_TICK_TEXT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Everything the backend needs to build the initial figure
#[derive(Debug, Clone)]
pub struct ImshowRequest<'a> {
    pub matrix: &'a FrequencyMatrix,
    pub zmin: f64,
    pub zmax: f64,
    pub width: u32,
    pub height: u32,
    pub text_auto: &'a TextAuto,
    pub aspect: Aspect,
    pub color_scale: &'a str,
    pub title: Option<&'a str>,
    pub passthrough: &'a serde_json::Map<String, serde_json::Value>,
}

/// A figure that supports the layout mutations the renderer performs
pub trait HeatmapFigure {
    fn update_xaxes(&mut self, update: AxisUpdate);

    fn update_yaxes(&mut self, update: AxisUpdate);

    fn set_colorbar(&mut self, colorbar: ColorBar);

    fn set_colorbar_visible(&mut self, visible: bool);
}

/// Builds and displays heatmap figures
pub trait HeatmapBackend {
    type Figure: HeatmapFigure;

    /// Build a figure from the matrix and layout parameters
    fn imshow(&self, request: ImshowRequest<'_>) -> Result<Self::Figure>;

    /// Display a figure through the given renderer target, or the backend default
    fn show(&self, figure: &Self::Figure, renderer: Option<&str>) -> Result<()>;
}

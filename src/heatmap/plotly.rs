//! Plotly figure documents and the default heatmap backend.
//!
//! [`PlotlyBackend`] turns an [`ImshowRequest`] into a [`PlotlyFigure`]
//! (the JSON document Plotly.js consumes) and displays figures by writing
//! them to one of the [`RendererTarget`]s.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::colormaps::get_colormap;
use crate::error::{FrqvizError, Result};
use crate::logging::generate_render_id;

use super::figure::{
    Aspect, AxisSide, AxisUpdate, ColorBar, HeatmapBackend, HeatmapFigure, ImshowRequest,
};
use super::png::{encode_png, generate_image};

/// Plotly.js bundle referenced by exported HTML pages
pub const PLOTLY_JS_URL: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const HOVER_TEMPLATE: &str = "x: %{x}<br>y: %{y}<br>color: %{z}<extra></extra>";

/// Trace attributes set from the matrix that passthrough options cannot replace
const RESERVED_TRACE_KEYS: &[&str] = &[
    "type",
    "x",
    "y",
    "z",
    "coloraxis",
    "texttemplate",
    "hovertemplate",
];

/// A text element such as a figure or axis title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

/// Heatmap trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapTrace {
    #[serde(rename = "type")]
    pub trace_type: String,
    pub x: Vec<String>,
    pub y: Vec<String>,
    pub z: Vec<Vec<Option<f64>>>,
    pub coloraxis: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texttemplate: Option<String>,
    pub hovertemplate: String,
    /// Passthrough options, written as extra trace attributes
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Axis layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<AxisSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tickangle: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autorange: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaleanchor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constrain: Option<String>,
}

impl Axis {
    fn apply(&mut self, update: AxisUpdate) {
        if let Some(side) = update.side {
            self.side = Some(side);
        }
        if let Some(angle) = update.tick_angle {
            self.tickangle = Some(angle);
        }
        if let Some(title) = update.title {
            self.title = Some(Title { text: title });
        }
    }
}

/// Colorbar as Plotly names its attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotlyColorBar {
    pub title: Title,
    pub tickvals: Vec<f64>,
    pub ticktext: Vec<String>,
}

/// Shared color axis of the figure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorAxis {
    pub cmin: f64,
    pub cmax: f64,
    pub colorscale: Vec<(f64, String)>,
    pub showscale: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colorbar: Option<PlotlyColorBar>,
}

/// Figure layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    pub width: u32,
    pub height: u32,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub coloraxis: ColorAxis,
}

/// A complete Plotly figure document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotlyFigure {
    pub data: Vec<HeatmapTrace>,
    pub layout: Layout,
    /// Name of the color scale, used by the raster renderer
    #[serde(skip)]
    color_scale: String,
}

impl PlotlyFigure {
    /// The heatmap trace
    pub fn trace(&self) -> Option<&HeatmapTrace> {
        self.data.first()
    }

    /// Name of the color scale the figure was built with
    pub fn color_scale(&self) -> &str {
        &self.color_scale
    }

    /// Figure as a JSON document
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Figure as a standalone HTML page loading Plotly.js
    pub fn to_html(&self) -> Result<String> {
        // keep "</script>" inside string values from closing the script element
        let figure = serde_json::to_string(self)?.replace("</", "<\\/");
        let title = self
            .layout
            .title
            .as_ref()
            .map(|t| t.text.as_str())
            .unwrap_or("Frequency heatmap");

        Ok(format!(
            r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="generator" content="frqviz {version}" />
  <meta name="created" content="{created}" />
  <title>{title}</title>
  <script src="{plotly}"></script>
</head>
<body>
  <div id="frqviz-heatmap"></div>
  <script>
    const figure = {figure};
    Plotly.newPlot("frqviz-heatmap", figure.data, figure.layout);
  </script>
</body>
</html>
"#,
            version = env!("CARGO_PKG_VERSION"),
            created = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            title = escape_html(title),
            plotly = PLOTLY_JS_URL,
            figure = figure,
        ))
    }

    /// Raster preview of the figure as PNG bytes
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let trace = self.trace().ok_or_else(|| FrqvizError::Render {
            message: "Figure has no heatmap trace".to_string(),
        })?;
        let colormap = get_colormap(&self.color_scale)?;
        let img = generate_image(
            &trace.z,
            self.layout.width,
            self.layout.height,
            colormap.as_ref(),
            self.layout.coloraxis.cmin,
            self.layout.coloraxis.cmax,
            self.layout.coloraxis.showscale,
        )?;
        encode_png(&img)
    }
}

impl HeatmapFigure for PlotlyFigure {
    fn update_xaxes(&mut self, update: AxisUpdate) {
        self.layout.xaxis.apply(update);
    }

    fn update_yaxes(&mut self, update: AxisUpdate) {
        self.layout.yaxis.apply(update);
    }

    fn set_colorbar(&mut self, colorbar: ColorBar) {
        self.layout.coloraxis.colorbar = Some(PlotlyColorBar {
            title: Title {
                text: colorbar.title,
            },
            tickvals: colorbar.tick_values,
            ticktext: colorbar.tick_text,
        });
    }

    fn set_colorbar_visible(&mut self, visible: bool) {
        self.layout.coloraxis.showscale = visible;
    }
}

/// Where a displayed figure goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RendererTarget {
    /// Standalone HTML page
    #[default]
    Html,
    /// Figure JSON document
    Json,
    /// Raster preview
    Png,
    /// Figure JSON printed to standard output
    Stdout,
}

impl RendererTarget {
    /// File extension for file-based targets
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            RendererTarget::Html => Some("html"),
            RendererTarget::Json => Some("json"),
            RendererTarget::Png => Some("png"),
            RendererTarget::Stdout => None,
        }
    }

    /// Target implied by an output file name
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        extension.parse()
    }
}

impl FromStr for RendererTarget {
    type Err = FrqvizError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "html" | "browser" => Ok(RendererTarget::Html),
            "json" => Ok(RendererTarget::Json),
            "png" => Ok(RendererTarget::Png),
            "stdout" => Ok(RendererTarget::Stdout),
            other => Err(FrqvizError::InvalidParameter {
                param: "renderer".to_string(),
                message: format!(
                    "Unknown renderer: {}. Must be one of: html, json, png, stdout",
                    other
                ),
            }),
        }
    }
}

/// Heatmap backend producing Plotly figure documents
#[derive(Debug, Clone)]
pub struct PlotlyBackend {
    output_dir: PathBuf,
    default_renderer: RendererTarget,
}

impl PlotlyBackend {
    pub fn new(output_dir: impl Into<PathBuf>, default_renderer: RendererTarget) -> Self {
        Self {
            output_dir: output_dir.into(),
            default_renderer,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write a figure to a fresh file in the output directory.
    ///
    /// Returns the written path, or `None` for [`RendererTarget::Stdout`].
    pub fn write(&self, figure: &PlotlyFigure, target: RendererTarget) -> Result<Option<PathBuf>> {
        let Some(extension) = target.extension() else {
            println!("{}", figure.to_json()?);
            return Ok(None);
        };

        std::fs::create_dir_all(&self.output_dir)?;
        let path = self
            .output_dir
            .join(format!("heatmap-{}.{}", generate_render_id(), extension));
        write_figure(figure, target, &path)?;
        Ok(Some(path))
    }
}

impl Default for PlotlyBackend {
    fn default() -> Self {
        Self::new(std::env::temp_dir().join("frqviz"), RendererTarget::Html)
    }
}

impl HeatmapBackend for PlotlyBackend {
    type Figure = PlotlyFigure;

    fn imshow(&self, request: ImshowRequest<'_>) -> Result<PlotlyFigure> {
        let colormap = get_colormap(request.color_scale)?;
        let matrix = request.matrix;

        let trace = HeatmapTrace {
            trace_type: "heatmap".to_string(),
            x: matrix.columns().to_vec(),
            y: matrix.row_labels().to_vec(),
            z: matrix.to_rows(),
            coloraxis: "coloraxis".to_string(),
            texttemplate: request.text_auto.texttemplate(),
            hovertemplate: HOVER_TEMPLATE.to_string(),
            extra: trace_extras(request.passthrough),
        };

        let mut xaxis = Axis::default();
        let mut yaxis = Axis {
            // first matrix row at the top, as an image
            autorange: Some("reversed".to_string()),
            ..Axis::default()
        };
        if request.aspect == Aspect::Equal {
            xaxis.constrain = Some("domain".to_string());
            yaxis.scaleanchor = Some("x".to_string());
            yaxis.constrain = Some("domain".to_string());
        }

        debug!(
            rows = matrix.n_rows(),
            cols = matrix.n_cols(),
            width = request.width,
            height = request.height,
            color_scale = request.color_scale,
            "Building Plotly heatmap"
        );

        Ok(PlotlyFigure {
            data: vec![trace],
            layout: Layout {
                title: request.title.map(Title::new),
                width: request.width,
                height: request.height,
                xaxis,
                yaxis,
                coloraxis: ColorAxis {
                    cmin: request.zmin,
                    cmax: request.zmax,
                    colorscale: colormap.plotly_colorscale(),
                    showscale: true,
                    colorbar: None,
                },
            },
            color_scale: request.color_scale.to_string(),
        })
    }

    fn show(&self, figure: &PlotlyFigure, renderer: Option<&str>) -> Result<()> {
        let target = match renderer {
            Some(name) => name.parse()?,
            None => self.default_renderer,
        };

        if let Some(path) = self.write(figure, target)? {
            info!(
                renderer = ?target,
                path = %path.display(),
                "Heatmap written"
            );
        }
        Ok(())
    }
}

fn trace_extras(
    passthrough: &serde_json::Map<String, serde_json::Value>,
) -> serde_json::Map<String, serde_json::Value> {
    passthrough
        .iter()
        .filter(|(key, _)| {
            let reserved = RESERVED_TRACE_KEYS.contains(&key.as_str());
            if reserved {
                warn!(key = %key, "Ignoring passthrough option that would replace trace data");
            }
            !reserved
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Write a figure to `path` in the given format
pub fn write_figure(figure: &PlotlyFigure, target: RendererTarget, path: &Path) -> Result<()> {
    match target {
        RendererTarget::Html => std::fs::write(path, figure.to_html()?)?,
        RendererTarget::Json => std::fs::write(path, figure.to_json()?)?,
        RendererTarget::Png => std::fs::write(path, figure.to_png()?)?,
        RendererTarget::Stdout => println!("{}", figure.to_json()?),
    }
    Ok(())
}

pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::TabularDataset;
    use crate::heatmap::figure::TextAuto;
    use crate::heatmap::matrix::{ColumnSelector, FrequencyMatrix};

    fn matrix() -> FrequencyMatrix {
        let ds = TabularDataset::new(
            vec!["label".into(), "frq_a".into(), "frq_b".into()],
            vec![
                vec!["v1".into(), 0.1.into(), 0.9.into()],
                vec!["v2".into(), 0.5.into(), crate::dataset::Value::Null],
            ],
        )
        .unwrap();
        FrequencyMatrix::build(&ds, &"label".into(), &ColumnSelector::default()).unwrap()
    }

    fn figure(aspect: Aspect) -> PlotlyFigure {
        let matrix = matrix();
        let text_auto = TextAuto::default();
        let mut passthrough = serde_json::Map::new();
        passthrough.insert("xgap".to_string(), serde_json::json!(1));

        PlotlyBackend::default()
            .imshow(ImshowRequest {
                matrix: &matrix,
                zmin: 0.0,
                zmax: 1.0,
                width: 520,
                height: 280,
                text_auto: &text_auto,
                aspect,
                color_scale: "Reds",
                title: Some("Frequencies"),
                passthrough: &passthrough,
            })
            .unwrap()
    }

    #[test]
    fn test_imshow_builds_trace_and_layout() {
        let fig = figure(Aspect::Auto);
        let trace = fig.trace().unwrap();

        assert_eq!(trace.x, vec!["a", "b"]);
        assert_eq!(trace.y, vec!["v1", "v2"]);
        assert_eq!(trace.z[1], vec![Some(0.5), None]);
        assert_eq!(trace.texttemplate.as_deref(), Some("%{z:.0%}"));
        assert_eq!(fig.layout.width, 520);
        assert_eq!(fig.layout.coloraxis.cmin, 0.0);
        assert_eq!(fig.layout.coloraxis.cmax, 1.0);
        assert_eq!(fig.layout.yaxis.autorange.as_deref(), Some("reversed"));
        assert!(fig.layout.yaxis.scaleanchor.is_none());
        assert_eq!(fig.color_scale(), "Reds");
    }

    #[test]
    fn test_equal_aspect_anchors_axes() {
        let fig = figure(Aspect::Equal);
        assert_eq!(fig.layout.yaxis.scaleanchor.as_deref(), Some("x"));
    }

    #[test]
    fn test_passthrough_lands_in_trace_json() {
        let json: serde_json::Value = serde_json::from_str(&figure(Aspect::Auto).to_json().unwrap()).unwrap();
        assert_eq!(json["data"][0]["xgap"], 1);
        assert_eq!(json["data"][0]["type"], "heatmap");
        // missing cells serialize as null
        assert!(json["data"][0]["z"][1][1].is_null());
        assert_eq!(json["layout"]["title"]["text"], "Frequencies");
    }

    #[test]
    fn test_reserved_passthrough_keys_skipped() {
        let matrix = matrix();
        let text_auto = TextAuto::default();
        let mut passthrough = serde_json::Map::new();
        passthrough.insert("type".to_string(), serde_json::json!("bar"));
        passthrough.insert("z".to_string(), serde_json::json!([[1]]));
        passthrough.insert("coloraxis".to_string(), serde_json::json!("coloraxis2"));
        passthrough.insert("ygap".to_string(), serde_json::json!(2));

        let fig = PlotlyBackend::default()
            .imshow(ImshowRequest {
                matrix: &matrix,
                zmin: 0.0,
                zmax: 1.0,
                width: 100,
                height: 100,
                text_auto: &text_auto,
                aspect: Aspect::Auto,
                color_scale: "Reds",
                title: None,
                passthrough: &passthrough,
            })
            .unwrap();

        let trace = fig.trace().unwrap();
        assert_eq!(trace.extra.len(), 1);
        assert_eq!(trace.extra["ygap"], 2);

        let back: PlotlyFigure = serde_json::from_str(&fig.to_json().unwrap()).unwrap();
        let back_trace = back.trace().unwrap();
        assert_eq!(back_trace.trace_type, "heatmap");
        assert_eq!(back_trace.coloraxis, "coloraxis");
        assert_eq!(back_trace.z, trace.z);
    }

    #[test]
    fn test_unknown_color_scale() {
        let matrix = matrix();
        let text_auto = TextAuto::default();
        let passthrough = serde_json::Map::new();
        let result = PlotlyBackend::default().imshow(ImshowRequest {
            matrix: &matrix,
            zmin: 0.0,
            zmax: 1.0,
            width: 10,
            height: 10,
            text_auto: &text_auto,
            aspect: Aspect::Auto,
            color_scale: "rainbowish",
            title: None,
            passthrough: &passthrough,
        });
        assert!(matches!(result, Err(FrqvizError::InvalidParameter { .. })));
    }

    #[test]
    fn test_html_embeds_figure() {
        let html = figure(Aspect::Auto).to_html().unwrap();
        assert!(html.contains(PLOTLY_JS_URL));
        assert!(html.contains("Plotly.newPlot"));
        assert!(html.contains("<title>Frequencies</title>"));
    }

    #[test]
    fn test_show_writes_requested_target() {
        let dir = tempfile::tempdir().unwrap();
        let backend = PlotlyBackend::new(dir.path(), RendererTarget::Html);
        let fig = figure(Aspect::Auto);

        backend.show(&fig, Some("png")).unwrap();
        backend.show(&fig, None).unwrap();

        let mut extensions: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| {
                e.unwrap()
                    .path()
                    .extension()
                    .unwrap()
                    .to_string_lossy()
                    .to_string()
            })
            .collect();
        extensions.sort();
        assert_eq!(extensions, vec!["html", "png"]);
    }

    #[test]
    fn test_renderer_target_parsing() {
        assert_eq!("HTML".parse::<RendererTarget>().unwrap(), RendererTarget::Html);
        assert_eq!(
            RendererTarget::from_path(Path::new("out/fig.json")).unwrap(),
            RendererTarget::Json
        );
        assert!("svg".parse::<RendererTarget>().is_err());
    }
}

//! Configuration management for frqviz.
//!
//! This module handles the layered configuration system with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::colormaps::get_colormap;
use crate::error::{FrqvizError, Result};
use crate::heatmap::{Aspect, RendererTarget, TextAuto};

/// Command-line arguments for frqviz
#[derive(Parser, Debug)]
#[command(name = "frqviz")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to JSON configuration file
    #[arg(short, long, global = true, env = "FRQVIZ_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "FRQVIZ_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory where displayed figures are written
    #[arg(long, global = true, env = "FRQVIZ_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Default renderer (html, json, png, stdout)
    #[arg(long, global = true, env = "FRQVIZ_RENDERER")]
    pub renderer: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// What to draw
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Render a frequency heatmap
    Heatmap(HeatmapArgs),
    /// Render a map of sampling locations
    Map(MapArgs),
}

/// Arguments of the `heatmap` subcommand
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct HeatmapArgs {
    /// Dataset file (csv, tsv or json)
    pub input: PathBuf,

    /// Column(s) forming the row labels
    #[arg(short, long, value_delimiter = ',')]
    pub index: Vec<String>,

    /// Use the dataset's declared index columns as row labels
    #[arg(long, conflicts_with = "index")]
    pub dataset_index_labels: bool,

    /// Columns to declare as the dataset index while loading
    #[arg(long, value_delimiter = ',')]
    pub dataset_index: Vec<String>,

    /// Title attribute to attach to the dataset while loading
    #[arg(long)]
    pub dataset_title: Option<String>,

    /// Maximum number of rows
    #[arg(long)]
    pub max_len: Option<usize>,

    /// Disable the row limit
    #[arg(long, conflicts_with = "max_len")]
    pub no_max_len: bool,

    /// Width added per frequency column
    #[arg(long)]
    pub col_width: Option<u32>,

    /// Height added per row
    #[arg(long)]
    pub row_height: Option<u32>,

    /// Figure width, overriding the computed width
    #[arg(long)]
    pub width: Option<u32>,

    /// Figure height, overriding the computed height
    #[arg(long)]
    pub height: Option<u32>,

    /// X axis title
    #[arg(long)]
    pub x_label: Option<String>,

    /// Omit the X axis title
    #[arg(long, conflicts_with = "x_label")]
    pub no_x_label: bool,

    /// Y axis title
    #[arg(long)]
    pub y_label: Option<String>,

    /// Omit the Y axis title
    #[arg(long, conflicts_with = "y_label")]
    pub no_y_label: bool,

    /// Hide the colorbar
    #[arg(long)]
    pub no_colorbar: bool,

    /// Cell text format (d3 format, "true" or "false")
    #[arg(long)]
    pub text_auto: Option<String>,

    /// Cell aspect (auto or equal)
    #[arg(long)]
    pub aspect: Option<String>,

    /// Color scale name (Reds, Blues, Viridis, ...)
    #[arg(long)]
    pub color_scale: Option<String>,

    /// Prefix marking frequency columns
    #[arg(long)]
    pub prefix: Option<String>,

    /// Figure title (defaults to the dataset title)
    #[arg(long)]
    pub title: Option<String>,

    /// Render without a title
    #[arg(long, conflicts_with = "title")]
    pub no_title: bool,

    /// Write the figure to this file instead of the output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments of the `map` subcommand
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct MapArgs {
    /// Dataset file (csv, tsv or json)
    pub input: PathBuf,

    /// Columns shown in each marker popup, in order
    #[arg(short, long = "taxon", required = true, value_delimiter = ',')]
    pub taxa: Vec<String>,

    /// Columns to declare as the dataset index while loading
    #[arg(long, value_delimiter = ',')]
    pub dataset_index: Vec<String>,

    /// Output file (.html or .json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Heatmap defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapConfig {
    /// Row label column(s); null uses the dataset index
    #[serde(default = "default_index")]
    pub index: Option<Vec<String>>,

    /// Maximum number of rows; null disables the limit
    #[serde(default = "default_max_len")]
    pub max_len: Option<usize>,

    #[serde(default = "default_col_width")]
    pub col_width: u32,

    #[serde(default = "default_row_height")]
    pub row_height: u32,

    #[serde(default = "default_x_label")]
    pub x_label: Option<String>,

    #[serde(default = "default_y_label")]
    pub y_label: Option<String>,

    #[serde(default = "default_true")]
    pub colorbar: bool,

    #[serde(default)]
    pub text_auto: TextAuto,

    #[serde(default)]
    pub aspect: Aspect,

    #[serde(default = "default_color_scale")]
    pub color_scale: String,

    /// Prefix marking frequency columns
    #[serde(default = "default_column_prefix")]
    pub column_prefix: String,
}

/// Map defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Initial center as [latitude, longitude]
    #[serde(default = "default_center")]
    pub center: [f64; 2],

    /// Initial zoom level
    #[serde(default = "default_zoom")]
    pub zoom: u8,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory where displayed figures are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Default renderer for displayed figures
    #[serde(default = "default_renderer")]
    pub renderer: String,
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub heatmap: HeatmapConfig,

    #[serde(default)]
    pub map: MapConfig,

    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<(Self, Command)> {
        Self::from_args(Args::parse())
    }

    /// Build the configuration from already parsed arguments
    pub fn from_args(args: Args) -> Result<(Self, Command)> {
        let mut config = Config::default();

        if let Some(config_path) = &args.config {
            let file_config = Self::load_from_file(config_path)?;
            config.merge(file_config);
        }

        if let Some(level) = args.log_level {
            config.log_level = level;
        }
        if let Some(dir) = args.output_dir {
            config.output.output_dir = dir;
        }
        if let Some(renderer) = args.renderer {
            config.output.renderer = renderer;
        }

        if let Command::Heatmap(heatmap) = &args.command {
            heatmap.apply(&mut config.heatmap)?;
        }

        Ok((config, args.command))
    }

    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.heatmap = other.heatmap;
        self.map = other.map;
        self.output = other.output;
        self.log_level = other.log_level;
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(FrqvizError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        self.output
            .renderer
            .parse::<RendererTarget>()
            .map_err(|e| FrqvizError::Config {
                message: e.to_string(),
            })?;

        get_colormap(&self.heatmap.color_scale).map_err(|e| FrqvizError::Config {
            message: e.to_string(),
        })?;

        if self.heatmap.col_width == 0 || self.heatmap.row_height == 0 {
            return Err(FrqvizError::Config {
                message: "col_width and row_height must be positive".to_string(),
            });
        }

        if self.heatmap.column_prefix.is_empty() {
            return Err(FrqvizError::Config {
                message: "column_prefix cannot be empty".to_string(),
            });
        }

        let [lat, lon] = self.map.center;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(FrqvizError::Config {
                message: format!("Invalid map center: ({}, {})", lat, lon),
            });
        }

        if self.map.zoom > 19 {
            return Err(FrqvizError::Config {
                message: format!("Invalid zoom level: {}. Must be between 0 and 19", self.map.zoom),
            });
        }

        Ok(())
    }
}

impl HeatmapArgs {
    /// Apply the default-changing flags to the heatmap configuration
    pub fn apply(&self, config: &mut HeatmapConfig) -> Result<()> {
        if self.dataset_index_labels {
            config.index = None;
        } else if !self.index.is_empty() {
            config.index = Some(self.index.clone());
        }

        if self.no_max_len {
            config.max_len = None;
        } else if self.max_len.is_some() {
            config.max_len = self.max_len;
        }

        if let Some(width) = self.col_width {
            config.col_width = width;
        }
        if let Some(height) = self.row_height {
            config.row_height = height;
        }

        if self.no_x_label {
            config.x_label = None;
        } else if self.x_label.is_some() {
            config.x_label = self.x_label.clone();
        }
        if self.no_y_label {
            config.y_label = None;
        } else if self.y_label.is_some() {
            config.y_label = self.y_label.clone();
        }

        if self.no_colorbar {
            config.colorbar = false;
        }
        if let Some(text_auto) = &self.text_auto {
            config.text_auto = text_auto.parse()?;
        }
        if let Some(aspect) = &self.aspect {
            config.aspect = aspect.parse()?;
        }
        if let Some(scale) = &self.color_scale {
            config.color_scale = scale.clone();
        }
        if let Some(prefix) = &self.prefix {
            config.column_prefix = prefix.clone();
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            heatmap: HeatmapConfig::default(),
            map: MapConfig::default(),
            output: OutputConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            index: default_index(),
            max_len: default_max_len(),
            col_width: default_col_width(),
            row_height: default_row_height(),
            x_label: default_x_label(),
            y_label: default_y_label(),
            colorbar: true,
            text_auto: TextAuto::default(),
            aspect: Aspect::default(),
            color_scale: default_color_scale(),
            column_prefix: default_column_prefix(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: default_center(),
            zoom: default_zoom(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            renderer: default_renderer(),
        }
    }
}

// Default value functions for serde
fn default_index() -> Option<Vec<String>> {
    Some(vec!["label".to_string()])
}

fn default_max_len() -> Option<usize> {
    Some(100)
}

fn default_col_width() -> u32 {
    40
}

fn default_row_height() -> u32 {
    20
}

fn default_x_label() -> Option<String> {
    Some("Cohorts".to_string())
}

fn default_y_label() -> Option<String> {
    Some("Variants".to_string())
}

fn default_true() -> bool {
    true
}

fn default_color_scale() -> String {
    "Reds".to_string()
}

fn default_column_prefix() -> String {
    crate::heatmap::matrix::DEFAULT_PREFIX.to_string()
}

fn default_center() -> [f64; 2] {
    [0.0, 20.0]
}

fn default_zoom() -> u8 {
    3
}

fn default_output_dir() -> PathBuf {
    std::env::temp_dir().join("frqviz")
}

fn default_renderer() -> String {
    "html".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

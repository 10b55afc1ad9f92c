//! Colormap trait and utilities.
//!
//! This module defines the common interface for all color scales and the
//! lookup by Plotly-style name (`Reds`, `Viridis`, `RdBu_r`, ...).

use crate::error::{FrqvizError, Result};

use super::{diverging::DIVERGING, sequential::SEQUENTIAL};

/// Number of samples taken from a gradient when building a lookup table
const TABLE_SIZE: usize = 32;

/// Number of stops emitted in a Plotly colorscale
const PLOTLY_STOPS: usize = 11;

/// Trait for color mapping implementations
pub trait Colormap: Send + Sync {
    /// Map a normalized value (0.0 to 1.0) to an RGBA color
    fn map_normalized(&self, value: f32) -> [u8; 4];

    /// Map a value to an RGBA color given the data range
    fn map(&self, value: f32, min: f32, max: f32) -> [u8; 4] {
        let normalized = if max > min {
            ((value - min) / (max - min)).clamp(0.0, 1.0)
        } else {
            0.5
        };
        self.map_normalized(normalized)
    }

    /// Colorscale stops in the `[[position, "rgb(r, g, b)"], ...]` form Plotly expects
    fn plotly_colorscale(&self) -> Vec<(f64, String)> {
        (0..PLOTLY_STOPS)
            .map(|i| {
                let t = i as f64 / (PLOTLY_STOPS - 1) as f64;
                let [r, g, b, _] = self.map_normalized(t as f32);
                (t, format!("rgb({}, {}, {})", r, g, b))
            })
            .collect()
    }

    /// Get the name of this colormap
    fn name(&self) -> &str;
}

/// A colormap backed by a table sampled from a `colorgrad` gradient
#[derive(Debug, Clone)]
pub struct SampledColormap {
    name: String,
    colors: Vec<[u8; 3]>,
}

impl SampledColormap {
    /// Sample `gradient` into a lookup table, optionally reversed
    pub fn from_gradient(name: &str, gradient: &colorgrad::Gradient, reversed: bool) -> Self {
        let mut colors: Vec<[u8; 3]> = (0..TABLE_SIZE)
            .map(|i| {
                let t = i as f64 / (TABLE_SIZE - 1) as f64;
                let [r, g, b, _] = gradient.at(t).to_rgba8();
                [r, g, b]
            })
            .collect();

        if reversed {
            colors.reverse();
        }

        Self {
            name: name.to_string(),
            colors,
        }
    }
}

impl Colormap for SampledColormap {
    fn map_normalized(&self, value: f32) -> [u8; 4] {
        let value = if value.is_finite() {
            value.clamp(0.0, 1.0)
        } else {
            0.0
        };

        let last = self.colors.len() - 1;
        let position = value * last as f32;
        let index = position.floor() as usize;

        if index >= last {
            let c = self.colors[last];
            return [c[0], c[1], c[2], 255];
        }

        let t = position - index as f32;
        let rgb = lerp_color(self.colors[index], self.colors[index + 1], t);
        [rgb[0], rgb[1], rgb[2], 255]
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Get a colormap by name.
///
/// Names are case-insensitive; a `_r` suffix reverses the scale.
pub fn get_colormap(name: &str) -> Result<Box<dyn Colormap>> {
    let lowered = name.to_lowercase();
    let (base, reversed) = match lowered.strip_suffix("_r") {
        Some(base) => (base, true),
        None => (lowered.as_str(), false),
    };

    SEQUENTIAL
        .iter()
        .chain(DIVERGING.iter())
        .find(|(scale, _)| *scale == base)
        .map(|(_, make)| {
            Box::new(SampledColormap::from_gradient(name, &make(), reversed)) as Box<dyn Colormap>
        })
        .ok_or_else(|| FrqvizError::InvalidParameter {
            param: "color_scale".to_string(),
            message: format!(
                "Unknown color scale: {}. Available: {}",
                name,
                available_colormaps().join(", ")
            ),
        })
}

/// Names of every known scale (without the `_r` variants)
pub fn available_colormaps() -> Vec<&'static str> {
    SEQUENTIAL
        .iter()
        .chain(DIVERGING.iter())
        .map(|(name, _)| *name)
        .collect()
}

/// Linear interpolation between two colors
pub fn lerp_color(c1: [u8; 3], c2: [u8; 3], t: f32) -> [u8; 3] {
    [
        (c1[0] as f32 * (1.0 - t) + c2[0] as f32 * t) as u8,
        (c1[1] as f32 * (1.0 - t) + c2[1] as f32 * t) as u8,
        (c1[2] as f32 * (1.0 - t) + c2[2] as f32 * t) as u8,
    ]
}

//! Raster preview of a heatmap figure.
//!
//! Draws the matrix cells (and the colorbar when visible) with the figure's
//! color scale. Text, axes and titles are left to the interactive renderers.

use image::{ImageBuffer, RgbaImage};
use std::io::Cursor;
use tracing::debug;

use crate::colormaps::Colormap;
use crate::error::{FrqvizError, Result};

use super::layout::COLORBAR_WIDTH;

/// Gap between the cells and the colorbar strip
const COLORBAR_GAP: u32 = 10;

/// Rasterize a matrix of optional values into an RGBA image.
///
/// Missing values are transparent. With `colorbar` set, the rightmost
/// [`COLORBAR_WIDTH`] pixels hold a vertical scale running from `zmax` at the
/// top to `zmin` at the bottom.
pub fn generate_image(
    z: &[Vec<Option<f64>>],
    width: u32,
    height: u32,
    colormap: &dyn Colormap,
    zmin: f64,
    zmax: f64,
    colorbar: bool,
) -> Result<RgbaImage> {
    if width == 0 || height == 0 {
        return Err(FrqvizError::Render {
            message: format!("Cannot render a {}x{} image", width, height),
        });
    }

    let mut img: RgbaImage = ImageBuffer::new(width, height);

    let plot_width = if colorbar {
        width.saturating_sub(COLORBAR_WIDTH).max(1)
    } else {
        width
    };

    let n_rows = z.len();
    let n_cols = z.first().map(Vec::len).unwrap_or(0);

    if n_rows > 0 && n_cols > 0 {
        for y in 0..height {
            let row = (y as usize * n_rows / height as usize).min(n_rows - 1);
            for x in 0..plot_width {
                let col = (x as usize * n_cols / plot_width as usize).min(n_cols - 1);

                let color = match z[row].get(col).copied().flatten() {
                    Some(v) if v.is_finite() => colormap.map(v as f32, zmin as f32, zmax as f32),
                    _ => [0, 0, 0, 0],
                };
                img.put_pixel(x, y, image::Rgba(color));
            }
        }
    }

    if colorbar && width > plot_width + COLORBAR_GAP {
        let denom = (height.max(2) - 1) as f32;
        for y in 0..height {
            let color = colormap.map_normalized(1.0 - y as f32 / denom);
            for x in (plot_width + COLORBAR_GAP)..width {
                img.put_pixel(x, y, image::Rgba(color));
            }
        }
    }

    debug!(
        width = width,
        height = height,
        rows = n_rows,
        cols = n_cols,
        colorbar = colorbar,
        "Rasterized heatmap"
    );

    Ok(img)
}

/// Encode an image as PNG bytes
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

//! Image utilities for tests.

use image::{DynamicImage, GenericImageView, ImageFormat};

/// Detect the format of encoded image bytes
pub fn detect_image_format(bytes: &[u8]) -> Option<ImageFormat> {
    image::guess_format(bytes).ok()
}

/// Decode encoded PNG bytes
pub fn decode_png(bytes: &[u8]) -> DynamicImage {
    image::load_from_memory_with_format(bytes, ImageFormat::Png).expect("valid PNG")
}

/// Check if an image has the expected dimensions
pub fn assert_image_dimensions(
    image: &DynamicImage,
    expected_width: u32,
    expected_height: u32,
) -> Result<(), String> {
    let (actual_width, actual_height) = image.dimensions();

    if actual_width != expected_width || actual_height != expected_height {
        return Err(format!(
            "Image dimensions differ: actual = {}x{}, expected = {}x{}",
            actual_width, actual_height, expected_width, expected_height
        ));
    }

    Ok(())
}

/// Alpha channel of the pixel at (x, y)
pub fn alpha_at(image: &DynamicImage, x: u32, y: u32) -> u8 {
    image.get_pixel(x, y).0[3]
}

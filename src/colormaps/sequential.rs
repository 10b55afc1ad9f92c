//! Sequential color scales (single-hue or perceptual progression).
//!
//! These scales suit frequencies, which progress from 0 to 1.

use colorgrad::Gradient;

/// Sequential scale names and their gradient constructors
pub(crate) const SEQUENTIAL: &[(&str, fn() -> Gradient)] = &[
    ("reds", colorgrad::reds),
    ("blues", colorgrad::blues),
    ("greens", colorgrad::greens),
    ("greys", colorgrad::greys),
    ("oranges", colorgrad::oranges),
    ("purples", colorgrad::purples),
    ("viridis", colorgrad::viridis),
    ("plasma", colorgrad::plasma),
    ("inferno", colorgrad::inferno),
    ("magma", colorgrad::magma),
    ("cividis", colorgrad::cividis),
    ("turbo", colorgrad::turbo),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_scales_get_darker_or_change() {
        for (name, make) in SEQUENTIAL {
            let gradient = make();
            let low = gradient.at(0.0).to_rgba8();
            let high = gradient.at(1.0).to_rgba8();
            assert_ne!(low, high, "scale {} is flat", name);
        }
    }

    #[test]
    fn test_reds_goes_light_to_dark() {
        let gradient = colorgrad::reds();
        let low = gradient.at(0.0).to_rgba8();
        let high = gradient.at(1.0).to_rgba8();
        let brightness = |c: [u8; 4]| c[0] as u32 + c[1] as u32 + c[2] as u32;
        assert!(brightness(low) > brightness(high));
    }
}

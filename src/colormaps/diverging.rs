//! Diverging color scales (two hues meeting at a neutral center).

use colorgrad::Gradient;

/// Diverging scale names and their gradient constructors
pub(crate) const DIVERGING: &[(&str, fn() -> Gradient)] = &[
    ("rdbu", colorgrad::rd_bu),
    ("rdylbu", colorgrad::rd_yl_bu),
    ("spectral", colorgrad::spectral),
    ("piyg", colorgrad::pi_yg),
];

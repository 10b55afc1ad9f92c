//! Default figure dimensions.

/// Width of the figure before any column is added
pub const BASE_WIDTH: u32 = 400;
/// Height of the figure before any row is added
pub const BASE_HEIGHT: u32 = 200;
/// Extra width reserved for the colorbar
pub const COLORBAR_WIDTH: u32 = 40;
/// Extra height reserved for the title
pub const TITLE_HEIGHT: u32 = 40;

/// `400 + col_width * n_cols`, plus 40 with a colorbar
pub fn default_width(n_cols: usize, col_width: u32, colorbar: bool) -> u32 {
    let mut width = BASE_WIDTH.saturating_add(col_width.saturating_mul(count(n_cols)));
    if colorbar {
        width = width.saturating_add(COLORBAR_WIDTH);
    }
    width
}

/// `200 + row_height * n_rows`, plus 40 when there is a title
pub fn default_height(n_rows: usize, row_height: u32, has_title: bool) -> u32 {
    let mut height = BASE_HEIGHT.saturating_add(row_height.saturating_mul(count(n_rows)));
    if has_title {
        height = height.saturating_add(TITLE_HEIGHT);
    }
    height
}

// Dimensions saturate at u32::MAX instead of wrapping
fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

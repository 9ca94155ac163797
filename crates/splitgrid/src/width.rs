//! Display-width estimation for auto-fitting columns.

use unicode_width::UnicodeWidthChar;

/// Weight of an ASCII alphanumeric character. Such glyphs are narrower than a
/// full cell in most proportional contexts, so fitting by raw cell count
/// overshoots; everything else counts at its unicode cell width.
const ALNUM_WEIGHT: f32 = 0.6;

/// Horizontal padding added around the fitted content.
const FIT_PADDING: u16 = 2;

/// Estimate the column width needed to show `text` in full.
pub fn auto_fit_width(text: &str) -> u16 {
    let mut weighted = 0.0f32;
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            weighted += ALNUM_WEIGHT;
        } else {
            weighted += ch.width().unwrap_or(0) as f32;
        }
    }
    if weighted == 0.0 {
        return 0;
    }
    weighted.ceil() as u16 + FIT_PADDING
}

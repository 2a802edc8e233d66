//! To maintain a theme of colors, I will add colors here as constants so
//! the output does not look bad at any point.
//!
//! - TABULA_TEAL: Main Color

use colored::Color;

pub(crate) const TABULA_TEAL: Color = Color::TrueColor {
    r: 64,
    g: 179,
    b: 173,
};

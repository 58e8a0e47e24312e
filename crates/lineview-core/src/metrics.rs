//! Font metrics used for pixel measurements.
//!
//! The core never renders glyphs. It only needs the rendered width of a string and the height of
//! a line, which the font/theme service provides through [`FontMetrics`].

use unicode_width::UnicodeWidthChar;

/// Sample string measured to obtain the glyph line height.
pub const DEFAULT_SAMPLE_GLYPHS: &str = "Xg|";

/// Text measurement provided by the host font system.
pub trait FontMetrics {
    /// Rendered width in pixels of `text` (no tabs; callers expand them first).
    fn text_width(&self, text: &str) -> f64;

    /// Height in pixels of a line containing `sample`.
    fn line_height(&self, sample: &str) -> f64;
}

/// Calculate the visual width of a character in terminal cells (based on UAX #11).
///
/// - 1: narrow (ASCII, etc.)
/// - 2: wide (CJK, fullwidth, etc.)
/// - 0: zero-width (combining characters, etc.)
pub fn char_cells(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(1)
}

/// Total cell width of a string.
pub fn str_cells(s: &str) -> usize {
    s.chars().map(char_cells).sum()
}

/// A fixed-advance font: every cell is `advance` pixels wide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceFont {
    /// Width of one cell in pixels.
    pub advance: f64,
    /// Height of a glyph line in pixels.
    pub glyph_height: f64,
}

impl MonospaceFont {
    /// Create a monospace font description.
    pub fn new(advance: f64, glyph_height: f64) -> Self {
        Self {
            advance,
            glyph_height,
        }
    }

    /// A one-pixel-per-cell font, handy for terminal renderers where "pixels" are cells.
    pub fn cells() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl FontMetrics for MonospaceFont {
    fn text_width(&self, text: &str) -> f64 {
        str_cells(text) as f64 * self.advance
    }

    fn line_height(&self, _sample: &str) -> f64 {
        self.glyph_height
    }
}

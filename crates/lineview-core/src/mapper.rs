//! Coordinate Mapper
//!
//! Converts between pixel positions in the viewport and `(line, column)` buffer positions.
//!
//! A [`CoordinateMapper`] is a borrowed, read-only view: it is built on demand from the current
//! buffer, font metrics and [`ViewGeometry`], and never mutates any of them.
//!
//! # Coordinate spaces
//!
//! - *Viewport space*: pixels from the top-left corner of the viewport, padding included.
//!   [`CoordinateMapper::caret_x`] / [`CoordinateMapper::caret_y`] return this space.
//! - *Padding-relative space*: viewport space minus the left/top padding.
//!   [`CoordinateMapper::line_index_for_y`] / [`CoordinateMapper::column_for_x`] take this space;
//!   [`CoordinateMapper::position_for_point`] converts from viewport space first.

use crate::buffer::LineBuffer;
use crate::caret::CaretPosition;
use crate::metrics::FontMetrics;
use std::ops::Range;

/// Padding around the text area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Insets {
    /// Top padding.
    pub top: f64,
    /// Right padding.
    pub right: f64,
    /// Bottom padding.
    pub bottom: f64,
    /// Left padding.
    pub left: f64,
}

impl Insets {
    /// Same padding on every side.
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

/// Geometry and scroll state the mapper is parameterized by.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewGeometry {
    /// Height of a glyph line, measured from the sample glyph string.
    pub glyph_line_height: f64,
    /// Extra space between lines.
    pub line_spacing: f64,
    /// Number of spaces a tab is expanded to for measurement.
    pub tab_size: usize,
    /// Padding around the text.
    pub padding: Insets,
    /// Horizontal scroll fraction in `[0, 1]`.
    pub scroll_x: f64,
    /// Vertical scroll fraction in `[0, 1]`.
    pub scroll_y: f64,
    /// Viewport width in pixels.
    pub viewport_width: f64,
    /// Viewport height in pixels.
    pub viewport_height: f64,
}

impl Default for ViewGeometry {
    fn default() -> Self {
        Self {
            glyph_line_height: 16.0,
            line_spacing: 0.0,
            tab_size: crate::config::DEFAULT_TAB_SIZE,
            padding: Insets::default(),
            scroll_x: 0.0,
            scroll_y: 0.0,
            viewport_width: 800.0,
            viewport_height: 600.0,
        }
    }
}

/// Read-only pixel/buffer coordinate conversion.
pub struct CoordinateMapper<'a, F: FontMetrics + ?Sized> {
    buffer: &'a LineBuffer,
    font: &'a F,
    geometry: &'a ViewGeometry,
}

impl<'a, F: FontMetrics + ?Sized> CoordinateMapper<'a, F> {
    /// Build a mapper over the given state.
    pub fn new(buffer: &'a LineBuffer, font: &'a F, geometry: &'a ViewGeometry) -> Self {
        Self {
            buffer,
            font,
            geometry,
        }
    }

    /// Glyph line height plus line spacing.
    pub fn full_line_height(&self) -> f64 {
        self.geometry.glyph_line_height + self.geometry.line_spacing
    }

    /// Height of all lines plus top/bottom padding.
    pub fn content_height(&self) -> f64 {
        self.buffer.line_count() as f64 * self.full_line_height()
            + self.geometry.padding.top
            + self.geometry.padding.bottom
    }

    /// Width of the widest (tab-expanded) line plus one caret cell and left/right padding.
    pub fn content_width(&self) -> f64 {
        let widest = self
            .buffer
            .lines()
            .map(|line| self.text_width(line))
            .fold(0.0_f64, f64::max);
        widest + self.caret_width() + self.geometry.padding.left + self.geometry.padding.right
    }

    /// Room kept after the end of a line so a caret there is drawable: one space.
    pub fn caret_width(&self) -> f64 {
        self.font.text_width(" ")
    }

    /// How far the content can scroll vertically, in pixels.
    pub fn scrollable_height(&self) -> f64 {
        (self.content_height() - self.geometry.viewport_height).max(0.0)
    }

    /// How far the content can scroll horizontally, in pixels.
    pub fn scrollable_width(&self) -> f64 {
        (self.content_width() - self.geometry.viewport_width).max(0.0)
    }

    /// Vertical scroll offset in pixels.
    pub fn vertical_scroll_px(&self) -> f64 {
        self.geometry.scroll_y.clamp(0.0, 1.0) * self.scrollable_height()
    }

    /// Horizontal scroll offset in pixels.
    pub fn horizontal_scroll_px(&self) -> f64 {
        let fraction = self.geometry.scroll_x.clamp(0.0, 1.0);
        if fraction == 0.0 {
            return 0.0;
        }
        fraction * self.scrollable_width()
    }

    /// Rendered width of the first `column` chars of `line`, tabs expanded.
    pub fn prefix_width(&self, line: usize, column: usize) -> f64 {
        let text = self.buffer.line_or_empty(line);
        text.chars().take(column).map(|ch| self.char_advance(ch)).sum()
    }

    /// Width of one char; a tab measures as `tab_size` spaces.
    fn char_advance(&self, ch: char) -> f64 {
        if ch == '\t' {
            return self.font.text_width(" ") * self.geometry.tab_size as f64;
        }
        let mut utf8 = [0u8; 4];
        self.font.text_width(ch.encode_utf8(&mut utf8))
    }

    fn text_width(&self, text: &str) -> f64 {
        text.chars().map(|ch| self.char_advance(ch)).sum()
    }

    /// Line under a padding-relative `y`, clamped into the buffer.
    pub fn line_index_for_y(&self, y: f64) -> usize {
        let height = self.full_line_height();
        if height <= 0.0 {
            return 0;
        }
        let raw = ((y + self.vertical_scroll_px()) / height).floor();
        let last = self.buffer.line_count() - 1;
        if raw <= 0.0 || raw.is_nan() {
            0
        } else {
            (raw as usize).min(last)
        }
    }

    /// Column of `line` whose caret position is nearest to a padding-relative `x`.
    ///
    /// One pass over the line with a running width; on ties the leftmost column wins.
    pub fn column_for_x(&self, line: usize, x: f64) -> usize {
        let target = x + self.horizontal_scroll_px();
        let mut best_column = 0usize;
        let mut best_distance = target.abs();
        let mut width = 0.0;
        for (index, ch) in self.buffer.line_or_empty(line).chars().enumerate() {
            width += self.char_advance(ch);
            let distance = (target - width).abs();
            if distance < best_distance {
                best_distance = distance;
                best_column = index + 1;
            }
        }
        best_column
    }

    /// Viewport-space x of a caret at `(line, column)`; the column is clamped to the line.
    pub fn caret_x(&self, line: usize, column: usize) -> f64 {
        let column = column.min(self.buffer.line_len(line));
        self.prefix_width(line, column) + self.geometry.padding.left - self.horizontal_scroll_px()
    }

    /// Viewport-space y of the top of `line`.
    pub fn caret_y(&self, line: usize) -> f64 {
        line as f64 * self.full_line_height() + self.geometry.padding.top
            - self.vertical_scroll_px()
    }

    /// Buffer position under a viewport-space point (the mouse click path).
    pub fn position_for_point(&self, x: f64, y: f64) -> CaretPosition {
        let line = self.line_index_for_y(y - self.geometry.padding.top);
        let column = self.column_for_x(line, x - self.geometry.padding.left);
        CaretPosition::new(line, column)
    }

    /// Lines that intersect the viewport.
    pub fn visible_line_range(&self) -> Range<usize> {
        let height = self.full_line_height();
        let line_count = self.buffer.line_count();
        if height <= 0.0 {
            return 0..line_count;
        }
        let scroll = self.vertical_scroll_px();
        let top = (scroll - self.geometry.padding.top).max(0.0);
        let bottom = scroll + self.geometry.viewport_height - self.geometry.padding.top;
        let first = ((top / height).floor() as usize).min(line_count - 1);
        let last = if bottom <= 0.0 {
            first + 1
        } else {
            ((bottom / height).ceil() as usize).clamp(first + 1, line_count)
        };
        first..last
    }

    /// Number of lines that fit entirely in the viewport (at least 1).
    pub fn lines_per_page(&self) -> usize {
        let height = self.full_line_height();
        if height <= 0.0 {
            return 1;
        }
        let usable = self.geometry.viewport_height
            - self.geometry.padding.top
            - self.geometry.padding.bottom;
        ((usable / height).floor() as usize).max(1)
    }
}

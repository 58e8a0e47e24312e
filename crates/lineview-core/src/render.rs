//! Render output
//!
//! The viewport produces a [`RenderFrame`] of the visible lines only, and hands it to a
//! [`Renderer`]. This is the only seam between the editor engine and a drawing toolkit.

use crate::spans::{StyleSpan, StyleTag};
use crate::text::expand_tabs;

/// Caret placement in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaretPixel {
    /// X in viewport space.
    pub x: f64,
    /// Y of the top of the caret line in viewport space.
    pub y: f64,
    /// Height of the caret (one full line).
    pub height: f64,
    /// Blink visibility.
    pub visible: bool,
}

/// One visible buffer line.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderLine {
    /// Buffer line index.
    pub line_index: usize,
    /// Absolute char offset of the line start.
    pub start_offset: usize,
    /// Viewport-space y of the top of the line.
    pub y: f64,
    /// Line text as stored.
    pub raw: String,
    /// Line text with tabs expanded.
    pub text: String,
    /// Spans restricted to this line (absolute offsets).
    pub spans: Vec<StyleSpan>,
}

impl RenderLine {
    /// Split the line into `(tab-expanded text, tag)` runs, filling uncovered parts as plain.
    pub fn segments(&self, tab_size: usize) -> Vec<(String, StyleTag)> {
        let chars: Vec<char> = self.raw.chars().collect();
        let len = chars.len();
        let mut out = Vec::new();
        let mut position = 0usize;
        let emit = |from: usize, to: usize, tag: StyleTag, out: &mut Vec<(String, StyleTag)>| {
            if from < to {
                let raw: String = chars[from..to].iter().collect();
                out.push((expand_tabs(&raw, tab_size), tag));
            }
        };

        for span in &self.spans {
            let start = span
                .start
                .saturating_sub(self.start_offset)
                .clamp(position, len);
            let end = span.end.saturating_sub(self.start_offset).min(len);
            if end <= start {
                continue;
            }
            emit(position, start, StyleTag::Plain, &mut out);
            emit(start, end, span.tag, &mut out);
            position = end;
        }
        emit(position, len, StyleTag::Plain, &mut out);
        out
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    /// Visible lines, top to bottom.
    pub lines: Vec<RenderLine>,
    /// Caret placement.
    pub caret: CaretPixel,
    /// Full line height in pixels.
    pub line_height: f64,
    /// Horizontal scroll offset in pixels (already applied to `caret.x`).
    pub horizontal_scroll: f64,
    /// Tab size used for expansion.
    pub tab_size: usize,
}

impl RenderFrame {
    /// Index of the first visible line (if any).
    pub fn first_line(&self) -> Option<usize> {
        self.lines.first().map(|l| l.line_index)
    }
}

/// Drawing backend.
pub trait Renderer {
    /// Error type of the backend.
    type Error;

    /// Draw one frame.
    fn render(&mut self, frame: &RenderFrame) -> Result<(), Self::Error>;
}

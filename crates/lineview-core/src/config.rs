//! Viewport configuration.

use crate::mapper::Insets;
use crate::metrics::DEFAULT_SAMPLE_GLYPHS;
use std::time::Duration;

/// Default number of spaces a tab expands to.
pub const DEFAULT_TAB_SIZE: usize = 4;

/// Default caret blink half-period.
pub const DEFAULT_BLINK_INTERVAL: Duration = Duration::from_millis(500);

/// Default number of lines scrolled per wheel tick.
pub const DEFAULT_LINE_SCROLL_SPEED: f64 = 3.0;

/// Configuration for an [`EditorViewport`](crate::EditorViewport).
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportConfig {
    /// Spaces per tab, both for measurement and for the Tab key when converting.
    pub tab_size: usize,
    /// Whether the Tab key inserts spaces instead of `'\t'`.
    pub convert_tabs_to_spaces: bool,
    /// Extra pixels between lines.
    pub line_spacing: f64,
    /// Padding around the text area.
    pub padding: Insets,
    /// Lines scrolled per wheel tick.
    pub line_scroll_speed: f64,
    /// Caret blink half-period.
    pub blink_interval: Duration,
    /// Glyphs measured to obtain the line height.
    pub sample_glyphs: String,
}

impl ViewportConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self {
            tab_size: DEFAULT_TAB_SIZE,
            convert_tabs_to_spaces: false,
            line_spacing: 0.0,
            padding: Insets::default(),
            line_scroll_speed: DEFAULT_LINE_SCROLL_SPEED,
            blink_interval: DEFAULT_BLINK_INTERVAL,
            sample_glyphs: DEFAULT_SAMPLE_GLYPHS.to_string(),
        }
    }

    /// Set the tab size (minimum 1).
    pub fn with_tab_size(mut self, tab_size: usize) -> Self {
        self.tab_size = tab_size.max(1);
        self
    }

    /// Make the Tab key insert spaces.
    pub fn with_tabs_as_spaces(mut self, convert: bool) -> Self {
        self.convert_tabs_to_spaces = convert;
        self
    }

    /// Set the extra spacing between lines.
    pub fn with_line_spacing(mut self, spacing: f64) -> Self {
        self.line_spacing = spacing.max(0.0);
        self
    }

    /// Set the text padding.
    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    /// Set the number of lines per wheel tick.
    pub fn with_line_scroll_speed(mut self, speed: f64) -> Self {
        self.line_scroll_speed = speed;
        self
    }

    /// Set the caret blink half-period.
    pub fn with_blink_interval(mut self, interval: Duration) -> Self {
        self.blink_interval = interval;
        self
    }

    /// Set the glyph sample used to measure line height.
    pub fn with_sample_glyphs(mut self, sample: impl Into<String>) -> Self {
        self.sample_glyphs = sample.into();
        self
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self::new()
    }
}

//! Editor Viewport
//!
//! The composition root of the engine. An [`EditorViewport`] owns the [`LineBuffer`], the
//! [`CaretModel`], the font metrics and the scroll state, and:
//!
//! - dispatches [`InputEvent`]s into edits or caret motion
//! - builds a [`CoordinateMapper`] on demand to keep the caret's pixel position in sync
//! - produces a [`RenderFrame`] containing only the visible lines
//! - keeps the spans of the last accepted highlighting pass
//!
//! # Key event order
//!
//! Every key event stops the caret blink and forces the caret visible *before* the caret is
//! moved, and restarts the blink *after*, so a moving caret never flickers out.
//!
//! # Example
//!
//! ```rust
//! use lineview_core::{EditorViewport, InputEvent, KeyCode, MonospaceFont, ViewportConfig};
//!
//! let mut viewport = EditorViewport::new(MonospaceFont::new(8.0, 16.0), ViewportConfig::new());
//! viewport.set_text("abc\ndef");
//! viewport.handle_input(InputEvent::KeyPressed(KeyCode::End));
//! viewport.handle_input(InputEvent::KeyTyped('!'));
//! assert_eq!(viewport.text(), "abc!\ndef");
//! ```

use crate::blink::CaretBlink;
use crate::buffer::LineBuffer;
use crate::caret::{CaretChange, CaretModel, CaretPosition};
use crate::config::ViewportConfig;
use crate::input::{InputEvent, InputOutcome, KeyCode, MouseClick, ScrollEvent};
use crate::mapper::{CoordinateMapper, ViewGeometry};
use crate::metrics::FontMetrics;
use crate::processing::{HighlightError, StyleSpanComputer};
use crate::render::{CaretPixel, RenderFrame, RenderLine, Renderer};
use crate::spans::{StyleSpan, spans_in_range};
use crate::text::expand_tabs;
use crate::worker::{HighlightOutcome, HighlightWorker};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Font metrics owned by a viewport.
pub type SharedFontMetrics = Box<dyn FontMetrics + Send>;

/// Editor viewport: buffer + caret + mapping + rendering + highlighting.
pub struct EditorViewport {
    buffer: LineBuffer,
    caret: CaretModel,
    font: SharedFontMetrics,
    config: ViewportConfig,
    geometry: ViewGeometry,
    blink: CaretBlink,
    /// Bumped on every text change.
    revision: u64,
    spans: Vec<StyleSpan>,
    spans_revision: Option<u64>,
    worker: Option<HighlightWorker>,
}

impl std::fmt::Debug for EditorViewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorViewport")
            .field("line_count", &self.buffer.line_count())
            .field("caret", &self.caret.position())
            .field("revision", &self.revision)
            .field("spans_revision", &self.spans_revision)
            .finish_non_exhaustive()
    }
}

impl EditorViewport {
    /// Create an empty viewport.
    pub fn new(font: impl FontMetrics + Send + 'static, config: ViewportConfig) -> Self {
        let glyph_line_height = font.line_height(&config.sample_glyphs);
        let geometry = ViewGeometry {
            glyph_line_height,
            line_spacing: config.line_spacing,
            tab_size: config.tab_size,
            padding: config.padding,
            ..ViewGeometry::default()
        };
        Self {
            buffer: LineBuffer::new(),
            caret: CaretModel::new(),
            font: Box::new(font),
            blink: CaretBlink::new(config.blink_interval, Instant::now()),
            config,
            geometry,
            revision: 0,
            spans: Vec::new(),
            spans_revision: None,
            worker: None,
        }
    }

    // ----- text source -----

    /// Replace the whole document; caret and scroll go back to the top.
    pub fn set_text(&mut self, text: &str) {
        self.buffer.set_text(text);
        self.caret.set_position(&self.buffer, 0, 0);
        self.geometry.scroll_x = 0.0;
        self.geometry.scroll_y = 0.0;
        self.text_changed();
    }

    /// The whole document.
    pub fn text(&self) -> String {
        self.buffer.text()
    }

    /// The line buffer.
    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    /// The caret.
    pub fn caret(&self) -> &CaretModel {
        &self.caret
    }

    /// Stored caret position.
    pub fn caret_position(&self) -> CaretPosition {
        self.caret.position()
    }

    /// Move the caret, clamped.
    pub fn set_caret_position(&mut self, line: i64, column: i64) {
        self.caret.set_position(&self.buffer, line, column);
    }

    /// Subscribe to caret changes.
    pub fn subscribe_caret<F>(&mut self, callback: F)
    where
        F: FnMut(&CaretChange) + Send + 'static,
    {
        self.caret.subscribe(callback);
    }

    /// Text revision (bumped on every change).
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ----- geometry -----

    /// Active configuration.
    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Replace the configuration (tab size, spacing, padding, blink, ...).
    pub fn set_config(&mut self, config: ViewportConfig) {
        self.geometry.tab_size = config.tab_size;
        self.geometry.line_spacing = config.line_spacing;
        self.geometry.padding = config.padding;
        self.geometry.glyph_line_height = self.font.line_height(&config.sample_glyphs);
        self.blink.set_interval(config.blink_interval, Instant::now());
        self.config = config;
    }

    /// Current geometry.
    pub fn geometry(&self) -> &ViewGeometry {
        &self.geometry
    }

    /// Swap the font; the line height is re-measured from the sample glyphs.
    pub fn set_font(&mut self, font: impl FontMetrics + Send + 'static) {
        self.geometry.glyph_line_height = font.line_height(&self.config.sample_glyphs);
        self.font = Box::new(font);
    }

    /// Resize the viewport (pixels).
    pub fn resize(&mut self, width: f64, height: f64) {
        self.geometry.viewport_width = width.max(0.0);
        self.geometry.viewport_height = height.max(0.0);
    }

    /// Set both scroll fractions (clamped to `[0, 1]`).
    pub fn set_scroll_fractions(&mut self, x: f64, y: f64) {
        self.geometry.scroll_x = x.clamp(0.0, 1.0);
        self.geometry.scroll_y = y.clamp(0.0, 1.0);
    }

    /// `(horizontal, vertical)` scroll fractions.
    pub fn scroll_fractions(&self) -> (f64, f64) {
        (self.geometry.scroll_x, self.geometry.scroll_y)
    }

    /// A mapper over the current state.
    pub fn mapper(&self) -> CoordinateMapper<'_, dyn FontMetrics + Send> {
        CoordinateMapper::new(&self.buffer, self.font.as_ref(), &self.geometry)
    }

    // ----- input -----

    /// Handle an event using the wall clock for the blink animation.
    pub fn handle_input(&mut self, event: InputEvent) -> InputOutcome {
        self.handle_input_at(event, Instant::now())
    }

    /// Handle an event at an explicit time.
    pub fn handle_input_at(&mut self, event: InputEvent, now: Instant) -> InputOutcome {
        match event {
            InputEvent::KeyPressed(_) | InputEvent::KeyTyped(_) => {
                self.blink.stop(now);
                self.blink.show();
                let outcome = match event {
                    InputEvent::KeyPressed(key) => self.handle_key(key),
                    InputEvent::KeyTyped(ch) => self.handle_typed(ch),
                    _ => InputOutcome::Ignored,
                };
                self.after_caret_change(outcome);
                self.blink.restart(now);
                outcome
            }
            InputEvent::MouseClicked(click) => {
                let outcome = self.handle_click(click);
                self.blink.restart(now);
                outcome
            }
            InputEvent::Scrolled(scroll) => self.handle_scroll(scroll),
        }
    }

    fn handle_key(&mut self, key: KeyCode) -> InputOutcome {
        if key.is_navigation() {
            self.move_caret(key);
            return InputOutcome::Navigated;
        }
        match key {
            KeyCode::Enter => self.split_line(),
            KeyCode::Backspace => self.delete_backward(),
            KeyCode::Delete => self.delete_forward(),
            KeyCode::Tab => {
                let text = if self.config.convert_tabs_to_spaces {
                    " ".repeat(self.config.tab_size)
                } else {
                    "\t".to_string()
                };
                self.insert_at_caret(&text)
            }
            _ => InputOutcome::Ignored,
        }
    }

    fn move_caret(&mut self, key: KeyCode) {
        let buffer = &self.buffer;
        match key {
            KeyCode::Up => self.caret.move_up(buffer),
            KeyCode::Down => self.caret.move_down(buffer),
            KeyCode::Left => self.caret.move_left(buffer),
            KeyCode::Right => self.caret.move_right(buffer),
            KeyCode::Home => self.caret.move_to_line_start(buffer),
            KeyCode::End => self.caret.move_to_line_end(buffer),
            KeyCode::PageUp => {
                let page = self.mapper().lines_per_page();
                self.caret.move_up_by(&self.buffer, page);
            }
            KeyCode::PageDown => {
                let page = self.mapper().lines_per_page();
                self.caret.move_down_by(&self.buffer, page);
            }
            _ => {}
        }
    }

    fn handle_typed(&mut self, ch: char) -> InputOutcome {
        if ch.is_control() {
            return InputOutcome::Ignored;
        }
        let mut buf = [0u8; 4];
        self.insert_at_caret(ch.encode_utf8(&mut buf))
    }

    fn insert_at_caret(&mut self, text: &str) -> InputOutcome {
        let pos = self.caret.clamped(&self.buffer);
        self.buffer.insert_text(pos.line, pos.column, text);
        let column = pos.column + text.chars().count();
        self.caret.set_position(&self.buffer, pos.line as i64, column as i64);
        InputOutcome::Edited
    }

    fn split_line(&mut self) -> InputOutcome {
        let pos = self.caret.clamped(&self.buffer);
        self.buffer.insert_newline(pos.line, pos.column);
        self.caret.set_position(&self.buffer, pos.line as i64 + 1, 0);
        InputOutcome::Edited
    }

    fn delete_backward(&mut self) -> InputOutcome {
        let pos = self.caret.clamped(&self.buffer);
        if pos.column > 0 {
            self.buffer.delete_text(pos.line, pos.column - 1, 1);
            self.caret.move_left(&self.buffer);
            InputOutcome::Edited
        } else if pos.line > 0 {
            let join_column = self.buffer.line_len(pos.line - 1);
            self.buffer.join_lines(pos.line - 1, pos.line);
            self.caret.set_position(&self.buffer, pos.line as i64 - 1, join_column as i64);
            InputOutcome::Edited
        } else {
            InputOutcome::Ignored
        }
    }

    fn delete_forward(&mut self) -> InputOutcome {
        let pos = self.caret.clamped(&self.buffer);
        if pos.column < self.buffer.line_len(pos.line) {
            self.buffer.delete_text(pos.line, pos.column, 1);
        } else if pos.line + 1 < self.buffer.line_count() {
            self.buffer.join_lines(pos.line, pos.line + 1);
        } else {
            return InputOutcome::Ignored;
        }
        self.caret.set_position(&self.buffer, pos.line as i64, pos.column as i64);
        InputOutcome::Edited
    }

    fn handle_click(&mut self, click: MouseClick) -> InputOutcome {
        let pos = self.mapper().position_for_point(click.x, click.y);
        self.caret.set_position(&self.buffer, pos.line as i64, pos.column as i64);
        InputOutcome::Navigated
    }

    fn handle_scroll(&mut self, scroll: ScrollEvent) -> InputOutcome {
        let mapper = self.mapper();
        let scrollable = mapper.scrollable_height();
        if scrollable <= 0.0 || scroll.ticks == 0 {
            return InputOutcome::Ignored;
        }
        let delta =
            f64::from(scroll.ticks) * self.config.line_scroll_speed * mapper.full_line_height();
        let offset = (mapper.vertical_scroll_px() + delta).clamp(0.0, scrollable);
        self.geometry.scroll_y = offset / scrollable;
        InputOutcome::Scrolled
    }

    fn after_caret_change(&mut self, outcome: InputOutcome) {
        match outcome {
            InputOutcome::Edited => {
                self.text_changed();
                self.ensure_caret_visible();
            }
            InputOutcome::Navigated => self.ensure_caret_visible(),
            InputOutcome::Ignored | InputOutcome::Scrolled => {}
        }
    }

    /// Scroll just enough for the caret to be inside the viewport.
    pub fn ensure_caret_visible(&mut self) {
        let pos = self.caret.clamped(&self.buffer);
        let mapper = self.mapper();
        let height = mapper.full_line_height();
        let padding = self.geometry.padding;

        let scrollable_y = mapper.scrollable_height();
        let caret_y = mapper.caret_y(pos.line);
        let mut new_y = None;
        if scrollable_y > 0.0 {
            let line_top = pos.line as f64 * height;
            if caret_y < 0.0 {
                new_y = Some(line_top);
            } else if caret_y + height > self.geometry.viewport_height {
                new_y = Some(line_top + padding.top + height - self.geometry.viewport_height);
            }
        }

        let caret_x = mapper.caret_x(pos.line, pos.column);
        let caret_width = mapper.caret_width();
        let mut new_x = None;
        if caret_x < padding.left
            || caret_x + caret_width > self.geometry.viewport_width - padding.right
        {
            let scrollable_x = mapper.scrollable_width();
            if scrollable_x > 0.0 {
                let x = mapper.prefix_width(pos.line, pos.column);
                let target = if caret_x < padding.left {
                    x
                } else {
                    x + caret_width + padding.left + padding.right - self.geometry.viewport_width
                };
                new_x = Some(target.clamp(0.0, scrollable_x) / scrollable_x);
            } else {
                new_x = Some(0.0);
            }
        }

        if let Some(y) = new_y {
            self.geometry.scroll_y = y.clamp(0.0, scrollable_y) / scrollable_y;
        }
        if let Some(x) = new_x {
            self.geometry.scroll_x = x;
        }
    }

    // ----- rendering -----

    /// Build the frame for the current state using the wall clock.
    pub fn frame(&self) -> RenderFrame {
        self.frame_at(Instant::now())
    }

    /// Build the frame for the current state at `now`.
    pub fn frame_at(&self, now: Instant) -> RenderFrame {
        let mapper = self.mapper();
        let range = mapper.visible_line_range();
        let tab_size = self.geometry.tab_size;

        let mut lines = Vec::with_capacity(range.len());
        let mut start_offset = self.buffer.line_start_offset(range.start);
        for line_index in range {
            let raw = self.buffer.line_or_empty(line_index);
            let len = raw.chars().count();
            lines.push(RenderLine {
                line_index,
                start_offset,
                y: mapper.caret_y(line_index),
                raw: raw.to_string(),
                text: expand_tabs(raw, tab_size),
                spans: spans_in_range(&self.spans, start_offset..start_offset + len),
            });
            start_offset += len + 1;
        }

        let pos = self.caret.clamped(&self.buffer);
        RenderFrame {
            lines,
            caret: CaretPixel {
                x: mapper.caret_x(pos.line, pos.column),
                y: mapper.caret_y(pos.line),
                height: mapper.full_line_height(),
                visible: self.blink.is_visible(now),
            },
            line_height: mapper.full_line_height(),
            horizontal_scroll: mapper.horizontal_scroll_px(),
            tab_size,
        }
    }

    /// Build a frame and hand it to `renderer`.
    pub fn render<R: Renderer>(&self, renderer: &mut R) -> Result<(), R::Error> {
        renderer.render(&self.frame())
    }

    // ----- highlighting -----

    /// Spans of the last accepted highlighting pass.
    pub fn spans(&self) -> &[StyleSpan] {
        &self.spans
    }

    /// Revision the current spans were computed for (`None` before the first pass).
    pub fn spans_revision(&self) -> Option<u64> {
        self.spans_revision
    }

    /// Run a highlighting pass synchronously. On failure the previous spans are kept.
    pub fn highlight_with(
        &mut self,
        computer: &mut dyn StyleSpanComputer,
    ) -> Result<(), HighlightError> {
        let text = self.buffer.text();
        match computer.compute(&text) {
            Ok(spans) => {
                self.spans = spans;
                self.spans_revision = Some(self.revision);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    highlighter = computer.name(),
                    error = %err,
                    "highlighting failed; keeping previous spans"
                );
                Err(err)
            }
        }
    }

    /// Highlight in the background from now on; the current text is submitted immediately.
    pub fn attach_worker(&mut self, worker: HighlightWorker) {
        self.worker = Some(worker);
        self.request_highlight();
    }

    /// Stop background highlighting, returning the worker.
    pub fn detach_worker(&mut self) -> Option<HighlightWorker> {
        self.worker.take()
    }

    /// Whether a background worker is attached.
    pub fn has_worker(&self) -> bool {
        self.worker.is_some()
    }

    /// Apply every finished background pass. Returns `true` if the spans changed.
    ///
    /// Results for an outdated revision are discarded.
    pub fn pump_highlights(&mut self) -> bool {
        let mut applied = false;
        while let Some(outcome) = self.worker.as_ref().and_then(HighlightWorker::try_recv) {
            applied |= self.apply_outcome(outcome) == Applied::Yes;
        }
        applied
    }

    /// Block until the pass for the current revision is applied, or `timeout` elapses.
    pub fn wait_for_highlight(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.spans_revision != Some(self.revision) {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let Some(outcome) = self.worker.as_ref().and_then(|w| w.recv_timeout(deadline - now))
            else {
                return false;
            };
            if self.apply_outcome(outcome) == Applied::Failed {
                // A failed pass for the current revision will not be retried.
                return false;
            }
        }
        true
    }

    fn apply_outcome(&mut self, outcome: HighlightOutcome) -> Applied {
        if outcome.revision != self.revision {
            tracing::debug!(
                revision = outcome.revision,
                current = self.revision,
                "discarding stale highlight result"
            );
            return Applied::Stale;
        }
        match outcome.result {
            Ok(spans) => {
                self.spans = spans;
                self.spans_revision = Some(outcome.revision);
                Applied::Yes
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "background highlighting failed; keeping previous spans"
                );
                Applied::Failed
            }
        }
    }

    fn text_changed(&mut self) {
        self.revision += 1;
        self.request_highlight();
    }

    fn request_highlight(&mut self) {
        let Some(worker) = self.worker.as_ref() else {
            return;
        };
        let snapshot: Arc<str> = Arc::from(self.buffer.text());
        if let Err(err) = worker.request(self.revision, snapshot) {
            tracing::warn!(error = %err, "highlight worker unavailable; detaching");
            self.worker = None;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Applied {
    Yes,
    Stale,
    Failed,
}

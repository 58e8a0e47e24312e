#![warn(missing_docs)]
//! Lineview Core - Headless Line-Oriented Code Viewport
//!
//! # Overview
//!
//! `lineview-core` is the toolkit-independent part of a small code editor viewport. It stores
//! the document as a list of lines, tracks a single caret, converts between pixels and
//! `(line, column)` positions, and turns highlighter output into normalized style spans.
//! Drawing is left to a [`Renderer`] supplied by the host.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  EditorViewport (input, scroll, frames)     │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  HighlightWorker / StyleSpanComputer        │  ← Highlighting
//! ├─────────────────────────────────────────────┤
//! │  CoordinateMapper + FontMetrics             │  ← Pixel mapping
//! ├─────────────────────────────────────────────┤
//! │  CaretModel                                 │  ← Caret + notifications
//! ├─────────────────────────────────────────────┤
//! │  LineBuffer                                 │  ← Text storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use lineview_core::{
//!     CaretChange, EditorViewport, InputEvent, KeyCode, MonospaceFont, ViewportConfig,
//! };
//! use std::sync::{Arc, Mutex};
//!
//! let mut viewport = EditorViewport::new(MonospaceFont::new(8.0, 16.0), ViewportConfig::new());
//! viewport.set_text("class A {\n}\n");
//!
//! let lines = Arc::new(Mutex::new(Vec::new()));
//! let sink = lines.clone();
//! viewport.subscribe_caret(move |change| {
//!     if let CaretChange::Line { new, .. } = change {
//!         sink.lock().unwrap().push(*new);
//!     }
//! });
//!
//! viewport.handle_input(InputEvent::KeyPressed(KeyCode::Down));
//! assert_eq!(*lines.lock().unwrap(), vec![1]);
//! assert_eq!(viewport.frame().lines.len(), 3);
//! ```
//!
//! # Module Description
//!
//! - [`buffer`] - Line storage
//! - [`caret`] - Caret model and change notifications
//! - [`metrics`] - Font measurement seam
//! - [`mapper`] - Pixel/position conversion
//! - [`spans`] - Style tags, spans, normalization
//! - [`processing`] - Highlighter interface
//! - [`worker`] - Background highlighting thread
//! - [`viewport`] - The viewport itself
//! - [`render`] - Frame data handed to renderers
//!
//! # Unicode Support
//!
//! Columns and span offsets count Unicode scalar values. Width measurement is delegated to
//! [`FontMetrics`]; [`MonospaceFont`] measures in terminal cells, so CJK characters count double.

pub mod blink;
pub mod buffer;
pub mod caret;
pub mod config;
pub mod input;
pub mod mapper;
pub mod metrics;
pub mod processing;
pub mod render;
pub mod spans;
mod text;
pub mod text_index;
pub mod viewport;
pub mod worker;

pub use blink::CaretBlink;
pub use buffer::{BufferError, LineBuffer};
pub use caret::{CaretCallback, CaretChange, CaretModel, CaretPosition};
pub use config::{
    DEFAULT_BLINK_INTERVAL, DEFAULT_LINE_SCROLL_SPEED, DEFAULT_TAB_SIZE, ViewportConfig,
};
pub use input::{InputEvent, InputOutcome, KeyCode, MouseClick, ScrollEvent};
pub use mapper::{CoordinateMapper, Insets, ViewGeometry};
pub use metrics::{DEFAULT_SAMPLE_GLYPHS, FontMetrics, MonospaceFont, char_cells, str_cells};
pub use processing::{HighlightError, PlainText, StyleSpanComputer};
pub use render::{CaretPixel, RenderFrame, RenderLine, Renderer};
pub use spans::{
    StyleSpan, StyleSpansBuilder, StyleTag, UnknownStyleTag, is_normalized, normalize_spans,
    spans_in_range,
};
pub use text::{expand_tabs, expanded_column};
pub use text_index::{CharCursor, TextIndex};
pub use viewport::{EditorViewport, SharedFontMetrics};
pub use worker::{HighlightOutcome, HighlightWorker};

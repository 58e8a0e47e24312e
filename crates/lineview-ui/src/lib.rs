//! `lineview-ui` - Composition layer for `lineview-core`.
//!
//! This crate turns a settings file into a ready-to-drive editor:
//!
//! - [`EditorSettings`]: the JSON settings file (highlighter, tabs, spacing, blink, colors)
//! - [`build_highlighter`]: picks one of the Java highlighters by [`HighlighterKind`]
//! - [`Theme`]: style tag → RGB color
//! - [`EditorSession`]: a viewport with foreground or background highlighting attached
//!
//! Drawing stays with the host; it implements [`lineview_core::Renderer`] and looks colors up in
//! the session's [`Theme`].

mod highlighter;
pub mod session;
pub mod settings;
pub mod theme;

pub use highlighter::build_highlighter;
pub use session::EditorSession;
pub use settings::{EditorSettings, HighlighterKind, SettingsError, UnknownHighlighter};
pub use theme::{Rgb, Theme};

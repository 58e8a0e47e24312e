#![warn(missing_docs)]
//! `lineview-treesitter` - Tree-sitter highlighters for `lineview-core`.
//!
//! Two [`StyleSpanComputer`](lineview_core::StyleSpanComputer) implementations share one
//! [`TreeSitterHighlightConfig`] (language + node kind → tag table):
//!
//! - [`AstHighlighter`]: strict. Parses from scratch and fails on syntax errors; atomic node
//!   kinds (string literals, marker annotations) are highlighted as a whole.
//! - [`CursorHighlighter`]: best effort. Keeps the previous tree, edits it with the changed range
//!   and reparses incrementally; walks leaves with a `TreeCursor`.
//!
//! Both ship with a Java table ([`TreeSitterHighlightConfig::java`]).

mod ast;
mod config;
mod cursor;
mod edit;

pub use ast::AstHighlighter;
pub use config::TreeSitterHighlightConfig;
pub use cursor::{CursorHighlighter, TreeSitterUpdateMode};

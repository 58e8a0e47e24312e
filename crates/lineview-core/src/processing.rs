//! Highlighting interface.
//!
//! A [`StyleSpanComputer`] turns the full document text into style spans. Implementations live
//! in other crates (`lineview-highlight-regex`, `lineview-treesitter`) and are selected by
//! configuration; the viewport only sees this trait.
//!
//! Highlighting is best effort. Callers keep the previous spans (or plain text) when a pass
//! fails and must not treat a successful pass as proof that the source is valid.

use crate::spans::{StyleSpan, normalize_spans};
use thiserror::Error;

/// Errors produced by highlighting passes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HighlightError {
    /// The source could not be parsed.
    #[error("parse failed: {0}")]
    Parse(String),
    /// The parser language could not be set up.
    #[error("language setup failed: {0}")]
    Language(String),
    /// A grammar pattern or query failed to compile.
    #[error("pattern compile failed: {0}")]
    Query(String),
    /// The highlighter reached a state its grammar should make impossible.
    #[error("internal highlighter error: {0}")]
    Internal(String),
    /// The background highlighting thread is gone.
    #[error("highlight worker stopped")]
    WorkerStopped,
}

/// Produces style spans for a full text snapshot.
pub trait StyleSpanComputer: Send {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Raw highlighting pass. The result may be sparse, unsorted or overlapping.
    fn compute_raw(&mut self, text: &str) -> Result<Vec<StyleSpan>, HighlightError>;

    /// Highlighting pass followed by the mandatory [`normalize_spans`] post-pass.
    ///
    /// The result covers `[0, text.chars().count())` exactly once.
    fn compute(&mut self, text: &str) -> Result<Vec<StyleSpan>, HighlightError> {
        let raw = self.compute_raw(text)?;
        let spans = normalize_spans(raw, text.chars().count());
        tracing::debug!(highlighter = self.name(), spans = spans.len(), "highlight pass");
        Ok(spans)
    }
}

impl<T: StyleSpanComputer + ?Sized> StyleSpanComputer for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn compute_raw(&mut self, text: &str) -> Result<Vec<StyleSpan>, HighlightError> {
        (**self).compute_raw(text)
    }

    fn compute(&mut self, text: &str) -> Result<Vec<StyleSpan>, HighlightError> {
        (**self).compute(text)
    }
}

/// A computer that tags nothing (plain text only).
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainText;

impl StyleSpanComputer for PlainText {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn compute_raw(&mut self, _text: &str) -> Result<Vec<StyleSpan>, HighlightError> {
        Ok(Vec::new())
    }
}

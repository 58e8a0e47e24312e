//! Style spans
//!
//! A [`StyleSpan`] tags a half-open char range of the full document text with a lexical
//! category. Highlighters may produce sparse, unsorted or overlapping spans; [`normalize_spans`]
//! turns any such list into the canonical form the renderer consumes:
//!
//! - sorted by `start`, contiguous, non-overlapping
//! - covering `[0, text_len)` exactly once (gaps become [`StyleTag::Plain`])

use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use thiserror::Error;

/// Lexical category of a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum StyleTag {
    /// Untagged text.
    #[default]
    Plain,
    /// Language keyword.
    Keyword,
    /// String or char literal.
    String,
    /// Comment.
    Comment,
    /// Identifier.
    Identifier,
    /// Type name.
    Type,
    /// Numeric literal.
    Number,
    /// Operator.
    Operator,
    /// Punctuation (braces, separators).
    Punctuation,
    /// Annotation (`@Override`).
    Annotation,
    /// Generic type brackets (`<T>`).
    GenericBracket,
    /// Lambda arrow (`->`).
    LambdaArrow,
    /// `true` / `false` / `null`.
    Literal,
}

impl StyleTag {
    /// Every tag, `Plain` first.
    pub const ALL: [StyleTag; 13] = [
        StyleTag::Plain,
        StyleTag::Keyword,
        StyleTag::String,
        StyleTag::Comment,
        StyleTag::Identifier,
        StyleTag::Type,
        StyleTag::Number,
        StyleTag::Operator,
        StyleTag::Punctuation,
        StyleTag::Annotation,
        StyleTag::GenericBracket,
        StyleTag::LambdaArrow,
        StyleTag::Literal,
    ];

    /// Tag name as consumed by themes; `Plain` is the empty string.
    pub fn as_str(self) -> &'static str {
        match self {
            StyleTag::Plain => "",
            StyleTag::Keyword => "keyword",
            StyleTag::String => "string",
            StyleTag::Comment => "comment",
            StyleTag::Identifier => "identifier",
            StyleTag::Type => "type",
            StyleTag::Number => "number",
            StyleTag::Operator => "operator",
            StyleTag::Punctuation => "punctuation",
            StyleTag::Annotation => "annotation",
            StyleTag::GenericBracket => "generic",
            StyleTag::LambdaArrow => "lambda",
            StyleTag::Literal => "literal",
        }
    }

    /// Whether this is the untagged style.
    pub fn is_plain(self) -> bool {
        self == StyleTag::Plain
    }
}

impl fmt::Display for StyleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown tag name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown style tag '{0}'")]
pub struct UnknownStyleTag(pub String);

impl FromStr for StyleTag {
    type Err = UnknownStyleTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StyleTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| UnknownStyleTag(s.to_string()))
    }
}

/// A tagged half-open char range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleSpan {
    /// Start char offset.
    pub start: usize,
    /// End char offset (exclusive).
    pub end: usize,
    /// Lexical category.
    pub tag: StyleTag,
}

impl StyleSpan {
    /// Create a span.
    pub fn new(start: usize, end: usize, tag: StyleTag) -> Self {
        Self { start, end, tag }
    }

    /// Create an untagged span.
    pub fn plain(start: usize, end: usize) -> Self {
        Self::new(start, end, StyleTag::Plain)
    }

    /// Number of chars covered.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers nothing.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// The covered range.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Incremental builder that fills gaps with plain spans as it goes.
///
/// Spans must be pushed in ascending order; a span starting before the current position is
/// clipped to it, and an empty remainder is dropped.
#[derive(Debug, Default)]
pub struct StyleSpansBuilder {
    spans: Vec<StyleSpan>,
    position: usize,
}

impl StyleSpansBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current end of the covered prefix.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Append a span, first filling any gap since the previous one.
    ///
    /// Returns the index of the pushed span, or `None` if it was clipped away.
    pub fn push(&mut self, start: usize, end: usize, tag: StyleTag) -> Option<usize> {
        let start = start.max(self.position);
        if end <= start {
            return None;
        }
        if start > self.position {
            self.spans.push(StyleSpan::plain(self.position, start));
        }
        self.spans.push(StyleSpan::new(start, end, tag));
        self.position = end;
        Some(self.spans.len() - 1)
    }

    /// Re-tag an already pushed span.
    pub fn retag(&mut self, index: usize, tag: StyleTag) {
        if let Some(span) = self.spans.get_mut(index) {
            span.tag = tag;
        }
    }

    /// Fill the tail up to `total_len` and return the spans.
    pub fn finish(mut self, total_len: usize) -> Vec<StyleSpan> {
        if self.position < total_len {
            self.spans.push(StyleSpan::plain(self.position, total_len));
        }
        self.spans
    }
}

/// Bring an arbitrary span list into canonical form for a text of `total_len` chars.
///
/// 1. Empty spans are dropped and the rest stably sorted by `start`.
/// 2. Among spans with the same `start`, the earliest collected one wins.
/// 3. Each span is truncated to end where the next one starts.
/// 4. Gaps (and the tail) are filled with plain spans.
pub fn normalize_spans(mut spans: Vec<StyleSpan>, total_len: usize) -> Vec<StyleSpan> {
    spans.retain(|s| !s.is_empty() && s.start < total_len);
    spans.sort_by_key(|s| s.start);
    spans.dedup_by_key(|s| s.start);

    let mut builder = StyleSpansBuilder::new();
    for (idx, span) in spans.iter().enumerate() {
        let mut end = span.end.min(total_len);
        if let Some(next) = spans.get(idx + 1) {
            end = end.min(next.start);
        }
        builder.push(span.start, end, span.tag);
    }
    builder.finish(total_len)
}

/// Check the canonical-form invariants against a text of `total_len` chars.
pub fn is_normalized(spans: &[StyleSpan], total_len: usize) -> bool {
    let mut position = 0usize;
    for span in spans {
        if span.start != position || span.is_empty() {
            return false;
        }
        position = span.end;
    }
    position == total_len
}

/// Spans of a normalized list that intersect `range`, clipped to it.
pub fn spans_in_range(spans: &[StyleSpan], range: Range<usize>) -> Vec<StyleSpan> {
    if range.start >= range.end {
        return Vec::new();
    }
    let first = spans.partition_point(|s| s.end <= range.start);
    spans[first..]
        .iter()
        .take_while(|s| s.start < range.end)
        .map(|s| StyleSpan::new(s.start.max(range.start), s.end.min(range.end), s.tag))
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_names_round_trip() {
        for tag in StyleTag::ALL {
            assert_eq!(tag.as_str().parse::<StyleTag>(), Ok(tag));
        }
        assert!("bogus".parse::<StyleTag>().is_err());
    }

    #[test]
    fn test_normalize_fills_gaps_and_truncates() {
        let spans = vec![
            StyleSpan::new(6, 9, StyleTag::Number),
            StyleSpan::new(0, 4, StyleTag::Keyword),
            StyleSpan::new(2, 3, StyleTag::String),
        ];
        let out = normalize_spans(spans, 10);
        assert_eq!(
            out,
            vec![
                StyleSpan::new(0, 2, StyleTag::Keyword),
                StyleSpan::new(2, 3, StyleTag::String),
                StyleSpan::plain(3, 6),
                StyleSpan::new(6, 9, StyleTag::Number),
                StyleSpan::plain(9, 10),
            ]
        );
        assert!(is_normalized(&out, 10));
    }

    #[test]
    fn test_normalize_same_start_keeps_first_collected() {
        let spans = vec![
            StyleSpan::new(0, 5, StyleTag::Type),
            StyleSpan::new(0, 3, StyleTag::Identifier),
        ];
        let out = normalize_spans(spans, 5);
        assert_eq!(out, vec![StyleSpan::new(0, 5, StyleTag::Type)]);
    }

    #[test]
    fn test_normalize_empty_text() {
        let out = normalize_spans(vec![StyleSpan::new(0, 3, StyleTag::Keyword)], 0);
        assert!(out.is_empty());
        assert!(is_normalized(&out, 0));
    }

    #[test]
    fn test_spans_in_range_clips() {
        let spans = normalize_spans(vec![StyleSpan::new(2, 6, StyleTag::String)], 8);
        assert_eq!(
            spans_in_range(&spans, 4..8),
            vec![StyleSpan::new(4, 6, StyleTag::String), StyleSpan::plain(6, 8)]
        );
        assert!(spans_in_range(&spans, 3..3).is_empty());
    }
}

use crate::config::TreeSitterHighlightConfig;
use lineview_core::{HighlightError, StyleSpan, StyleSpanComputer, StyleTag, TextIndex};
use tree_sitter::{Node, Parser};

/// A strict highlighter that reparses from scratch and rejects sources with syntax errors.
///
/// Every *highlight leaf* (a node without children, or a node whose kind is atomic in the
/// config) whose kind has a configured tag produces one span. Spans are collected in traversal
/// order and left to the normalization pass for sorting and clipping.
pub struct AstHighlighter {
    config: TreeSitterHighlightConfig,
    parser: Parser,
}

impl AstHighlighter {
    /// Create a highlighter from the given config.
    pub fn new(config: TreeSitterHighlightConfig) -> Result<Self, HighlightError> {
        let mut parser = Parser::new();
        parser
            .set_language(&config.language)
            .map_err(|e| HighlightError::Language(e.to_string()))?;
        Ok(Self { config, parser })
    }

    /// The active config.
    pub fn config(&self) -> &TreeSitterHighlightConfig {
        &self.config
    }

    fn collect(&self, node: Node<'_>, index: &TextIndex, out: &mut Vec<StyleSpan>) {
        let kind = node.kind();
        if node.child_count() == 0 || self.config.is_atomic(kind) {
            if let Some(tag) = self.config.style_for_node(node) {
                push_node(node, tag, index, out);
            }
            return;
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.collect(child, index, out);
        }
    }
}

impl std::fmt::Debug for AstHighlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AstHighlighter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl StyleSpanComputer for AstHighlighter {
    fn name(&self) -> &'static str {
        "ast"
    }

    fn compute_raw(&mut self, text: &str) -> Result<Vec<StyleSpan>, HighlightError> {
        let tree = self
            .parser
            .parse(text, None)
            .ok_or_else(|| HighlightError::Parse("parser produced no tree".to_string()))?;

        let root = tree.root_node();
        if root.has_error() {
            let message = match first_error(root) {
                Some(node) => {
                    let at = node.start_position();
                    format!("syntax error at {}:{}", at.row + 1, at.column + 1)
                }
                None => "syntax error".to_string(),
            };
            return Err(HighlightError::Parse(message));
        }

        let index = TextIndex::from_text(text);
        let mut spans = Vec::new();
        self.collect(root, &index, &mut spans);
        Ok(spans)
    }
}

fn push_node(node: Node<'_>, tag: StyleTag, index: &TextIndex, out: &mut Vec<StyleSpan>) {
    let start = index.byte_to_char(node.start_byte());
    let end = index.byte_to_char(node.end_byte());
    if start < end {
        out.push(StyleSpan::new(start, end, tag));
    }
}

/// First `ERROR` or `MISSING` node in document order.
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    node.children(&mut cursor).find_map(first_error)
}

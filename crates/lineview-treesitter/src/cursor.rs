use crate::config::TreeSitterHighlightConfig;
use crate::edit::diff_edit;
use lineview_core::{
    CharCursor, HighlightError, StyleSpan, StyleSpanComputer, StyleSpansBuilder, StyleTag,
};
use tree_sitter::{Parser, Tree};

/// How the highlighter updated its parse tree for the last pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeSitterUpdateMode {
    /// First parse for this highlighter instance.
    Initial,
    /// The previous tree was edited and re-parsed incrementally.
    Incremental,
    /// Incremental parsing failed; parsed from scratch.
    FullReparse,
    /// The text did not change; the previous tree was reused.
    Skipped,
}

/// A best-effort, incremental highlighter driven by a `TreeCursor` walk.
///
/// Only childless nodes are looked up in the style table. Gaps are filled during the walk, so
/// the raw output is already contiguous. Syntax errors are tolerated: whatever the error-recovering
/// parser produced is highlighted.
///
/// Qualified names after `import` are tagged [`StyleTag::Type`] as a whole.
pub struct CursorHighlighter {
    config: TreeSitterHighlightConfig,
    parser: Parser,
    tree: Option<Tree>,
    text: String,
    last_update_mode: TreeSitterUpdateMode,
}

impl CursorHighlighter {
    /// Create a highlighter from the given config.
    pub fn new(config: TreeSitterHighlightConfig) -> Result<Self, HighlightError> {
        let mut parser = Parser::new();
        parser
            .set_language(&config.language)
            .map_err(|e| HighlightError::Language(e.to_string()))?;
        Ok(Self {
            config,
            parser,
            tree: None,
            text: String::new(),
            last_update_mode: TreeSitterUpdateMode::FullReparse,
        })
    }

    /// Get the last update mode (useful for tests and instrumentation).
    pub fn last_update_mode(&self) -> TreeSitterUpdateMode {
        self.last_update_mode
    }

    /// Forget the previous tree; the next pass parses from scratch.
    pub fn reset(&mut self) {
        self.tree = None;
        self.text.clear();
    }

    fn update_tree(&mut self, text: &str) -> (Option<Tree>, TreeSitterUpdateMode) {
        let Some(mut old) = self.tree.take() else {
            return (self.parser.parse(text, None), TreeSitterUpdateMode::Initial);
        };

        let Some(edit) = diff_edit(&self.text, text) else {
            return (Some(old), TreeSitterUpdateMode::Skipped);
        };

        old.edit(&edit);
        match self.parser.parse(text, Some(&old)) {
            Some(tree) => (Some(tree), TreeSitterUpdateMode::Incremental),
            None => (
                self.parser.parse(text, None),
                TreeSitterUpdateMode::FullReparse,
            ),
        }
    }

    fn walk(&self, tree: &Tree, text: &str) -> Vec<StyleSpan> {
        let mut chars = CharCursor::new(text);
        let mut builder = StyleSpansBuilder::new();
        // Every visited leaf: its kind and the index of its span, if it got one.
        let mut leaves: Vec<(&'static str, Option<usize>)> = Vec::new();

        let mut cursor = tree.walk();
        'walk: loop {
            let node = cursor.node();
            if node.child_count() == 0 {
                let kind = node.kind();
                let index = self.config.style_for_node(node).and_then(|tag| {
                    let start = chars.char_offset(node.start_byte());
                    let end = chars.char_offset(node.end_byte());
                    builder.push(start, end, tag)
                });
                leaves.push((kind, index));
                if kind == "identifier" {
                    retag_import_chain(&leaves, &mut builder);
                }
            }

            if cursor.goto_first_child() {
                continue;
            }
            while !cursor.goto_next_sibling() {
                if !cursor.goto_parent() {
                    break 'walk;
                }
            }
        }

        builder.finish(chars.char_offset(text.len()))
    }
}

impl std::fmt::Debug for CursorHighlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CursorHighlighter")
            .field("config", &self.config)
            .field("last_update_mode", &self.last_update_mode)
            .finish_non_exhaustive()
    }
}

impl StyleSpanComputer for CursorHighlighter {
    fn name(&self) -> &'static str {
        "tree-cursor"
    }

    fn compute_raw(&mut self, text: &str) -> Result<Vec<StyleSpan>, HighlightError> {
        let (tree, mode) = self.update_tree(text);
        let Some(tree) = tree else {
            self.reset();
            return Err(HighlightError::Parse("parser produced no tree".to_string()));
        };

        let spans = self.walk(&tree, text);
        tracing::debug!(mode = ?mode, spans = spans.len(), "tree-cursor pass");

        self.tree = Some(tree);
        if mode != TreeSitterUpdateMode::Skipped {
            self.text.clear();
            self.text.push_str(text);
        }
        self.last_update_mode = mode;
        Ok(spans)
    }
}

/// If the last leaf closes a chain `import a.b.c`, re-tag the whole chain as a type.
fn retag_import_chain(leaves: &[(&'static str, Option<usize>)], builder: &mut StyleSpansBuilder) {
    let Some(last) = leaves.len().checked_sub(1) else {
        return;
    };
    let mut first = last;
    while first > 0 && matches!(leaves[first - 1].0, "identifier" | ".") {
        first -= 1;
    }
    if first == 0 || leaves[first - 1].0 != "import" {
        return;
    }
    for (_, index) in &leaves[first..=last] {
        if let Some(index) = index {
            builder.retag(*index, StyleTag::Type);
        }
    }
}

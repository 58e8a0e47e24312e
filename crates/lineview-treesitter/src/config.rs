use lineview_core::StyleTag;
use std::collections::{BTreeMap, BTreeSet};

/// Configuration shared by [`AstHighlighter`](crate::AstHighlighter) and
/// [`CursorHighlighter`](crate::CursorHighlighter).
#[derive(Debug, Clone)]
pub struct TreeSitterHighlightConfig {
    /// Tree-sitter language.
    pub language: tree_sitter::Language,
    /// Mapping from node kind (e.g. `"line_comment"`, `"{"`) to a style tag.
    pub node_styles: BTreeMap<String, StyleTag>,
    /// Node kinds highlighted as a whole; traversal does not descend below them.
    ///
    /// Only [`AstHighlighter`](crate::AstHighlighter) honors this.
    pub atomic_kinds: BTreeSet<String>,
    /// Tags for a node kind that apply only under a given parent kind, keyed by
    /// `(parent kind, node kind)`. They take precedence over `node_styles`.
    pub child_styles: BTreeMap<(String, String), StyleTag>,
}

impl TreeSitterHighlightConfig {
    /// Create a config with an empty style table.
    pub fn new(language: tree_sitter::Language) -> Self {
        Self {
            language,
            node_styles: BTreeMap::new(),
            atomic_kinds: BTreeSet::new(),
            child_styles: BTreeMap::new(),
        }
    }

    /// Add a set of node kind → tag mappings.
    pub fn with_node_styles<const N: usize>(
        mut self,
        styles: [(&'static str, StyleTag); N],
    ) -> Self {
        for (kind, tag) in styles {
            self.node_styles.insert(kind.to_string(), tag);
        }
        self
    }

    /// Map every kind in `kinds` to `tag`.
    pub fn with_kinds_as(mut self, kinds: &[&str], tag: StyleTag) -> Self {
        for kind in kinds {
            self.node_styles.insert((*kind).to_string(), tag);
        }
        self
    }

    /// Mark node kinds as atomic.
    pub fn with_atomic_kinds<const N: usize>(mut self, kinds: [&'static str; N]) -> Self {
        self.atomic_kinds.extend(kinds.into_iter().map(str::to_string));
        self
    }

    /// Add `(parent kind, node kind) → tag` mappings.
    pub fn with_child_styles<const N: usize>(
        mut self,
        styles: [(&'static str, &'static str, StyleTag); N],
    ) -> Self {
        for (parent, kind, tag) in styles {
            self.child_styles.insert((parent.to_string(), kind.to_string()), tag);
        }
        self
    }

    /// Tag configured for `kind`.
    pub fn style_for(&self, kind: &str) -> Option<StyleTag> {
        self.node_styles.get(kind).copied()
    }

    /// Tag for a node of `kind` whose parent is of kind `parent`.
    pub fn style_in(&self, parent: Option<&str>, kind: &str) -> Option<StyleTag> {
        parent
            .and_then(|parent| self.child_styles.get(&(parent.to_string(), kind.to_string())))
            .copied()
            .or_else(|| self.style_for(kind))
    }

    /// Tag for `node`, taking its parent into account.
    pub fn style_for_node(&self, node: tree_sitter::Node<'_>) -> Option<StyleTag> {
        self.style_in(node.parent().map(|parent| parent.kind()), node.kind())
    }

    /// Whether `kind` is atomic.
    pub fn is_atomic(&self, kind: &str) -> bool {
        self.atomic_kinds.contains(kind)
    }

    /// Java grammar with the default Java style table.
    pub fn java() -> Self {
        Self::new(tree_sitter_java::LANGUAGE.into())
            .with_kinds_as(JAVA_KEYWORDS, StyleTag::Keyword)
            .with_kinds_as(JAVA_OPERATORS, StyleTag::Operator)
            .with_kinds_as(JAVA_PUNCTUATION, StyleTag::Punctuation)
            .with_kinds_as(JAVA_NUMBERS, StyleTag::Number)
            .with_node_styles([
                ("identifier", StyleTag::Identifier),
                ("type_identifier", StyleTag::Type),
                ("line_comment", StyleTag::Comment),
                ("block_comment", StyleTag::Comment),
                ("string_literal", StyleTag::String),
                ("character_literal", StyleTag::String),
                ("string_fragment", StyleTag::String),
                ("escape_sequence", StyleTag::String),
                ("\"", StyleTag::String),
                ("\"\"\"", StyleTag::String),
                ("true", StyleTag::Literal),
                ("false", StyleTag::Literal),
                ("null_literal", StyleTag::Literal),
                ("@", StyleTag::Annotation),
                ("marker_annotation", StyleTag::Annotation),
                ("->", StyleTag::LambdaArrow),
            ])
            .with_child_styles([
                ("type_arguments", "<", StyleTag::GenericBracket),
                ("type_arguments", ">", StyleTag::GenericBracket),
                ("type_parameters", "<", StyleTag::GenericBracket),
                ("type_parameters", ">", StyleTag::GenericBracket),
            ])
            .with_atomic_kinds(["string_literal", "character_literal", "marker_annotation"])
    }
}

const JAVA_KEYWORDS: &[&str] = &[
    "abstract",
    "assert",
    "boolean",
    "boolean_type",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "exports",
    "extends",
    "final",
    "finally",
    "float",
    "for",
    "if",
    "implements",
    "import",
    "instanceof",
    "int",
    "interface",
    "long",
    "module",
    "native",
    "new",
    "non-sealed",
    "open",
    "opens",
    "package",
    "permits",
    "private",
    "protected",
    "provides",
    "public",
    "record",
    "requires",
    "return",
    "sealed",
    "short",
    "static",
    "strictfp",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "to",
    "transient",
    "transitive",
    "try",
    "uses",
    "void_type",
    "volatile",
    "when",
    "while",
    "with",
    "yield",
];

const JAVA_OPERATORS: &[&str] = &[
    "=", "+", "-", "*", "/", "%", "++", "--", "==", "!=", "<", ">", "<=", ">=", "&&", "||", "!",
    "~", "&", "|", "^", "<<", ">>", ">>>", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<=",
    ">>=", ">>>=", "?", ":", "::",
];

const JAVA_PUNCTUATION: &[&str] = &[";", ",", ".", "(", ")", "{", "}", "[", "]", "..."];

const JAVA_NUMBERS: &[&str] = &[
    "decimal_integer_literal",
    "hex_integer_literal",
    "octal_integer_literal",
    "binary_integer_literal",
    "decimal_floating_point_literal",
    "hex_floating_point_literal",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_style_overrides_kind_style() {
        let config = TreeSitterHighlightConfig::java();
        assert_eq!(config.style_in(None, "<"), Some(StyleTag::Operator));
        assert_eq!(config.style_in(Some("binary_expression"), "<"), Some(StyleTag::Operator));
        assert_eq!(
            config.style_in(Some("type_arguments"), "<"),
            Some(StyleTag::GenericBracket)
        );
        assert!(!config.is_atomic("type_arguments"));
    }
}

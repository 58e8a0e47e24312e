//! `lineview-highlight-regex` - Regex tokenizer highlighting for `lineview-core`.
//!
//! The whole grammar is a single alternation of named groups. Matches are found left to right
//! without overlap, the first named group that participated in a match decides its tag, and
//! everything between matches is plain text.
//!
//! Group names are [`StyleTag`] names (`keyword`, `string`, `generic`, ...), so a custom grammar
//! is just a pattern:
//!
//! ```rust
//! use lineview_core::{StyleSpanComputer, StyleTag};
//! use lineview_highlight_regex::RegexHighlighter;
//!
//! let mut highlighter =
//!     RegexHighlighter::from_pattern(r"(?P<keyword>\bSELECT\b)|(?P<number>\d+)").unwrap();
//! let spans = highlighter.compute("SELECT 1").unwrap();
//! assert_eq!(spans[0].tag, StyleTag::Keyword);
//! ```
//!
//! This is a lexer, not a parser: it never reports syntax errors.

use lineview_core::{
    CharCursor, HighlightError, StyleSpan, StyleSpanComputer, StyleSpansBuilder, StyleTag,
};
use regex::Regex;

/// One token class of a grammar: a tag and the pattern that recognizes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRule {
    tag: StyleTag,
    pattern: String,
}

impl TokenRule {
    /// Create a rule. `pattern` must not contain named groups of its own.
    pub fn new(tag: StyleTag, pattern: impl Into<String>) -> Self {
        Self {
            tag,
            pattern: pattern.into(),
        }
    }

    pub fn tag(&self) -> StyleTag {
        self.tag
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

#[derive(Debug, Clone, Copy)]
struct TokenGroup {
    index: usize,
    tag: StyleTag,
}

/// A regex-based tokenizer implementing [`StyleSpanComputer`].
#[derive(Debug, Clone)]
pub struct RegexHighlighter {
    regex: Regex,
    groups: Vec<TokenGroup>,
}

impl RegexHighlighter {
    /// Compose `rules` into one alternation; earlier rules win when several match at the same
    /// position.
    pub fn from_rules(rules: &[TokenRule]) -> Result<Self, HighlightError> {
        let pattern = rules
            .iter()
            .map(|rule| format!("(?P<{}>{})", group_name(rule.tag), rule.pattern))
            .collect::<Vec<_>>()
            .join("|");
        Self::from_pattern(&pattern)
    }

    /// Use a hand-written pattern. Every named group must be a [`StyleTag`] name; a tag may
    /// appear once.
    pub fn from_pattern(pattern: &str) -> Result<Self, HighlightError> {
        let regex = Regex::new(pattern).map_err(|e| HighlightError::Query(e.to_string()))?;

        let mut groups = Vec::new();
        for (index, name) in regex.capture_names().enumerate() {
            let Some(name) = name else {
                continue;
            };
            let tag = tag_for_group(name)?;
            groups.push(TokenGroup { index, tag });
        }
        if groups.is_empty() {
            return Err(HighlightError::Query(
                "pattern has no named token groups".to_string(),
            ));
        }

        Ok(Self { regex, groups })
    }

    /// The default Java grammar.
    pub fn java() -> Result<Self, HighlightError> {
        Self::from_rules(&java_rules())
    }

    /// The composed pattern.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Tags in priority order.
    pub fn tags(&self) -> impl Iterator<Item = StyleTag> + '_ {
        self.groups.iter().map(|g| g.tag)
    }
}

impl StyleSpanComputer for RegexHighlighter {
    fn name(&self) -> &'static str {
        "regex"
    }

    fn compute_raw(&mut self, text: &str) -> Result<Vec<StyleSpan>, HighlightError> {
        let mut cursor = CharCursor::new(text);
        let mut builder = StyleSpansBuilder::new();

        for caps in self.regex.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            if whole.is_empty() {
                continue;
            }
            let tag = self
                .groups
                .iter()
                .find(|group| caps.get(group.index).is_some())
                .map(|group| group.tag)
                .ok_or_else(|| {
                    HighlightError::Internal(format!(
                        "no token group matched {:?} at byte {}",
                        whole.as_str(),
                        whole.start()
                    ))
                })?;

            let start = cursor.char_offset(whole.start());
            let end = cursor.char_offset(whole.end());
            builder.push(start, end, tag);
        }

        Ok(builder.finish(cursor.char_offset(text.len())))
    }
}

/// Group name used for `tag` in composed patterns.
fn group_name(tag: StyleTag) -> &'static str {
    match tag {
        StyleTag::Plain => "plain",
        other => other.as_str(),
    }
}

fn tag_for_group(name: &str) -> Result<StyleTag, HighlightError> {
    if name == "plain" {
        return Ok(StyleTag::Plain);
    }
    name.parse::<StyleTag>().map_err(|e| HighlightError::Query(e.to_string()))
}

const JAVA_KEYWORDS: &[&str] = &[
    "abstract",
    "assert",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "const",
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
    "goto",
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
    "package",
    "permits",
    "private",
    "protected",
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
    "transient",
    "try",
    "var",
    "void",
    "volatile",
    "while",
    "yield",
];

/// Token classes of the Java grammar, in priority order.
pub fn java_rules() -> Vec<TokenRule> {
    let keywords = JAVA_KEYWORDS
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");

    vec![
        // Line comments, block comments and javadoc.
        TokenRule::new(StyleTag::Comment, r"//[^\n]*|/\*(?s:.)*?\*/"),
        // Text blocks, strings and char literals (single line, escapes allowed).
        TokenRule::new(
            StyleTag::String,
            r#""""(?s:.)*?"""|"(?:[^"\\\n]|\\.)*"|'(?:[^'\\\n]|\\.)*'"#,
        ),
        TokenRule::new(
            StyleTag::Annotation,
            r"@[\p{L}_$][\w$]*(?:\.[\p{L}_$][\w$]*)*",
        ),
        TokenRule::new(StyleTag::LambdaArrow, r"->"),
        TokenRule::new(StyleTag::Literal, r"\b(?:true|false|null)\b"),
        TokenRule::new(StyleTag::Keyword, format!(r"\b(?:{keywords})\b")),
        TokenRule::new(
            StyleTag::Number,
            r"\b(?:0[xX][0-9a-fA-F_]+|0[bB][01_]+|\d[\d_]*(?:\.\d[\d_]*)?(?:[eE][+-]?\d+)?)[lLfFdD]?\b",
        ),
        // Type arguments: `<>`, `<T>`, `<String, Integer>`, `<? extends Foo>`.
        TokenRule::new(StyleTag::GenericBracket, r"<(?:[A-Z?][\w\s,.?\[\]]*)?>"),
        TokenRule::new(StyleTag::Punctuation, r"\.\.\.|[{}()\[\];,.]"),
        TokenRule::new(
            StyleTag::Operator,
            r">>>=?|>>=?|<<=?|::|&&|\|\||\+\+|--|[-+*/%&|^!=<>]=?|[~?:]",
        ),
        TokenRule::new(StyleTag::Identifier, r"[\p{L}_$][\w$]*"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineview_core::is_normalized;
    use pretty_assertions::assert_eq;

    fn tagged(text: &str, spans: &[StyleSpan]) -> Vec<(String, StyleTag)> {
        let chars: Vec<char> = text.chars().collect();
        spans
            .iter()
            .map(|s| (chars[s.start..s.end].iter().collect(), s.tag))
            .collect()
    }

    #[test]
    fn test_simple_declaration() {
        let text = "int x = 5;";
        let spans = RegexHighlighter::java().unwrap().compute(text).unwrap();
        assert_eq!(
            spans,
            vec![
                StyleSpan::new(0, 3, StyleTag::Keyword),
                StyleSpan::plain(3, 4),
                StyleSpan::new(4, 5, StyleTag::Identifier),
                StyleSpan::plain(5, 6),
                StyleSpan::new(6, 7, StyleTag::Operator),
                StyleSpan::plain(7, 8),
                StyleSpan::new(8, 9, StyleTag::Number),
                StyleSpan::new(9, 10, StyleTag::Punctuation),
            ]
        );
        assert_eq!(spans.last().map(|s| s.end), Some(10));
    }

    #[test]
    fn test_comments_and_strings_win_over_contents() {
        let text = "s = \"int // x\"; // if 1\n/* class */";
        let spans = RegexHighlighter::java().unwrap().compute(text).unwrap();
        let tokens = tagged(text, &spans);

        assert!(tokens.contains(&("\"int // x\"".to_string(), StyleTag::String)));
        assert!(tokens.contains(&("// if 1".to_string(), StyleTag::Comment)));
        assert!(tokens.contains(&("/* class */".to_string(), StyleTag::Comment)));
        assert!(!tokens.iter().any(|(_, tag)| *tag == StyleTag::Keyword));
    }

    #[test]
    fn test_java_token_classes() {
        let text = "@Override\nList<String> xs = ys.stream().map(s -> null).toList(); // é";
        let spans = RegexHighlighter::java().unwrap().compute(text).unwrap();
        assert!(is_normalized(&spans, text.chars().count()));

        let tokens = tagged(text, &spans);
        assert_eq!(tokens[0], ("@Override".to_string(), StyleTag::Annotation));
        assert!(tokens.contains(&("<String>".to_string(), StyleTag::GenericBracket)));
        assert!(tokens.contains(&("->".to_string(), StyleTag::LambdaArrow)));
        assert!(tokens.contains(&("null".to_string(), StyleTag::Literal)));
        assert!(tokens.contains(&("stream".to_string(), StyleTag::Identifier)));
        assert!(tokens.contains(&("// é".to_string(), StyleTag::Comment)));
    }

    #[test]
    fn test_comparison_is_not_generic() {
        let text = "a < b && c > d";
        let spans = RegexHighlighter::java().unwrap().compute(text).unwrap();
        let tokens = tagged(text, &spans);
        assert!(tokens.contains(&("<".to_string(), StyleTag::Operator)));
        assert!(tokens.contains(&("&&".to_string(), StyleTag::Operator)));
        assert!(!tokens.iter().any(|(_, tag)| *tag == StyleTag::GenericBracket));
    }

    #[test]
    fn test_unknown_group_name_is_rejected() {
        let err = RegexHighlighter::from_pattern(r"(?P<bogus>x)").unwrap_err();
        assert!(matches!(err, HighlightError::Query(_)));

        let err = RegexHighlighter::from_pattern(r"(x").unwrap_err();
        assert!(matches!(err, HighlightError::Query(_)));
    }

    #[test]
    fn test_match_outside_named_groups_is_internal_error() {
        let mut highlighter = RegexHighlighter::from_pattern(r"(?P<keyword>\bif\b)|else").unwrap();
        assert!(highlighter.compute("if").is_ok());
        assert!(matches!(
            highlighter.compute("else"),
            Err(HighlightError::Internal(_))
        ));
    }

    #[test]
    fn test_tags_follow_rule_priority() {
        let rules = java_rules();
        let highlighter = RegexHighlighter::from_rules(&rules).unwrap();
        let expected: Vec<StyleTag> = rules.iter().map(TokenRule::tag).collect();
        assert_eq!(highlighter.tags().collect::<Vec<_>>(), expected);

        let custom = RegexHighlighter::from_pattern(r"(?P<number>\d+)|(?P<keyword>if)").unwrap();
        assert_eq!(
            custom.tags().collect::<Vec<_>>(),
            [StyleTag::Number, StyleTag::Keyword]
        );
    }
}

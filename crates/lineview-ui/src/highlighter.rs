use crate::settings::HighlighterKind;
use lineview_core::{HighlightError, StyleSpanComputer};
use lineview_highlight_regex::RegexHighlighter;
use lineview_treesitter::{AstHighlighter, CursorHighlighter, TreeSitterHighlightConfig};

/// Build the Java highlighter selected by `kind`. `HighlighterKind::None` yields `None`.
pub fn build_highlighter(
    kind: HighlighterKind,
) -> Result<Option<Box<dyn StyleSpanComputer>>, HighlightError> {
    let highlighter: Box<dyn StyleSpanComputer> = match kind {
        HighlighterKind::Ast => Box::new(AstHighlighter::new(TreeSitterHighlightConfig::java())?),
        HighlighterKind::Regex => Box::new(RegexHighlighter::java()?),
        HighlighterKind::TreeCursor => {
            Box::new(CursorHighlighter::new(TreeSitterHighlightConfig::java())?)
        }
        HighlighterKind::None => return Ok(None),
    };
    Ok(Some(highlighter))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_builds() {
        for kind in HighlighterKind::ALL {
            let highlighter = build_highlighter(kind).unwrap();
            match kind {
                HighlighterKind::None => assert!(highlighter.is_none()),
                _ => assert_eq!(highlighter.map(|h| h.name()), Some(kind.as_str())),
            }
        }
    }
}

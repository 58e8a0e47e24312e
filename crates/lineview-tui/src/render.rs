//! `Renderer` implementation producing ratatui lines.

use lineview_core::{RenderFrame, Renderer, StyleTag, char_cells};
use lineview_ui::{Rgb, Theme};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use std::convert::Infallible;

pub fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

pub fn style_for_tag(theme: &Theme, tag: StyleTag) -> Style {
    let style = Style::default()
        .fg(color(theme.color(tag)))
        .bg(color(theme.background));
    match tag {
        StyleTag::Comment => style.add_modifier(Modifier::ITALIC),
        StyleTag::Keyword | StyleTag::Annotation => style.add_modifier(Modifier::BOLD),
        _ => style,
    }
}

/// Collects one frame as terminal rows. Terminal cells are the viewport's pixels.
pub struct TerminalRenderer<'a> {
    theme: &'a Theme,
    width: u16,
    height: u16,
    pub rows: Vec<Line<'static>>,
    /// Caret cell relative to the text area, when it should be shown.
    pub caret: Option<(u16, u16)>,
}

impl<'a> TerminalRenderer<'a> {
    pub fn new(theme: &'a Theme, width: u16, height: u16) -> Self {
        Self {
            theme,
            width,
            height,
            rows: Vec::new(),
            caret: None,
        }
    }
}

impl Renderer for TerminalRenderer<'_> {
    type Error = Infallible;

    fn render(&mut self, frame: &RenderFrame) -> Result<(), Self::Error> {
        self.rows = vec![Line::default(); usize::from(self.height)];
        self.caret = None;

        let skip = frame.horizontal_scroll.max(0.0).round() as usize;
        for line in &frame.lines {
            if line.y < 0.0 {
                continue;
            }
            let row = line.y.floor() as usize;
            let Some(slot) = self.rows.get_mut(row) else {
                continue;
            };
            let spans = clip_segments(line.segments(frame.tab_size), skip, usize::from(self.width))
                .into_iter()
                .map(|(text, tag)| Span::styled(text, style_for_tag(self.theme, tag)))
                .collect::<Vec<_>>();
            *slot = Line::from(spans);
        }

        let caret = frame.caret;
        if caret.visible
            && caret.x >= 0.0
            && caret.y >= 0.0
            && caret.x < f64::from(self.width)
            && caret.y < f64::from(self.height)
        {
            self.caret = Some((caret.x.floor() as u16, caret.y.floor() as u16));
        }
        Ok(())
    }
}

/// Drop the first `skip` cells of a row and keep at most `width` cells.
///
/// A wide char cut by either edge is replaced by spaces so columns stay aligned.
pub fn clip_segments(
    segments: Vec<(String, StyleTag)>,
    skip: usize,
    width: usize,
) -> Vec<(String, StyleTag)> {
    let mut out = Vec::new();
    let mut cell = 0usize;
    let end = skip + width;

    for (text, tag) in segments {
        let mut kept = String::new();
        for ch in text.chars() {
            let w = char_cells(ch);
            let (from, to) = (cell, cell + w);
            cell = to;
            if to <= skip {
                continue;
            }
            if from >= end {
                break;
            }
            if from < skip || to > end {
                let visible = to.min(end) - from.max(skip);
                kept.extend(std::iter::repeat_n(' ', visible));
            } else {
                kept.push(ch);
            }
        }
        if !kept.is_empty() {
            out.push((kept, tag));
        }
        if cell >= end {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineview_core::{EditorViewport, InputEvent, KeyCode, MonospaceFont, ViewportConfig};
    use std::time::Instant;

    fn texts(segments: &[(String, StyleTag)]) -> Vec<&str> {
        segments.iter().map(|(s, _)| s.as_str()).collect()
    }

    #[test]
    fn test_clip_segments() {
        let segments = vec![
            ("int".to_string(), StyleTag::Keyword),
            (" x".to_string(), StyleTag::Plain),
        ];
        assert_eq!(texts(&clip_segments(segments.clone(), 0, 10)), ["int", " x"]);
        assert_eq!(texts(&clip_segments(segments.clone(), 2, 2)), ["t", " "]);
        assert_eq!(texts(&clip_segments(segments, 5, 4)), Vec::<&str>::new());
    }

    #[test]
    fn test_clip_wide_chars() {
        let segments = vec![("中a".to_string(), StyleTag::String)];
        assert_eq!(texts(&clip_segments(segments.clone(), 1, 5)), [" a"]);
        assert_eq!(texts(&clip_segments(segments, 0, 1)), [" "]);
    }

    fn viewport(text: &str, width: u16, height: u16) -> EditorViewport {
        let mut viewport = EditorViewport::new(MonospaceFont::cells(), ViewportConfig::new());
        viewport.resize(f64::from(width), f64::from(height));
        viewport.set_text(text);
        viewport
    }

    #[test]
    fn test_renders_rows_and_caret() {
        let mut viewport = viewport("ab\n\tc", 20, 3);
        viewport.set_caret_position(1, 0);
        let now = Instant::now();
        viewport.handle_input_at(InputEvent::KeyPressed(KeyCode::Right), now);

        let theme = Theme::dark();
        let mut renderer = TerminalRenderer::new(&theme, 20, 3);
        let Ok(()) = renderer.render(&viewport.frame_at(now));

        assert_eq!(renderer.rows.len(), 3);
        assert_eq!(renderer.rows[0].to_string(), "ab");
        assert_eq!(renderer.rows[1].to_string(), "    c");
        assert_eq!(renderer.caret, Some((4, 1)));
    }

    #[test]
    fn test_caret_at_end_of_full_row_is_drawn() {
        let mut viewport = viewport("abcde", 5, 1);
        let now = Instant::now();
        viewport.handle_input_at(InputEvent::KeyPressed(KeyCode::End), now);

        let theme = Theme::dark();
        let mut renderer = TerminalRenderer::new(&theme, 5, 1);
        let Ok(()) = renderer.render(&viewport.frame_at(now));

        assert_eq!(renderer.rows[0].to_string(), "bcde");
        assert_eq!(renderer.caret, Some((4, 0)));
    }

    #[test]
    fn test_hidden_caret_is_not_drawn() {
        let viewport = viewport("ab", 20, 1);
        let hidden = Instant::now() + viewport.config().blink_interval * 3;

        let theme = Theme::dark();
        let mut renderer = TerminalRenderer::new(&theme, 20, 1);
        let Ok(()) = renderer.render(&viewport.frame_at(hidden));

        assert_eq!(renderer.caret, None);
    }
}

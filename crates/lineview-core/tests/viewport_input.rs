use lineview_core::{
    CaretPosition, EditorViewport, FontMetrics, HighlightError, HighlightWorker, InputEvent,
    InputOutcome, Insets, KeyCode, MonospaceFont, MouseClick, PlainText, RenderFrame, Renderer,
    ScrollEvent, StyleSpan, StyleSpanComputer, StyleTag, ViewportConfig, is_normalized,
};
use pretty_assertions::assert_eq;
use std::convert::Infallible;
use std::time::Duration;

fn numbered_lines(count: usize) -> String {
    (0..count)
        .map(|i| format!("line {i:02} of the document"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn viewport_with(text: &str, config: ViewportConfig) -> EditorViewport {
    let mut viewport = EditorViewport::new(MonospaceFont::new(10.0, 10.0), config);
    viewport.resize(200.0, 100.0);
    viewport.set_text(text);
    viewport
}

fn viewport(text: &str) -> EditorViewport {
    viewport_with(text, ViewportConfig::new())
}

fn press(viewport: &mut EditorViewport, key: KeyCode) -> InputOutcome {
    viewport.handle_input(InputEvent::KeyPressed(key))
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_enter_backspace_delete() {
    let mut v = viewport("abc\ndef");
    v.set_caret_position(0, 1);

    assert_eq!(press(&mut v, KeyCode::Enter), InputOutcome::Edited);
    assert_eq!(v.text(), "a\nbc\ndef");
    assert_eq!(v.caret_position(), CaretPosition::new(1, 0));

    press(&mut v, KeyCode::Backspace);
    assert_eq!(v.text(), "abc\ndef");
    assert_eq!(v.caret_position(), CaretPosition::new(0, 1));

    press(&mut v, KeyCode::Backspace);
    assert_eq!(v.text(), "bc\ndef");
    assert_eq!(v.caret_position(), CaretPosition::new(0, 0));
    assert_eq!(press(&mut v, KeyCode::Backspace), InputOutcome::Ignored);

    press(&mut v, KeyCode::End);
    press(&mut v, KeyCode::Delete);
    assert_eq!(v.text(), "bcdef");
    assert_eq!(v.caret_position(), CaretPosition::new(0, 2));

    press(&mut v, KeyCode::Delete);
    assert_eq!(v.text(), "bcef");
    press(&mut v, KeyCode::End);
    assert_eq!(press(&mut v, KeyCode::Delete), InputOutcome::Ignored);
}

#[test]
fn test_typing_at_stale_column_inserts_at_line_end() {
    let mut v = viewport("ab\nabcdef");
    v.set_caret_position(1, 6);
    press(&mut v, KeyCode::Up);
    assert_eq!(v.caret_position(), CaretPosition::new(0, 6));

    v.handle_input(InputEvent::KeyTyped('!'));
    assert_eq!(v.text(), "ab!\nabcdef");
    assert_eq!(v.caret_position(), CaretPosition::new(0, 3));
}

#[test]
fn test_tab_key_respects_conversion() {
    let mut v = viewport("x");
    press(&mut v, KeyCode::Tab);
    assert_eq!(v.text(), "\tx");
    assert_eq!(v.caret_position(), CaretPosition::new(0, 1));

    let config = ViewportConfig::new()
        .with_tab_size(2)
        .with_tabs_as_spaces(true);
    let mut v = viewport_with("x", config);
    press(&mut v, KeyCode::Tab);
    assert_eq!(v.text(), "  x");
    assert_eq!(v.caret_position(), CaretPosition::new(0, 2));
}

#[test]
fn test_page_keys_move_by_visible_lines() {
    let mut v = viewport(&numbered_lines(30));

    press(&mut v, KeyCode::PageDown);
    assert_eq!(v.caret_position(), CaretPosition::new(10, 0));
    // Line 10 would sit just below the viewport, so it scrolls by one line.
    assert!(close(v.mapper().vertical_scroll_px(), 10.0));
    assert!(close(v.mapper().caret_y(10), 90.0));

    press(&mut v, KeyCode::PageDown);
    press(&mut v, KeyCode::PageDown);
    assert_eq!(v.caret_position(), CaretPosition::new(29, 0));

    press(&mut v, KeyCode::PageUp);
    assert_eq!(v.caret_position(), CaretPosition::new(19, 0));
}

#[test]
fn test_scroll_wheel_clamps() {
    let mut v = viewport(&numbered_lines(30));

    // 1 tick * 3 lines * 10px over 200px of scrollable height.
    assert_eq!(
        v.handle_input(InputEvent::Scrolled(ScrollEvent { ticks: 1 })),
        InputOutcome::Scrolled
    );
    assert!(close(v.mapper().vertical_scroll_px(), 30.0));

    v.handle_input(InputEvent::Scrolled(ScrollEvent { ticks: 100 }));
    assert_eq!(v.scroll_fractions().1, 1.0);
    assert_eq!(v.mapper().visible_line_range(), 20..30);

    v.handle_input(InputEvent::Scrolled(ScrollEvent { ticks: -100 }));
    assert_eq!(v.scroll_fractions().1, 0.0);

    let mut short = viewport("one line");
    assert_eq!(
        short.handle_input(InputEvent::Scrolled(ScrollEvent { ticks: 1 })),
        InputOutcome::Ignored
    );
}

#[test]
fn test_click_places_caret_with_left_bias() {
    let mut v = viewport("first\nsecond");
    let outcome = v.handle_input(InputEvent::MouseClicked(MouseClick {
        x: 25.0,
        y: 15.0,
        click_count: 1,
    }));
    assert_eq!(outcome, InputOutcome::Navigated);
    assert_eq!(v.caret_position(), CaretPosition::new(1, 2));
}

#[test]
fn test_click_inside_padding_offsets() {
    let config = ViewportConfig::new().with_padding(Insets {
        top: 5.0,
        left: 10.0,
        ..Insets::default()
    });
    let mut v = viewport_with("first\nsecond", config);
    let outcome = v.handle_input(InputEvent::MouseClicked(MouseClick {
        x: 35.0,
        y: 20.0,
        click_count: 1,
    }));
    assert!(outcome.is_consumed());
    assert_eq!(v.caret_position(), CaretPosition::new(1, 2));
    assert!(close(v.frame().caret.x, 30.0));
    assert!(close(v.frame().caret.y, 15.0));
}

#[test]
fn test_navigation_keys_never_edit() {
    let mut v = viewport("ab\ncd");
    for key in [
        KeyCode::Up,
        KeyCode::Down,
        KeyCode::Left,
        KeyCode::Right,
        KeyCode::Home,
        KeyCode::End,
        KeyCode::PageUp,
        KeyCode::PageDown,
    ] {
        assert!(key.is_navigation());
        assert_eq!(press(&mut v, key), InputOutcome::Navigated, "{key:?}");
    }
    assert_eq!(v.revision(), 1);
    assert!(!KeyCode::Tab.is_navigation());
}

#[test]
fn test_end_scrolls_horizontally() {
    let mut v = viewport(&"x".repeat(30));
    press(&mut v, KeyCode::End);
    assert_eq!(v.scroll_fractions().0, 1.0);
    assert!(close(v.frame().caret.x, 190.0));

    press(&mut v, KeyCode::Home);
    assert_eq!(v.scroll_fractions().0, 0.0);
}

#[test]
fn test_caret_after_full_width_line_stays_in_view() {
    let mut v = viewport(&"x".repeat(20));
    press(&mut v, KeyCode::End);

    let caret = v.frame().caret;
    assert_eq!(v.scroll_fractions().0, 1.0);
    assert!(close(caret.x, 190.0));
    assert!(caret.x + 10.0 <= 200.0);
}

/// Line height equals the number of sample glyphs.
struct SampleCountingFont;

impl FontMetrics for SampleCountingFont {
    fn text_width(&self, text: &str) -> f64 {
        text.chars().count() as f64
    }

    fn line_height(&self, sample: &str) -> f64 {
        sample.chars().count() as f64
    }
}

#[test]
fn test_sample_glyphs_set_line_height() {
    let config = ViewportConfig::new().with_sample_glyphs("Ag");
    let mut v = EditorViewport::new(SampleCountingFont, config);
    v.set_text("a\nb");
    assert_eq!(v.frame().line_height, 2.0);

    v.set_config(ViewportConfig::new().with_sample_glyphs("Agjy"));
    assert_eq!(v.frame().line_height, 4.0);
}

#[derive(Default)]
struct Recorder {
    frames: Vec<RenderFrame>,
}

impl Renderer for Recorder {
    type Error = Infallible;

    fn render(&mut self, frame: &RenderFrame) -> Result<(), Self::Error> {
        self.frames.push(frame.clone());
        Ok(())
    }
}

#[test]
fn test_render_only_visible_lines() {
    let mut v = viewport(&numbered_lines(30));
    v.set_scroll_fractions(0.0, 0.5);

    let mut recorder = Recorder::default();
    v.render(&mut recorder).unwrap();

    let frame = &recorder.frames[0];
    assert_eq!(frame.first_line(), Some(10));
    assert_eq!(frame.lines.len(), 10);
    assert_eq!(frame.lines[0].raw, "line 10 of the document");
    assert!(close(frame.lines[0].y, 0.0));
    assert_eq!(frame.line_height, 10.0);
}

#[test]
fn test_frame_expands_tabs_and_slices_spans() {
    let mut v = viewport("\tint a;\nb");
    v.highlight_with(&mut PlainText).unwrap();

    let frame = v.frame();
    assert_eq!(frame.lines[0].text, "    int a;");
    assert_eq!(frame.lines[0].spans, vec![StyleSpan::plain(0, 7)]);
    assert_eq!(frame.lines[1].start_offset, 8);
    assert_eq!(frame.lines[1].spans, vec![StyleSpan::plain(8, 9)]);
    assert!(close(frame.caret.x, 0.0));
}

struct Broken;

impl StyleSpanComputer for Broken {
    fn name(&self) -> &'static str {
        "broken"
    }

    fn compute_raw(&mut self, _text: &str) -> Result<Vec<StyleSpan>, HighlightError> {
        Err(HighlightError::Parse("unbalanced braces".into()))
    }
}

struct FirstCharKeyword;

impl StyleSpanComputer for FirstCharKeyword {
    fn name(&self) -> &'static str {
        "first-char"
    }

    fn compute_raw(&mut self, _text: &str) -> Result<Vec<StyleSpan>, HighlightError> {
        Ok(vec![StyleSpan::new(0, 1, StyleTag::Keyword)])
    }
}

#[test]
fn test_failed_highlight_keeps_previous_spans() {
    let mut v = viewport("abc");
    v.highlight_with(&mut FirstCharKeyword).unwrap();
    let before = v.spans().to_vec();

    v.handle_input(InputEvent::KeyTyped('z'));
    let err = v.highlight_with(&mut Broken).unwrap_err();
    assert_eq!(err, HighlightError::Parse("unbalanced braces".into()));
    assert_eq!(v.spans(), before.as_slice());
    assert_eq!(v.spans_revision(), Some(v.revision() - 1));
}

#[test]
fn test_background_worker_follows_edits() {
    let mut v = viewport("class A {}");
    let worker = HighlightWorker::spawn(Box::new(FirstCharKeyword)).unwrap();
    v.attach_worker(worker);
    assert!(v.wait_for_highlight(Duration::from_secs(5)));
    assert!(is_normalized(v.spans(), 10));

    for ch in " // done".chars() {
        press(&mut v, KeyCode::End);
        v.handle_input(InputEvent::KeyTyped(ch));
    }
    assert!(v.wait_for_highlight(Duration::from_secs(5)));
    assert_eq!(v.spans_revision(), Some(v.revision()));
    assert!(is_normalized(v.spans(), v.text().chars().count()));
    assert_eq!(v.spans()[0], StyleSpan::new(0, 1, StyleTag::Keyword));

    assert!(v.detach_worker().is_some());
    assert!(!v.pump_highlights());
}

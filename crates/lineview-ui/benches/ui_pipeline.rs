use criterion::{Criterion, black_box, criterion_group, criterion_main};
use lineview_core::{InputEvent, MonospaceFont};
use lineview_ui::{EditorSession, EditorSettings, HighlighterKind};

fn java_source(classes: usize) -> String {
    let mut out = String::new();
    for i in 0..classes {
        out.push_str(&format!(
            "/** Class {i}. */\n@Deprecated\npublic class C{i}<T> {{\n    private final java.util.List<T> items = new java.util.ArrayList<>();\n    int size() {{ return items.size() + {i}; }}\n}}\n"
        ));
    }
    out
}

fn bench_type_and_highlight(c: &mut Criterion) {
    let text = java_source(200);
    let mut group = c.benchmark_group("type_and_highlight");
    for kind in [
        HighlighterKind::Regex,
        HighlighterKind::Ast,
        HighlighterKind::TreeCursor,
    ] {
        let settings = EditorSettings {
            highlighter: kind,
            background_highlighting: false,
            ..EditorSettings::default()
        };
        let mut session = match EditorSession::new(settings, MonospaceFont::cells(), &text) {
            Ok(session) => session,
            Err(e) => panic!("session setup failed: {e}"),
        };
        session.viewport_mut().set_caret_position(0, 4);
        group.bench_function(kind.as_str(), |b| {
            b.iter(|| {
                session.handle_input(InputEvent::KeyTyped('x'));
                black_box(session.refresh());
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_type_and_highlight);
criterion_main!(benches);

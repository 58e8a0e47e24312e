use lineview_core::{CaretChange, CaretModel, CaretPosition, LineBuffer};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};

fn record(caret: &mut CaretModel) -> Arc<Mutex<Vec<CaretChange>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    caret.subscribe(move |change| sink.lock().unwrap().push(*change));
    log
}

#[test]
fn test_set_position_always_lands_inside_buffer() {
    let mut rng = StdRng::seed_from_u64(42);
    let buffer = LineBuffer::from_text("short\n\na much longer line\n中文\nx");
    let mut caret = CaretModel::new();

    let extremes = [i64::MIN, -1, 0, 1, 3, 17, i64::MAX];
    for &line in &extremes {
        for &column in &extremes {
            caret.set_position(&buffer, line, column);
            let pos = caret.position();
            assert!(pos.line < buffer.line_count());
            assert!(pos.column <= buffer.line_len(pos.line));
        }
    }

    for _ in 0..1_000 {
        let line = rng.gen_range(-20..20);
        let column = rng.gen_range(-50..50);
        caret.set_position(&buffer, line, column);
        let pos = caret.position();
        assert!(pos.line < buffer.line_count());
        assert!(pos.column <= buffer.line_len(pos.line));
    }
}

#[test]
fn test_split_then_move_right_wraps() {
    let mut buffer = LineBuffer::from_text("abc\ndef");
    let mut caret = CaretModel::new();

    buffer.insert_newline(0, 1);
    caret.set_position(&buffer, 0, 1);
    caret.move_right(&buffer);

    assert_eq!(caret.position(), CaretPosition::new(1, 0));
}

#[test]
fn test_move_up_keeps_long_column() {
    let buffer = LineBuffer::from_text("ab\nabcdef");
    let mut caret = CaretModel::new();
    caret.set_position(&buffer, 1, 6);

    caret.move_up(&buffer);
    assert_eq!(caret.position(), CaretPosition::new(0, 6));
    assert_eq!(caret.clamped(&buffer), CaretPosition::new(0, 2));

    // Horizontal motion starts from the clamped column.
    caret.move_left(&buffer);
    assert_eq!(caret.position(), CaretPosition::new(0, 1));
}

#[test]
fn test_moves_stop_at_document_edges() {
    let buffer = LineBuffer::from_text("ab\ncd");
    let mut caret = CaretModel::new();

    caret.move_left(&buffer);
    caret.move_up(&buffer);
    assert_eq!(caret.position(), CaretPosition::new(0, 0));

    caret.set_position(&buffer, 1, 2);
    caret.move_right(&buffer);
    caret.move_down(&buffer);
    assert_eq!(caret.position(), CaretPosition::new(1, 2));
}

#[test]
fn test_multi_step_moves_cross_lines() {
    let buffer = LineBuffer::from_text("ab\ncd\nef");
    let mut caret = CaretModel::new();

    caret.move_right_by(&buffer, 4);
    assert_eq!(caret.position(), CaretPosition::new(1, 1));

    caret.move_left_by(&buffer, 3);
    assert_eq!(caret.position(), CaretPosition::new(0, 1));

    caret.move_down_by(&buffer, 10);
    assert_eq!(caret.position(), CaretPosition::new(2, 1));
}

#[test]
fn test_every_update_notifies_line_column_caret() {
    let buffer = LineBuffer::from_text("abc\ndef");
    let mut caret = CaretModel::new();
    let log = record(&mut caret);

    caret.set_position(&buffer, 1, 2);
    caret.set_position(&buffer, 1, 2);

    let origin = CaretPosition::new(0, 0);
    let target = CaretPosition::new(1, 2);
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            CaretChange::Line { old: 0, new: 1 },
            CaretChange::Column { old: 0, new: 2 },
            CaretChange::Caret {
                old: origin,
                new: target
            },
            CaretChange::Line { old: 1, new: 1 },
            CaretChange::Column { old: 2, new: 2 },
            CaretChange::Caret {
                old: target,
                new: target
            },
        ]
    );
}

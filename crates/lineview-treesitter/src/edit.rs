//! Single-range edit detection between two text snapshots.
//!
//! Highlighters only see full snapshots, so the edit fed to `Tree::edit` is recovered by
//! trimming the common prefix and suffix. Any number of real edits collapses into one range
//! covering all of them, which is still a valid (if larger) edit for the parser.

use tree_sitter::{InputEdit, Point};

/// The edit that turns `old` into `new`, or `None` if they are equal.
pub(crate) fn diff_edit(old: &str, new: &str) -> Option<InputEdit> {
    if old == new {
        return None;
    }

    let start_byte = common_prefix_len(old, new);
    let suffix = common_suffix_len(&old[start_byte..], &new[start_byte..]);
    let old_end_byte = old.len() - suffix;
    let new_end_byte = new.len() - suffix;

    let start_position = advance_point(Point { row: 0, column: 0 }, &old[..start_byte]);
    Some(InputEdit {
        start_byte,
        old_end_byte,
        new_end_byte,
        start_position,
        old_end_position: advance_point(start_position, &old[start_byte..old_end_byte]),
        new_end_position: advance_point(start_position, &new[start_byte..new_end_byte]),
    })
}

/// Byte length of the longest common prefix, on a char boundary.
fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .map(|(c, _)| c.len_utf8())
        .sum()
}

/// Byte length of the longest common suffix, on a char boundary.
fn common_suffix_len(a: &str, b: &str) -> usize {
    a.chars()
        .rev()
        .zip(b.chars().rev())
        .take_while(|(x, y)| x == y)
        .map(|(c, _)| c.len_utf8())
        .sum()
}

/// Move `point` over `text` (rows by `'\n'`, columns in bytes).
fn advance_point(mut point: Point, text: &str) -> Point {
    let mut parts = text.split('\n');
    let Some(first) = parts.next() else {
        return point;
    };

    point.column = point.column.saturating_add(first.len());
    for part in parts {
        point.row = point.row.saturating_add(1);
        point.column = part.len();
    }

    point
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_texts_have_no_edit() {
        assert!(diff_edit("class A {}", "class A {}").is_none());
    }

    #[test]
    fn test_insertion_in_middle() {
        let edit = diff_edit("int x;\nint y;", "int x;\nint zy;").unwrap();
        assert_eq!(edit.start_byte, 11);
        assert_eq!(edit.old_end_byte, 11);
        assert_eq!(edit.new_end_byte, 12);
        assert_eq!(edit.start_position, Point { row: 1, column: 4 });
        assert_eq!(edit.new_end_position, Point { row: 1, column: 5 });
    }

    #[test]
    fn test_deletion_across_lines_with_multibyte_chars() {
        let edit = diff_edit("a\n中\nb", "a\nb").unwrap();
        assert_eq!(edit.start_byte, 2);
        assert_eq!(edit.old_end_byte, 6);
        assert_eq!(edit.new_end_byte, 2);
        assert_eq!(edit.start_position, Point { row: 1, column: 0 });
        assert_eq!(edit.old_end_position, Point { row: 2, column: 0 });
        assert_eq!(edit.new_end_position, Point { row: 1, column: 0 });
    }

    #[test]
    fn test_repeated_char_prefers_prefix() {
        let edit = diff_edit("aa", "aaa").unwrap();
        assert_eq!((edit.start_byte, edit.old_end_byte, edit.new_end_byte), (2, 2, 3));
    }
}

//! Line Buffer
//!
//! Owns the editable text as an ordered list of lines. Every edit is addressed by
//! `(line, column)`, where `column` counts `char`s (not bytes, not visual cells).
//!
//! The buffer is never empty: an empty document is a single blank line, which matches the
//! usual editor semantics (N newlines => N+1 lines).

use thiserror::Error;

/// Errors produced by the strict buffer accessors.
///
/// Mutations never return errors; out-of-range indices are ignored instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// A line index was outside `0..line_count`.
    #[error("line index {index} out of bounds (line count {line_count})")]
    LineOutOfBounds {
        /// Requested line index.
        index: usize,
        /// Line count at the time of the request.
        line_count: usize,
    },
}

/// Line-oriented text storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    lines: Vec<String>,
}

impl LineBuffer {
    /// Create a buffer holding one blank line.
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
        }
    }

    /// Create a buffer from text (see [`LineBuffer::set_text`]).
    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.set_text(text);
        buffer
    }

    /// Replace all content, splitting on `'\n'` and keeping trailing empty lines.
    pub fn set_text(&mut self, text: &str) {
        self.lines = crate::text::split_lines_preserve_trailing(text);
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
    }

    /// All lines joined with `'\n'`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Reset to a single blank line.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.lines.push(String::new());
    }

    /// Number of lines (always >= 1).
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Iterate over all lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.lines.iter().map(String::as_str)
    }

    /// Strict accessor: fails for an out-of-range index.
    pub fn line(&self, index: usize) -> Result<&str, BufferError> {
        self.lines
            .get(index)
            .map(String::as_str)
            .ok_or(BufferError::LineOutOfBounds {
                index,
                line_count: self.lines.len(),
            })
    }

    /// Lenient accessor: returns `""` for an out-of-range index.
    pub fn line_or_empty(&self, index: usize) -> &str {
        self.lines.get(index).map_or("", String::as_str)
    }

    /// Length of a line in chars (0 when out of range).
    pub fn line_len(&self, index: usize) -> usize {
        self.lines.get(index).map_or(0, |l| l.chars().count())
    }

    /// Length in chars of the longest line.
    pub fn longest_line_len(&self) -> usize {
        self.lines
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Index of the longest line (first one on ties).
    pub fn longest_line_index(&self) -> usize {
        let mut best = (0usize, 0usize);
        for (idx, line) in self.lines.iter().enumerate() {
            let len = line.chars().count();
            if len > best.1 {
                best = (idx, len);
            }
        }
        best.0
    }

    /// Total number of chars in [`LineBuffer::text`], newlines included.
    pub fn char_count(&self) -> usize {
        let chars: usize = self.lines.iter().map(|l| l.chars().count()).sum();
        chars + self.lines.len() - 1
    }

    /// Absolute char offset of the first char of `line` (clamped to the last line).
    pub fn line_start_offset(&self, line: usize) -> usize {
        let line = line.min(self.lines.len() - 1);
        self.lines[..line]
            .iter()
            .map(|l| l.chars().count() + 1)
            .sum()
    }

    /// Absolute char offset for `(line, column)`, clamping both.
    pub fn offset_of(&self, line: usize, column: usize) -> usize {
        let line = line.min(self.lines.len() - 1);
        self.line_start_offset(line) + column.min(self.line_len(line))
    }

    /// `(line, column)` for an absolute char offset, clamping to the end of the text.
    pub fn position_of(&self, offset: usize) -> (usize, usize) {
        let mut remaining = offset;
        for (idx, line) in self.lines.iter().enumerate() {
            let len = line.chars().count();
            if remaining <= len {
                return (idx, remaining);
            }
            remaining -= len + 1;
        }
        let last = self.lines.len() - 1;
        (last, self.line_len(last))
    }

    /// Splice `text` into `line` at `column` (clamped). Embedded newlines are stored as-is;
    /// splitting is the caller's job.
    pub fn insert_text(&mut self, line: usize, column: usize, text: &str) {
        let Some(target) = self.lines.get_mut(line) else {
            return;
        };
        let byte = byte_index_for_column(target, column);
        target.insert_str(byte, text);
    }

    /// Remove `length` chars starting at `column`, both clamped to the line.
    pub fn delete_text(&mut self, line: usize, column: usize, length: usize) {
        let Some(target) = self.lines.get_mut(line) else {
            return;
        };
        let start = byte_index_for_column(target, column);
        let end_column = column.saturating_add(length);
        let end = byte_index_for_column(target, end_column);
        if start < end {
            target.replace_range(start..end, "");
        }
    }

    /// Split `line` at `column` (clamped); the tail becomes a new line right after it.
    pub fn insert_newline(&mut self, line: usize, column: usize) {
        let Some(target) = self.lines.get_mut(line) else {
            return;
        };
        let byte = byte_index_for_column(target, column);
        let tail = target.split_off(byte);
        self.lines.insert(line + 1, tail);
    }

    /// Append line `max(a, b)` to line `min(a, b)` and remove the former.
    pub fn join_lines(&mut self, a: usize, b: usize) {
        if a == b || a >= self.lines.len() || b >= self.lines.len() {
            return;
        }
        let (low, high) = (a.min(b), a.max(b));
        let removed = self.lines.remove(high);
        self.lines[low].push_str(&removed);
    }

    /// Remove a line, keeping at least one blank line in the buffer.
    pub fn remove_line(&mut self, index: usize) {
        if index >= self.lines.len() {
            return;
        }
        self.lines.remove(index);
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
    }

    /// Insert a whole line before `index`; `index == line_count` appends.
    pub fn insert_line(&mut self, index: usize, text: &str) {
        if index > self.lines.len() {
            return;
        }
        self.lines.insert(index, text.to_string());
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Byte index of the char at `column`, clamped to the end of `line`.
pub(crate) fn byte_index_for_column(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map_or(line.len(), |(byte, _)| byte)
}

//! Offset conversion for highlighters.
//!
//! Parsers and regex engines report UTF-8 byte offsets, while [`StyleSpan`](crate::StyleSpan)s
//! use char offsets. [`TextIndex`] answers arbitrary conversions through a rope; [`CharCursor`]
//! is a cheaper forward-only converter for offsets that arrive in ascending order.

use ropey::Rope;

/// Rope-backed offset index over a frozen text snapshot.
#[derive(Debug, Clone)]
pub struct TextIndex {
    rope: Rope,
}

impl TextIndex {
    /// Build an index from text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Total chars.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Total bytes.
    pub fn byte_count(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Char offset of a byte offset (clamped to the end of the text).
    pub fn byte_to_char(&self, byte: usize) -> usize {
        self.rope.byte_to_char(byte.min(self.rope.len_bytes()))
    }

    /// Byte offset of a char offset (clamped to the end of the text).
    pub fn char_to_byte(&self, char_offset: usize) -> usize {
        self.rope.char_to_byte(char_offset.min(self.rope.len_chars()))
    }

    /// `(row, byte column)` of a byte offset, as parsers count points.
    pub fn byte_to_point(&self, byte: usize) -> (usize, usize) {
        let byte = byte.min(self.rope.len_bytes());
        let row = self.rope.byte_to_line(byte);
        (row, byte - self.rope.line_to_byte(row))
    }
}

/// Forward-only byte → char converter.
#[derive(Debug, Clone)]
pub struct CharCursor<'a> {
    text: &'a str,
    byte: usize,
    chars: usize,
}

impl<'a> CharCursor<'a> {
    /// Start at offset 0 of `text`.
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            byte: 0,
            chars: 0,
        }
    }

    /// Char offset for `byte`. Moving backwards restarts the count from the beginning.
    pub fn char_offset(&mut self, byte: usize) -> usize {
        let byte = byte.min(self.text.len());
        if byte < self.byte {
            self.byte = 0;
            self.chars = 0;
        }
        self.chars += self
            .text
            .get(self.byte..byte)
            .map_or(0, |s| s.chars().count());
        self.byte = byte;
        self.chars
    }
}

//! Caret Model
//!
//! A `(line, column)` cursor over a [`LineBuffer`]. The model does not own the buffer; each
//! operation borrows it for clamping.
//!
//! # Change notifications
//!
//! Subscribers registered with [`CaretModel::subscribe`] are called synchronously on every
//! mutation, in the order line, column, caret. Notifications are not de-duplicated: a motion
//! that ends where it started still fires all three.
//!
//! # Vertical motion
//!
//! [`CaretModel::move_up`] and [`CaretModel::move_down`] keep the stored column as-is, so it
//! may exceed the length of the new line. Consumers that need a valid column call
//! [`CaretModel::clamped`].

use crate::buffer::LineBuffer;

/// Caret position (zero-based line, zero-based char column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CaretPosition {
    /// Line index.
    pub line: usize,
    /// Column in chars.
    pub column: usize,
}

impl CaretPosition {
    /// Create a new caret position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A caret change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretChange {
    /// Line index changed (or was re-set).
    Line {
        /// Previous line.
        old: usize,
        /// New line.
        new: usize,
    },
    /// Column changed (or was re-set).
    Column {
        /// Previous column.
        old: usize,
        /// New column.
        new: usize,
    },
    /// Combined caret change.
    Caret {
        /// Previous position.
        old: CaretPosition,
        /// New position.
        new: CaretPosition,
    },
}

/// Caret change callback type.
pub type CaretCallback = Box<dyn FnMut(&CaretChange) + Send>;

/// Clamped caret over a line buffer.
pub struct CaretModel {
    position: CaretPosition,
    callbacks: Vec<CaretCallback>,
}

impl std::fmt::Debug for CaretModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaretModel")
            .field("position", &self.position)
            .field("subscribers", &self.callbacks.len())
            .finish()
    }
}

impl CaretModel {
    /// Create a caret at `(0, 0)`.
    pub fn new() -> Self {
        Self {
            position: CaretPosition::default(),
            callbacks: Vec::new(),
        }
    }

    /// Current stored position (the column may exceed the line length after vertical moves).
    pub fn position(&self) -> CaretPosition {
        self.position
    }

    /// Stored line.
    pub fn line(&self) -> usize {
        self.position.line
    }

    /// Stored column.
    pub fn column(&self) -> usize {
        self.position.column
    }

    /// The stored position re-clamped into `buffer` without mutating the model.
    pub fn clamped(&self, buffer: &LineBuffer) -> CaretPosition {
        let line = self.position.line.min(buffer.line_count() - 1);
        CaretPosition::new(line, self.position.column.min(buffer.line_len(line)))
    }

    /// Subscribe to caret change notifications.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&CaretChange) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Move to `(line, column)`, clamping both into the buffer. Accepts negative input.
    pub fn set_position(&mut self, buffer: &LineBuffer, line: i64, column: i64) {
        let max_line = buffer.line_count() - 1;
        let line = clamp_signed(line, max_line);
        let column = clamp_signed(column, buffer.line_len(line));
        self.update(CaretPosition::new(line, column));
    }

    /// Move one line up; the column is left untouched.
    pub fn move_up(&mut self, buffer: &LineBuffer) {
        let line = self
            .position
            .line
            .min(buffer.line_count() - 1)
            .saturating_sub(1);
        self.update(CaretPosition::new(line, self.position.column));
    }

    /// Move one line down; the column is left untouched.
    pub fn move_down(&mut self, buffer: &LineBuffer) {
        let line = (self.position.line + 1).min(buffer.line_count() - 1);
        self.update(CaretPosition::new(line, self.position.column));
    }

    /// Move one char left, wrapping to the end of the previous line.
    pub fn move_left(&mut self, buffer: &LineBuffer) {
        let current = self.clamped(buffer);
        let next = if current.column > 0 {
            CaretPosition::new(current.line, current.column - 1)
        } else if current.line > 0 {
            CaretPosition::new(current.line - 1, buffer.line_len(current.line - 1))
        } else {
            current
        };
        self.update(next);
    }

    /// Move one char right, wrapping to the start of the next line.
    pub fn move_right(&mut self, buffer: &LineBuffer) {
        let current = self.clamped(buffer);
        let next = if current.column < buffer.line_len(current.line) {
            CaretPosition::new(current.line, current.column + 1)
        } else if current.line + 1 < buffer.line_count() {
            CaretPosition::new(current.line + 1, 0)
        } else {
            current
        };
        self.update(next);
    }

    /// Repeat [`CaretModel::move_up`] `n` times.
    pub fn move_up_by(&mut self, buffer: &LineBuffer, n: usize) {
        for _ in 0..n {
            self.move_up(buffer);
        }
    }

    /// Repeat [`CaretModel::move_down`] `n` times.
    pub fn move_down_by(&mut self, buffer: &LineBuffer, n: usize) {
        for _ in 0..n {
            self.move_down(buffer);
        }
    }

    /// Repeat [`CaretModel::move_left`] `n` times; each step re-checks line boundaries.
    pub fn move_left_by(&mut self, buffer: &LineBuffer, n: usize) {
        for _ in 0..n {
            self.move_left(buffer);
        }
    }

    /// Repeat [`CaretModel::move_right`] `n` times; each step re-checks line boundaries.
    pub fn move_right_by(&mut self, buffer: &LineBuffer, n: usize) {
        for _ in 0..n {
            self.move_right(buffer);
        }
    }

    /// Move to column 0 of the current line.
    pub fn move_to_line_start(&mut self, buffer: &LineBuffer) {
        let line = self.clamped(buffer).line;
        self.update(CaretPosition::new(line, 0));
    }

    /// Move past the last char of the current line.
    pub fn move_to_line_end(&mut self, buffer: &LineBuffer) {
        let line = self.clamped(buffer).line;
        self.update(CaretPosition::new(line, buffer.line_len(line)));
    }

    fn update(&mut self, new: CaretPosition) {
        let old = self.position;
        self.position = new;
        self.notify(&CaretChange::Line {
            old: old.line,
            new: new.line,
        });
        self.notify(&CaretChange::Column {
            old: old.column,
            new: new.column,
        });
        self.notify(&CaretChange::Caret { old, new });
    }

    fn notify(&mut self, change: &CaretChange) {
        for callback in &mut self.callbacks {
            callback(change);
        }
    }
}

impl Default for CaretModel {
    fn default() -> Self {
        Self::new()
    }
}

fn clamp_signed(value: i64, max: usize) -> usize {
    if value <= 0 {
        0
    } else {
        usize::try_from(value).map_or(max, |v| v.min(max))
    }
}

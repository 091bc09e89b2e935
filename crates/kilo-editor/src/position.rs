//! Cursor position type.
//!
//! All coordinates are **0-indexed** and live in raw-byte space: `row` is an
//! index into the document, `col` a byte offset into that row's raw bytes.
//! `row == row_count` is a valid position (the line just past the end of the
//! document) and always has `col == 0`.
//!
//! The status bar converts to 1-indexed for the user; that conversion never
//! belongs here.

use std::fmt;

/// A cursor position: (row, column), both 0-indexed.
///
/// Positions are ordered row first, then column.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// The origin, row 0, column 0.
    pub const ZERO: Self = Self { row: 0, col: 0 };

    /// Create a new position.
    #[inline]
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({}:{})", self.row, self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row + 1, self.col + 1)
    }
}

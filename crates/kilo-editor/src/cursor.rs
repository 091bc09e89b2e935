//! Cursor movement.
//!
//! Arrow keys move a [`Position`] over a [`Document`]. The cursor may sit
//! one column past the last byte of a row, and one row past the last row of
//! the document (where its column is always 0).
//!
//! Horizontal moves wrap across row boundaries: Left at column 0 goes to
//! the end of the previous row, Right at the end of a row goes to column 0
//! of the next. Vertical moves keep the column and then clamp it to the
//! length of the row they land on; there is no sticky column.

use kilo_term::input::Key;

use crate::document::Document;
use crate::position::Position;

/// A cursor motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
}

impl Motion {
    /// The motion an arrow key asks for; `None` for any other key.
    #[must_use]
    pub const fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::ArrowLeft => Some(Self::Left),
            Key::ArrowRight => Some(Self::Right),
            Key::ArrowUp => Some(Self::Up),
            Key::ArrowDown => Some(Self::Down),
            _ => None,
        }
    }
}

/// Apply `motion` to `pos` and return the new position.
///
/// The result always satisfies `row <= doc.row_count()` and
/// `col <= doc.row_len(row)`, given the same of `pos`.
#[must_use]
pub fn apply(doc: &Document, pos: Position, motion: Motion) -> Position {
    let rows = doc.row_count();
    let Position { mut row, mut col } = pos;

    match motion {
        Motion::Left => {
            if col > 0 {
                col -= 1;
            } else if row > 0 {
                row -= 1;
                col = doc.row_len(row);
            }
        }
        Motion::Right => {
            if row < rows {
                let len = doc.row_len(row);
                if col < len {
                    col += 1;
                } else if col == len {
                    row += 1;
                    col = 0;
                }
            }
        }
        Motion::Up => row = row.saturating_sub(1),
        Motion::Down => {
            if row < rows {
                row += 1;
            }
        }
    }

    Position::new(row, col.min(doc.row_len(row)))
}

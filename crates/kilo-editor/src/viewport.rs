//! Scroll state.
//!
//! A [`Viewport`] holds the first document row and the first rendered
//! column shown on screen. [`Viewport::reconcile`] moves the window the
//! minimum distance needed to bring the cursor back into view.

use crate::document::Document;
use crate::position::Position;

/// Scroll offsets plus the cursor's rendered column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    /// First document row on screen.
    pub row_offset: usize,
    /// First rendered column on screen.
    pub col_offset: usize,
    /// Rendered column of the cursor, as of the last reconcile.
    pub render_col: usize,
}

impl Viewport {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            row_offset: 0,
            col_offset: 0,
            render_col: 0,
        }
    }

    /// Recompute `render_col` for `cursor` and scroll so that the cursor
    /// lies inside `[row_offset, row_offset + rows)` and
    /// `[col_offset, col_offset + cols)`.
    ///
    /// With a zero-sized text area there is nothing to keep visible; the
    /// rendered column is still updated but the offsets are left alone.
    pub fn reconcile(&mut self, doc: &Document, cursor: Position, rows: usize, cols: usize) {
        self.render_col = doc.render_col(cursor);

        if rows == 0 || cols == 0 {
            return;
        }

        if cursor.row < self.row_offset {
            self.row_offset = cursor.row;
        }
        if cursor.row >= self.row_offset + rows {
            self.row_offset = cursor.row + 1 - rows;
        }

        if self.render_col < self.col_offset {
            self.col_offset = self.render_col;
        }
        if self.render_col >= self.col_offset + cols {
            self.col_offset = self.render_col + 1 - cols;
        }
    }

    /// Cursor location relative to the top-left of the text area, as
    /// (column, row). Only meaningful after [`reconcile`](Self::reconcile).
    #[must_use]
    pub const fn screen_cursor(&self, cursor: Position) -> (usize, usize) {
        (
            self.render_col.saturating_sub(self.col_offset),
            cursor.row.saturating_sub(self.row_offset),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tall(n: usize) -> Document {
        let lines: Vec<String> = (0..n).map(|i| format!("line {i}")).collect();
        Document::from_lines(lines.iter().map(String::as_str))
    }

    #[test]
    fn no_scroll_when_visible() {
        let doc = tall(10);
        let mut vp = Viewport::new();
        vp.reconcile(&doc, Position::new(3, 2), 5, 80);
        assert_eq!(
            vp,
            Viewport {
                row_offset: 0,
                col_offset: 0,
                render_col: 2,
            }
        );
    }

    #[test]
    fn scrolls_down_to_keep_cursor_on_last_row() {
        let doc = tall(100);
        let mut vp = Viewport::new();
        vp.reconcile(&doc, Position::new(30, 0), 20, 80);
        assert_eq!(vp.row_offset, 11);
        assert_eq!(vp.screen_cursor(Position::new(30, 0)), (0, 19));
    }

    #[test]
    fn scrolls_up_to_cursor_row() {
        let doc = tall(100);
        let mut vp = Viewport {
            row_offset: 40,
            ..Viewport::new()
        };
        vp.reconcile(&doc, Position::new(12, 0), 20, 80);
        assert_eq!(vp.row_offset, 12);
    }

    #[test]
    fn scrolls_right_past_tab_expansion() {
        let doc = Document::from_lines(["\t\tx"]);
        let mut vp = Viewport::new();
        vp.reconcile(&doc, Position::new(0, 2), 5, 10);
        assert_eq!(vp.render_col, 16);
        assert_eq!(vp.col_offset, 7);
    }

    #[test]
    fn scrolls_left_when_cursor_returns() {
        let doc = Document::from_lines(["abcdefghij"]);
        let mut vp = Viewport {
            col_offset: 8,
            ..Viewport::new()
        };
        vp.reconcile(&doc, Position::new(0, 3), 5, 4);
        assert_eq!(vp.col_offset, 3);
    }

    #[test]
    fn cursor_past_last_row_uses_raw_col() {
        let doc = tall(2);
        let mut vp = Viewport::new();
        vp.reconcile(&doc, Position::new(2, 0), 5, 80);
        assert_eq!(vp.render_col, 0);
        assert_eq!(vp.row_offset, 0);
    }

    #[test]
    fn zero_area_leaves_offsets() {
        let doc = tall(50);
        let mut vp = Viewport {
            row_offset: 4,
            col_offset: 2,
            render_col: 0,
        };
        vp.reconcile(&doc, Position::new(40, 3), 0, 80);
        assert_eq!((vp.row_offset, vp.col_offset), (4, 2));
        assert_eq!(vp.render_col, 3);
        vp.reconcile(&doc, Position::new(40, 3), 10, 0);
        assert_eq!((vp.row_offset, vp.col_offset), (4, 2));
    }

    proptest! {
        #[test]
        fn cursor_is_visible_after_reconcile(
            lines in prop::collection::vec("[a-z\t]{0,40}", 1..60),
            row in 0usize..60,
            col in 0usize..41,
            row_offset in 0usize..80,
            col_offset in 0usize..400,
            rows in 1usize..30,
            cols in 1usize..50,
        ) {
            let doc = Document::from_lines(lines.iter().map(String::as_str));
            let row = row.min(doc.row_count());
            let cursor = Position::new(row, col.min(doc.row_len(row)));
            let mut vp = Viewport {
                row_offset,
                col_offset,
                render_col: 0,
            };
            vp.reconcile(&doc, cursor, rows, cols);

            prop_assert!(vp.row_offset <= cursor.row);
            prop_assert!(cursor.row < vp.row_offset + rows);
            prop_assert!(vp.col_offset <= vp.render_col);
            prop_assert!(vp.render_col < vp.col_offset + cols);
        }

        #[test]
        fn reconcile_is_idempotent(
            lines in prop::collection::vec("[a-z\t]{0,20}", 1..30),
            row in 0usize..30,
            rows in 1usize..10,
            cols in 1usize..20,
        ) {
            let doc = Document::from_lines(lines.iter().map(String::as_str));
            let row = row.min(doc.row_count());
            let cursor = Position::new(row, doc.row_len(row));
            let mut vp = Viewport::new();
            vp.reconcile(&doc, cursor, rows, cols);
            let once = vp;
            vp.reconcile(&doc, cursor, rows, cols);
            prop_assert_eq!(vp, once);
        }
    }
}

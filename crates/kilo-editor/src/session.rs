//! The editing session.
//!
//! Everything the editor knows lives in one [`Session`]: the document, the
//! cursor, the scroll state, and the size of the screen it is drawn on.
//! The event loop owns it (through the editor) and hands it to each
//! operation in turn.

use kilo_term::terminal::Size;
use tracing::debug;

use crate::cursor::{self, Motion};
use crate::document::Document;
use crate::position::Position;
use crate::viewport::Viewport;

/// Terminal grid size, with one row reserved for the status bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenDimensions {
    /// Total rows, status bar included.
    pub rows: usize,
    pub cols: usize,
}

impl ScreenDimensions {
    #[must_use]
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Rows available for document text.
    #[inline]
    #[must_use]
    pub const fn content_rows(&self) -> usize {
        self.rows.saturating_sub(1)
    }
}

impl From<Size> for ScreenDimensions {
    fn from(size: Size) -> Self {
        Self::new(usize::from(size.rows), usize::from(size.cols))
    }
}

/// Document, cursor, viewport and screen size.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub document: Document,
    pub cursor: Position,
    pub viewport: Viewport,
    pub screen: ScreenDimensions,
    /// Name shown in the status bar.
    pub filename: Option<String>,
}

impl Session {
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self {
            document,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_filename(mut self, name: impl Into<String>) -> Self {
        self.filename = Some(name.into());
        self
    }

    /// Record a new screen size. Returns `true` if it changed.
    pub fn set_screen(&mut self, screen: ScreenDimensions) -> bool {
        if screen == self.screen {
            return false;
        }
        debug!(rows = screen.rows, cols = screen.cols, "screen resized");
        self.screen = screen;
        true
    }

    /// Move the cursor one step.
    pub fn move_cursor(&mut self, motion: Motion) {
        self.cursor = cursor::apply(&self.document, self.cursor, motion);
    }

    /// Bring the viewport back around the cursor.
    pub fn scroll(&mut self) {
        self.viewport.reconcile(
            &self.document,
            self.cursor,
            self.screen.content_rows(),
            self.screen.cols,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_rows_reserve_status_bar() {
        assert_eq!(ScreenDimensions::new(24, 80).content_rows(), 23);
        assert_eq!(ScreenDimensions::new(1, 80).content_rows(), 0);
        assert_eq!(ScreenDimensions::new(0, 80).content_rows(), 0);
    }

    #[test]
    fn dimensions_from_size() {
        let dims = ScreenDimensions::from(Size::new(120, 40));
        assert_eq!(dims, ScreenDimensions::new(40, 120));
    }

    #[test]
    fn set_screen_reports_change() {
        let mut s = Session::default();
        assert!(s.set_screen(ScreenDimensions::new(10, 20)));
        assert!(!s.set_screen(ScreenDimensions::new(10, 20)));
        assert!(s.set_screen(ScreenDimensions::new(11, 20)));
    }

    #[test]
    fn move_then_scroll() {
        let lines: Vec<String> = (0..30).map(|i| i.to_string()).collect();
        let mut s = Session::new(Document::from_lines(lines.iter().map(String::as_str)));
        s.set_screen(ScreenDimensions::new(11, 40));
        for _ in 0..15 {
            s.move_cursor(Motion::Down);
        }
        s.scroll();
        assert_eq!(s.cursor, Position::new(15, 0));
        assert_eq!(s.viewport.row_offset, 6);
    }

    #[test]
    fn with_filename_sets_name() {
        let s = Session::default().with_filename("notes.txt");
        assert_eq!(s.filename.as_deref(), Some("notes.txt"));
    }
}

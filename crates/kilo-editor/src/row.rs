//! Rows: one line of the document, raw and rendered.
//!
//! A [`Row`] holds two byte buffers:
//!
//! - `raw`: the line exactly as loaded, without its line terminator
//! - `rendered`: what the terminal shows: `raw` with every tab expanded to
//!   spaces up to the next tab stop
//!
//! Both are built together in [`Row::new`] and never change afterwards, so
//! `rendered` is always consistent with `raw`.
//!
//! # Coordinates
//!
//! Cursor columns are byte offsets into `raw`. Screen columns are offsets
//! into `rendered`. [`raw_col_to_render_col`] maps the first to the second
//! by replaying the expansion rule. There is no inverse mapping; a
//! rendered column inside a tab's padding has no single raw column.

use crate::options::DEFAULT_TAB_STOP;

/// The tab byte.
const TAB: u8 = b'\t';

// ---------------------------------------------------------------------------
// Tab expansion
// ---------------------------------------------------------------------------

/// Expand tabs in `raw` to spaces.
///
/// Left to right: a tab emits one space, then more spaces until the
/// rendered column is a multiple of `tab_stop`; any other byte is copied
/// and advances the rendered column by one.
///
/// ```
/// use kilo_editor::row::expand_tabs;
///
/// assert_eq!(expand_tabs(b"ab\tc", 8), b"ab      c");
/// assert_eq!(expand_tabs(b"\t", 4), b"    ");
/// ```
#[must_use]
pub fn expand_tabs(raw: &[u8], tab_stop: usize) -> Vec<u8> {
    let tab_stop = tab_stop.max(1);
    let tabs = raw.iter().filter(|&&b| b == TAB).count();
    let mut rendered = Vec::with_capacity(raw.len() + tabs * (tab_stop - 1));

    for &b in raw {
        if b == TAB {
            rendered.push(b' ');
            while rendered.len() % tab_stop != 0 {
                rendered.push(b' ');
            }
        } else {
            rendered.push(b);
        }
    }

    rendered
}

/// Convert a raw byte column to a rendered column.
///
/// Replays the [`expand_tabs`] rule over `raw[..col]`. Columns past the end
/// of `raw` are clamped to its length. Monotonically nondecreasing in `col`.
#[must_use]
pub fn raw_col_to_render_col(raw: &[u8], col: usize, tab_stop: usize) -> usize {
    let tab_stop = tab_stop.max(1);
    let col = col.min(raw.len());

    raw[..col].iter().fold(0, |rx, &b| {
        if b == TAB {
            rx + (tab_stop - rx % tab_stop)
        } else {
            rx + 1
        }
    })
}

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// One line of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    raw: Vec<u8>,
    rendered: Vec<u8>,
}

impl Row {
    /// Create a row from its raw bytes, rendering tabs at `tab_stop`.
    #[must_use]
    pub fn new(raw: &[u8], tab_stop: usize) -> Self {
        Self {
            raw: raw.to_vec(),
            rendered: expand_tabs(raw, tab_stop),
        }
    }

    /// The raw bytes.
    #[inline]
    #[must_use]
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// The tab-expanded bytes.
    #[inline]
    #[must_use]
    pub fn rendered(&self) -> &[u8] {
        &self.rendered
    }

    /// Length of the raw bytes. This is the largest valid cursor column.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Whether the row has no bytes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Length of the rendered bytes, in screen columns.
    #[inline]
    #[must_use]
    pub fn render_len(&self) -> usize {
        self.rendered.len()
    }

    /// The rendered column of raw column `col`.
    #[inline]
    #[must_use]
    pub fn render_col(&self, col: usize, tab_stop: usize) -> usize {
        raw_col_to_render_col(&self.raw, col, tab_stop)
    }

    /// The part of `rendered` visible from column `from`, at most `width`
    /// columns wide. Empty when `from` is past the end.
    #[must_use]
    pub fn visible(&self, from: usize, width: usize) -> &[u8] {
        let start = from.min(self.rendered.len());
        let end = start + width.min(self.rendered.len() - start);
        &self.rendered[start..end]
    }
}

impl From<&str> for Row {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes(), DEFAULT_TAB_STOP)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Document: the ordered row store.
//!
//! A [`Document`] owns every [`Row`] of the loaded file in file order. Rows
//! are appended while loading and never modified or removed afterwards.
//!
//! Loading reads the input line by line with `read_until(b'\n')` and strips
//! every trailing `\n` and `\r` byte, so LF, CRLF and stray CR endings all
//! produce the same rows. Bytes are kept as-is; no UTF-8 validation.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::options::DEFAULT_TAB_STOP;
use crate::position::Position;
use crate::row::Row;

/// The rows of one loaded file.
#[derive(Debug, Clone)]
pub struct Document {
    rows: Vec<Row>,
    tab_stop: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    // -- Construction -------------------------------------------------------

    /// An empty document with the default tab stop.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_tab_stop(DEFAULT_TAB_STOP)
    }

    /// An empty document rendering tabs at `tab_stop` (minimum 1).
    #[must_use]
    pub const fn with_tab_stop(tab_stop: usize) -> Self {
        Self {
            rows: Vec::new(),
            tab_stop: if tab_stop == 0 { 1 } else { tab_stop },
        }
    }

    /// A document built from string lines (handy for tests and scratch
    /// content).
    #[must_use]
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut doc = Self::new();
        for line in lines {
            doc.append_row(line.as_bytes());
        }
        doc
    }

    /// Load rows from a reader, one per line.
    ///
    /// # Errors
    ///
    /// Returns any read error from `reader`.
    pub fn read_from(&mut self, mut reader: impl BufRead) -> io::Result<()> {
        let mut line = Vec::new();
        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                return Ok(());
            }
            self.append_row(strip_line_ending(&line));
        }
    }

    /// Load the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Open`] if the file can't be opened or read.
    pub fn open(path: impl AsRef<Path>, tab_stop: usize) -> Result<Self> {
        let path = path.as_ref();
        let to_err = |source| Error::Open {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(to_err)?;
        let mut doc = Self::with_tab_stop(tab_stop);
        doc.read_from(BufReader::new(file)).map_err(to_err)?;

        debug!(path = %path.display(), rows = doc.row_count(), "loaded file");
        Ok(doc)
    }

    // -- Row store ----------------------------------------------------------

    /// Append a row built from `raw`.
    pub fn append_row(&mut self, raw: &[u8]) {
        self.rows.push(Row::new(raw, self.tab_stop));
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the document has no rows.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The row at `index`, or `None` past the end.
    #[inline]
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// All rows in file order.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Raw length of row `index`; 0 past the end.
    #[inline]
    #[must_use]
    pub fn row_len(&self, index: usize) -> usize {
        self.row(index).map_or(0, Row::len)
    }

    /// Tab stop width used for rendering.
    #[inline]
    #[must_use]
    pub const fn tab_stop(&self) -> usize {
        self.tab_stop
    }

    // -- Coordinates --------------------------------------------------------

    /// The rendered column of `pos`.
    ///
    /// Past the end of the document there's no row to expand, so the raw
    /// column is returned unchanged.
    #[must_use]
    pub fn render_col(&self, pos: Position) -> usize {
        self.row(pos.row)
            .map_or(pos.col, |row| row.render_col(pos.col, self.tab_stop))
    }
}

/// Strip every trailing `\n` / `\r` byte.
fn strip_line_ending(line: &[u8]) -> &[u8] {
    let end = line
        .iter()
        .rposition(|&b| b != b'\n' && b != b'\r')
        .map_or(0, |i| i + 1);
    &line[..end]
}

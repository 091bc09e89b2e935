//! View: session to escape-sequence frame.
//!
//! [`compose_frame`] writes one complete redraw of the screen:
//!
//! ```text
//!  ESC[?25l ESC[H              hide cursor, go home
//!  row 0        ESC[K \r\n     one line per content row: document text,
//!  row 1        ESC[K \r\n     the welcome banner, or a `~` filler
//!  ...
//!  ESC[7m  name | hint | pos  ESC[m     status bar, three equal zones
//!  ESC[H ESC[r;cH ESC[?25h     place and show the cursor
//! ```
//!
//! The frame is written to any `impl Write`; the event loop hands in an
//! [`OutputBuffer`](kilo_term::output::OutputBuffer) so the whole frame
//! reaches the terminal in a single write.
//!
//! The viewport must be reconciled before composing: scroll offsets and the
//! cursor's rendered column are read from it as-is.

use std::io::{self, Write};

use kilo_term::ansi::{self, Attr};

use crate::session::Session;

/// Text of the welcome banner shown on an empty document.
pub const WELCOME: &str = concat!("KILO editor -- version ", env!("CARGO_PKG_VERSION"));

/// Where a status-bar zone places its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Content first, padding after.
    Left,
    /// Equal padding on both sides.
    Center,
    /// Padding first, content after.
    Right,
}

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// Write a full frame for `session` to `w`.
///
/// `hint` is the text of the center status-bar zone.
///
/// # Errors
///
/// Returns any error from `w`. Writing into an in-memory buffer never fails.
pub fn compose_frame(session: &Session, hint: &str, w: &mut impl Write) -> io::Result<()> {
    ansi::cursor_hide(w)?;
    ansi::cursor_home(w)?;

    draw_rows(session, w)?;
    draw_status_bar(session, hint, w)?;

    ansi::cursor_home(w)?;
    let (x, y) = session.viewport.screen_cursor(session.cursor);
    ansi::cursor_to(w, x, y)?;
    ansi::cursor_show(w)
}

/// The content rows: text, banner or `~`, each cleared to end of line.
fn draw_rows(session: &Session, w: &mut impl Write) -> io::Result<()> {
    let doc = &session.document;
    let rows = session.screen.content_rows();
    let cols = session.screen.cols;
    let vp = &session.viewport;

    for i in 0..rows {
        match doc.row(i + vp.row_offset) {
            Some(row) => w.write_all(row.visible(vp.col_offset, cols))?,
            None if doc.is_empty() && i == rows / 3 => draw_welcome(cols, w)?,
            None => w.write_all(b"~")?,
        }
        ansi::clear_line(w)?;
        w.write_all(b"\r\n")?;
    }
    Ok(())
}

/// The centered welcome banner, truncated to `cols`.
///
/// When there is room to the left, the first padding column carries the
/// `~` filler so the banner row lines up with the rows around it.
fn draw_welcome(cols: usize, w: &mut impl Write) -> io::Result<()> {
    let text = &WELCOME.as_bytes()[..WELCOME.len().min(cols)];
    let mut padding = (cols - text.len()) / 2;

    if padding > 0 {
        w.write_all(b"~")?;
        padding -= 1;
    }
    pad(padding, w)?;
    w.write_all(text)
}

// ---------------------------------------------------------------------------
// Status bar
// ---------------------------------------------------------------------------

/// The inverse-video status bar: filename, hint, cursor position.
fn draw_status_bar(session: &Session, hint: &str, w: &mut impl Write) -> io::Result<()> {
    let zone = session.screen.cols / 3;
    let name = session.filename.as_deref().unwrap_or(" ");
    let position = format!(
        "{}:{}/{}",
        session.viewport.render_col + 1,
        session.cursor.row + 1,
        session.document.row_count(),
    );

    ansi::attrs(w, Attr::INVERSE)?;
    draw_zone(name.as_bytes(), zone, Align::Left, w)?;
    draw_zone(hint.as_bytes(), zone, Align::Center, w)?;
    draw_zone(position.as_bytes(), zone, Align::Right, w)?;
    ansi::reset(w)
}

/// One status-bar zone `zone` columns wide.
///
/// Content longer than the zone is cut to fit. A centered zone puts the
/// odd column of padding, if any, on the right.
pub fn draw_zone(content: &[u8], zone: usize, align: Align, w: &mut impl Write) -> io::Result<()> {
    let content = &content[..content.len().min(zone)];
    let slack = zone - content.len();

    match align {
        Align::Left => {
            w.write_all(content)?;
            pad(slack, w)
        }
        Align::Center => {
            pad(slack / 2, w)?;
            w.write_all(content)?;
            pad(slack - slack / 2, w)
        }
        Align::Right => {
            pad(slack, w)?;
            w.write_all(content)
        }
    }
}

fn pad(n: usize, w: &mut impl Write) -> io::Result<()> {
    for _ in 0..n {
        w.write_all(b" ")?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

// SPDX-License-Identifier: MIT
//
// Terminal driver: raw mode, window size, restore on exit.
//
// Raw mode is the classic kilo recipe. Input: no break-to-SIGINT, no CR to
// NL translation, no parity check, no 8th-bit strip, no XON/XOFF in either direction. Output:
// no post-processing, so "\n" really is just a line feed and frames carry
// their own "\r\n". Local: no echo, no line buffering, no Ctrl-V, no
// signal keys, which is why Ctrl+Q and Ctrl+C arrive as plain bytes.
// Reads return after VTIME tenths of a second with zero bytes when nothing
// was typed (VMIN=0); that timeout is the event loop's tick.
//
// The saved settings are restored by `leave`, by `Drop`, and by a panic
// hook that works from a process-wide copy, so a panic mid-frame still
// leaves a usable shell behind.
//
// Every libc call lives in `sys` at the bottom of this file.

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use tracing::debug;

use crate::ansi;
use crate::reader::ByteSource;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Window size in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    #[inline]
    #[must_use]
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }
}

/// Window size from `ioctl(TIOCGWINSZ)` on stdout.
///
/// `None` when the call fails or reports zero columns; use
/// [`query_size`] then.
#[must_use]
pub fn get_size() -> Option<Size> {
    sys::window_size().map(|(cols, rows)| Size::new(cols, rows))
}

// ─── Cursor Position Report ─────────────────────────────────────────────────

/// Longest reply body we read: `ESC [ 65535 ; 65535` fits with room to spare.
const MAX_REPORT_LEN: usize = 32;

/// Measure the window by parking the cursor in the far bottom-right corner
/// (CUF/CUD stop at the margins) and asking where it ended up.
///
/// # Errors
///
/// Fails if the query can't be written, the source fails, or the reply is
/// not a well-formed `ESC [ rows ; cols R`.
pub fn query_size(w: &mut impl Write, src: &mut impl ByteSource) -> io::Result<Size> {
    ansi::cursor_forward(w, 999)?;
    ansi::cursor_down(w, 999)?;
    ansi::request_cursor_position(w)?;
    w.flush()?;

    let mut reply = Vec::with_capacity(MAX_REPORT_LEN);
    while reply.len() < MAX_REPORT_LEN - 1 {
        match src.read_byte()? {
            Some(b'R') | None => break,
            Some(b) => reply.push(b),
        }
    }

    parse_cursor_report(&reply).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            "terminal did not report its cursor position",
        )
    })
}

/// Parse `ESC [ rows ; cols` (the reply with its final `R` removed).
#[must_use]
pub fn parse_cursor_report(reply: &[u8]) -> Option<Size> {
    let body = reply.strip_prefix(b"\x1b[")?;
    let (rows, cols) = std::str::from_utf8(body).ok()?.split_once(';')?;
    Some(Size::new(cols.parse().ok()?, rows.parse().ok()?))
}

// ─── Panic Restore ──────────────────────────────────────────────────────────

/// Settings to restore if we panic while raw mode is on.
static SAVED: Mutex<Option<sys::Termios>> = Mutex::new(None);

static HOOK: Once = Once::new();

/// Written straight to fd 1 on panic: attributes off, cursor visible.
const PANIC_RESTORE: &[u8] = b"\x1b[m\x1b[?25h";

fn remember(saved: Option<sys::Termios>) {
    if let Ok(mut slot) = SAVED.lock() {
        *slot = saved;
    }
}

fn install_panic_hook() {
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            sys::write_stdout(PANIC_RESTORE);
            if let Ok(slot) = SAVED.lock() {
                if let Some(saved) = slot.as_ref() {
                    let _ = sys::set_attrs(saved);
                }
            }
            previous(info);
        }));
    });
}

// ─── Terminal ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
enum Mode {
    Cooked,
    /// Raw mode is on. Holds the settings to go back to; `None` when stdin
    /// isn't a terminal and termios was never touched.
    Raw(Option<sys::Termios>),
}

/// Raw-mode handle for the controlling terminal.
///
/// [`enter`](Self::enter) switches stdin to raw mode with the configured
/// read timeout; [`leave`](Self::leave) or dropping the handle switches it
/// back.
///
/// ```no_run
/// use kilo_term::terminal::Terminal;
///
/// let mut term = Terminal::new(1);
/// term.enter()?;
/// // read keys, write frames
/// term.leave()?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    /// VTIME, in tenths of a second.
    read_timeout_ds: u8,
    mode: Mode,
}

impl Terminal {
    /// A handle in cooked mode. Nothing is changed until [`enter`](Self::enter).
    #[must_use]
    pub const fn new(read_timeout_ds: u8) -> Self {
        Self {
            read_timeout_ds,
            mode: Mode::Cooked,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.mode, Mode::Raw(_))
    }

    #[inline]
    #[must_use]
    pub const fn read_timeout_ds(&self) -> u8 {
        self.read_timeout_ds
    }

    /// Switch to raw mode. A no-op if already raw.
    ///
    /// When stdin is not a terminal there are no settings to change; the
    /// handle still counts as active so `leave` restores the screen state.
    ///
    /// # Errors
    ///
    /// Fails if the current settings can't be read or the raw ones applied.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.is_active() {
            return Ok(());
        }
        install_panic_hook();

        let saved = if sys::stdin_is_tty() {
            let saved = sys::get_attrs()?;
            let mut raw = saved;
            sys::make_raw(&mut raw, self.read_timeout_ds);

            remember(Some(saved));
            if let Err(e) = sys::set_attrs(&raw) {
                remember(None);
                return Err(e);
            }
            Some(saved)
        } else {
            debug!("stdin is not a terminal, leaving termios alone");
            None
        };

        self.mode = Mode::Raw(saved);
        debug!(timeout_ds = self.read_timeout_ds, "raw mode on");
        Ok(())
    }

    /// Reset attributes, show the cursor and restore the saved settings.
    /// A no-op if not raw.
    ///
    /// The settings are restored even when writing the reset sequence
    /// fails; that write error is returned afterwards.
    ///
    /// # Errors
    ///
    /// Fails if the reset sequence can't be written or the saved settings
    /// can't be applied.
    pub fn leave(&mut self) -> io::Result<()> {
        let Mode::Raw(saved) = self.mode else {
            return Ok(());
        };
        self.mode = Mode::Cooked;

        let mut out = io::stdout().lock();
        let shown = ansi::reset(&mut out)
            .and_then(|()| ansi::cursor_show(&mut out))
            .and_then(|()| out.flush());
        drop(out);

        if let Some(saved) = saved {
            sys::set_attrs(&saved)?;
            remember(None);
        }
        debug!("raw mode off");
        shown
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

// ─── sys ────────────────────────────────────────────────────────────────────

#[cfg(unix)]
#[allow(unsafe_code)]
mod sys {
    use std::io;

    pub type Termios = libc::termios;

    pub fn stdin_is_tty() -> bool {
        unsafe { libc::isatty(libc::STDIN_FILENO) == 1 }
    }

    pub fn window_size() -> Option<(u16, u16)> {
        let mut ws = unsafe { std::mem::zeroed::<libc::winsize>() };
        let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };
        (rc == 0 && ws.ws_col != 0).then_some((ws.ws_col, ws.ws_row))
    }

    pub fn get_attrs() -> io::Result<Termios> {
        let mut t = unsafe { std::mem::zeroed::<Termios>() };
        if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &raw mut t) } == 0 {
            Ok(t)
        } else {
            Err(io::Error::last_os_error())
        }
    }

    pub fn set_attrs(t: &Termios) -> io::Result<()> {
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, t) } == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    pub fn make_raw(t: &mut Termios, timeout_ds: u8) {
        t.c_iflag &= !(libc::BRKINT
            | libc::ICRNL
            | libc::INPCK
            | libc::ISTRIP
            | libc::IXON
            | libc::IXOFF);
        t.c_oflag &= !libc::OPOST;
        t.c_cflag |= libc::CS8;
        t.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);
        t.c_cc[libc::VMIN] = 0;
        t.c_cc[libc::VTIME] = timeout_ds;
    }

    /// Unbuffered write to fd 1; skips the stdout lock, which a panicking
    /// thread may hold.
    pub fn write_stdout(bytes: &[u8]) {
        unsafe {
            let _ = libc::write(libc::STDOUT_FILENO, bytes.as_ptr().cast(), bytes.len());
        }
    }
}

#[cfg(not(unix))]
mod sys {
    use std::io::{self, Write};

    pub type Termios = ();

    pub const fn stdin_is_tty() -> bool {
        false
    }

    pub const fn window_size() -> Option<(u16, u16)> {
        None
    }

    pub const fn get_attrs() -> io::Result<Termios> {
        Ok(())
    }

    pub const fn set_attrs(_: &Termios) -> io::Result<()> {
        Ok(())
    }

    pub const fn make_raw(_: &mut Termios, _: u8) {}

    pub fn write_stdout(bytes: &[u8]) {
        let mut out = io::stdout();
        let _ = out.write_all(bytes);
        let _ = out.flush();
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::ScriptedSource;

    // ── Cursor position report ──────────────────────────────────────

    #[test]
    fn report_rows_then_cols() {
        assert_eq!(parse_cursor_report(b"\x1b[24;80"), Some(Size::new(80, 24)));
        assert_eq!(parse_cursor_report(b"\x1b[1;1"), Some(Size::new(1, 1)));
    }

    #[test]
    fn report_rejects_malformed_bodies() {
        for bad in [&b"24;80"[..], b"\x1b[2480", b"\x1b[a;b", b"\x1b[;80", b"\x1b[99999;1", b""] {
            assert_eq!(parse_cursor_report(bad), None, "{bad:?}");
        }
    }

    #[test]
    fn query_writes_probe_and_reads_reply() {
        let mut out = Vec::new();
        let mut src = ScriptedSource::new(b"\x1b[40;120R");
        let size = query_size(&mut out, &mut src).unwrap();
        assert_eq!(size, Size::new(120, 40));
        assert_eq!(out, b"\x1b[999C\x1b[999B\x1b[6n");
        assert_eq!(src.remaining(), 0);
    }

    #[test]
    fn query_gives_up_on_timeout() {
        let mut out = Vec::new();
        let mut src = ScriptedSource::new(b"\x1b[40").then_timeout();
        let err = query_size(&mut out, &mut src).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn query_passes_source_errors_through() {
        let mut out = Vec::new();
        let mut src = ScriptedSource::new(b"\x1b[4");
        let err = query_size(&mut out, &mut src).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn query_reads_a_bounded_reply() {
        let mut out = Vec::new();
        let mut src = ScriptedSource::new(b"\x1b[").then_bytes(&[b'7'; 64]);
        assert!(query_size(&mut out, &mut src).is_err());
        assert_eq!(src.remaining(), 66 - (MAX_REPORT_LEN - 1));
    }

    // ── Queries ─────────────────────────────────────────────────────

    #[test]
    fn size_query_is_safe_without_a_terminal() {
        if let Some(size) = get_size() {
            assert!(size.cols > 0);
        }
    }

    #[test]
    fn panic_restore_resets_and_shows_cursor() {
        assert_eq!(PANIC_RESTORE, b"\x1b[m\x1b[?25h");
    }

    // ── Raw mode ────────────────────────────────────────────────────

    #[test]
    fn starts_cooked() {
        let term = Terminal::new(3);
        assert!(!term.is_active());
        assert_eq!(term.read_timeout_ds(), 3);
    }

    #[test]
    fn enter_and_leave_toggle_mode() {
        let mut term = Terminal::new(1);
        term.enter().unwrap();
        term.enter().unwrap();
        assert!(term.is_active());
        term.leave().unwrap();
        assert!(!term.is_active());
        term.leave().unwrap();
    }

    #[test]
    fn drop_while_raw() {
        let mut term = Terminal::new(1);
        term.enter().unwrap();
        drop(term);
    }

    #[cfg(unix)]
    #[allow(unsafe_code)]
    #[test]
    fn raw_flags() {
        let mut t = unsafe { std::mem::zeroed::<sys::Termios>() };
        t.c_iflag = libc::ICRNL | libc::IXON | libc::IXOFF | libc::IGNBRK;
        t.c_oflag = libc::OPOST;
        t.c_lflag = libc::ECHO | libc::ICANON | libc::ISIG;
        sys::make_raw(&mut t, 5);

        assert_eq!(t.c_iflag, libc::IGNBRK);
        assert_eq!(t.c_oflag & libc::OPOST, 0);
        assert_eq!(t.c_cflag & libc::CS8, libc::CS8);
        assert_eq!(t.c_lflag & (libc::ECHO | libc::ICANON | libc::ISIG), 0);
        assert_eq!(t.c_cc[libc::VMIN], 0);
        assert_eq!(t.c_cc[libc::VTIME], 5);
    }
}

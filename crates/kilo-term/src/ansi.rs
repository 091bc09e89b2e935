// SPDX-License-Identifier: MIT
//
// Escape sequences the editor emits.
//
// Each function writes exactly one control sequence to an `impl Write` and
// nothing else. Ordering is the frame composer's business.
//
// Positions in the API are 0-based cells; the CUP sequence on the wire is
// 1-based, so `cursor_to(w, 0, 0)` writes `ESC[1;1H`.

use std::io::{self, Write};

use bitflags::bitflags;

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// CUP: put the cursor at column `x`, row `y`.
#[inline]
pub fn cursor_to(w: &mut impl Write, x: usize, y: usize) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", y + 1, x + 1)
}

/// CUP with no parameters: top-left corner.
#[inline]
pub fn cursor_home(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[H")
}

/// CUF: `n` columns right, stopping at the margin.
#[inline]
pub fn cursor_forward(w: &mut impl Write, n: u16) -> io::Result<()> {
    write!(w, "\x1b[{n}C")
}

/// CUD: `n` rows down, stopping at the margin.
#[inline]
pub fn cursor_down(w: &mut impl Write, n: u16) -> io::Result<()> {
    write!(w, "\x1b[{n}B")
}

/// DECTCEM off.
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// DECTCEM on.
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

/// DSR 6. The reply, `ESC [ row ; col R`, arrives on stdin.
#[inline]
pub fn request_cursor_position(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[6n")
}

// ─── Line and Attributes ─────────────────────────────────────────────────────

/// EL 0: erase from the cursor to the end of the line.
#[inline]
pub fn clear_line(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[K")
}

/// SGR with no parameters: all attributes off.
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[m")
}

bitflags! {
    /// SGR text attributes.
    ///
    /// ```
    /// use kilo_term::ansi::Attr;
    ///
    /// let status = Attr::INVERSE;
    /// assert!(!status.is_empty());
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        const INVERSE = 1 << 0;
    }
}

/// SGR parameter for each attribute, in emission order.
const SGR_CODES: [(Attr, &str); 1] = [(Attr::INVERSE, "7")];

/// Turn on `attr` with one SGR sequence, e.g. `ESC[7m`. Writes nothing
/// for an empty set.
pub fn attrs(w: &mut impl Write, attr: Attr) -> io::Result<()> {
    if attr.is_empty() {
        return Ok(());
    }
    let params: Vec<&str> = SGR_CODES
        .iter()
        .filter(|(flag, _)| attr.contains(*flag))
        .map(|&(_, code)| code)
        .collect();
    write!(w, "\x1b[{}m", params.join(";"))
}

// ─── Tests ───────────────────────────────────────────────────────────────────

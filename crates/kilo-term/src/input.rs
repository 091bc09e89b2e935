// SPDX-License-Identifier: MIT
//
// Key decoder.
//
// Turns raw stdin bytes into navigation keys. The editor only needs a small
// slice of the terminal input protocol:
//
// - single bytes (printable characters and control codes like Ctrl+Q)
// - legacy CSI arrows: ESC [ A / B / C / D
// - the delete key's CSI prefix: ESC [ 3
//
// # Design
//
// The decoder is a three-state machine (ground, after ESC, after ESC +
// one byte). Feed bytes with [`KeyDecoder::advance`]; when the byte source
// times out, call [`KeyDecoder::flush`] to resolve whatever is pending as
// a [`Key::RawEscape`]. [`KeyDecoder::read_key`] drives both from a
// [`ByteSource`] and never blocks longer than the source's own timeout on a
// partial sequence.
//
// An escape sequence always consumes exactly three bytes. `ESC [ 3 ~`
// therefore yields `Delete` followed by `Printable(b'~')`, which the
// editor ignores like any other printable byte.

use std::io;

use tracing::trace;

use crate::reader::ByteSource;

/// The escape byte that starts every control sequence.
pub const ESC: u8 = 0x1B;

/// The control code produced by holding Ctrl with `k` (`Ctrl+Q` → `0x11`).
#[inline]
#[must_use]
pub const fn ctrl_key(k: u8) -> u8 {
    k & 0x1f
}

/// The byte that quits the editor: Ctrl+Q.
pub const QUIT_BYTE: u8 = ctrl_key(b'q');

// ─── Key ────────────────────────────────────────────────────────────────────

/// A decoded key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Any single byte that didn't start an escape sequence, including
    /// control codes.
    Printable(u8),
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Delete,
    /// The quit command.
    Quit,
    /// A lone ESC, or an escape sequence the decoder doesn't recognize.
    RawEscape,
}

impl Key {
    /// Whether this key asks the editor to quit: [`Key::Quit`] itself or a
    /// raw Ctrl+Q byte.
    #[inline]
    #[must_use]
    pub const fn is_quit(self) -> bool {
        matches!(self, Self::Quit | Self::Printable(QUIT_BYTE))
    }
}

// ─── Decoder ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// No sequence in progress.
    Ground,
    /// Saw ESC, waiting for the second byte.
    Escape,
    /// Saw ESC and one more byte, waiting for the final byte.
    Intro(u8),
}

/// Escape-sequence state machine.
///
/// # Example
///
/// ```
/// use kilo_term::input::{Key, KeyDecoder};
/// use kilo_term::reader::ScriptedSource;
///
/// let mut decoder = KeyDecoder::new();
/// let mut src = ScriptedSource::new(b"\x1b[A");
/// assert_eq!(decoder.read_key(&mut src).unwrap(), Key::ArrowUp);
/// ```
#[derive(Debug, Clone)]
pub struct KeyDecoder {
    state: State,
}

impl KeyDecoder {
    /// Create a decoder in the ground state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: State::Ground,
        }
    }

    /// Whether a partial escape sequence is waiting for more bytes.
    #[inline]
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.state != State::Ground
    }

    /// Feed one byte. Returns a key once one is complete.
    pub fn advance(&mut self, byte: u8) -> Option<Key> {
        match self.state {
            State::Ground => {
                if byte == ESC {
                    self.state = State::Escape;
                    None
                } else {
                    Some(Key::Printable(byte))
                }
            }
            State::Escape => {
                self.state = State::Intro(byte);
                None
            }
            State::Intro(second) => {
                self.state = State::Ground;
                Some(if second == b'[' {
                    csi_key(byte)
                } else {
                    Key::RawEscape
                })
            }
        }
    }

    /// Resolve a pending partial sequence after a timeout.
    ///
    /// Returns [`Key::RawEscape`] if anything was pending, `None` otherwise.
    pub fn flush(&mut self) -> Option<Key> {
        if self.has_pending() {
            self.state = State::Ground;
            Some(Key::RawEscape)
        } else {
            None
        }
    }

    /// Read bytes from `src` until one key is decoded.
    ///
    /// Timeouts in the ground state are retried indefinitely; that wait is
    /// the control loop's idle tick. A timeout or read failure in the
    /// middle of an escape sequence resolves it as [`Key::RawEscape`].
    ///
    /// # Errors
    ///
    /// Returns the source's I/O error if it fails while no sequence is
    /// pending.
    pub fn read_key(&mut self, src: &mut impl ByteSource) -> io::Result<Key> {
        loop {
            match src.read_byte() {
                Ok(Some(byte)) => {
                    if let Some(key) = self.advance(byte) {
                        trace!(?key, "decoded key");
                        return Ok(key);
                    }
                }
                Ok(None) => {
                    if let Some(key) = self.flush() {
                        trace!("escape sequence timed out");
                        return Ok(key);
                    }
                }
                Err(e) => {
                    if let Some(key) = self.flush() {
                        trace!(error = %e, "read failed mid-sequence");
                        return Ok(key);
                    }
                    return Err(e);
                }
            }
        }
    }
}

impl Default for KeyDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Map the final byte of `ESC [ x` to a key.
const fn csi_key(final_byte: u8) -> Key {
    match final_byte {
        b'A' => Key::ArrowUp,
        b'B' => Key::ArrowDown,
        b'C' => Key::ArrowRight,
        b'D' => Key::ArrowLeft,
        b'3' => Key::Delete,
        _ => Key::RawEscape,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::ScriptedSource;

    fn decode(src: &mut ScriptedSource) -> Key {
        KeyDecoder::new().read_key(src).unwrap()
    }

    fn decode_all(bytes: &[u8]) -> Vec<Key> {
        let mut decoder = KeyDecoder::new();
        bytes.iter().filter_map(|&b| decoder.advance(b)).collect()
    }

    // ── Single bytes ──────────────────────────────────────────────────

    #[test]
    fn ascii_is_printable() {
        assert_eq!(decode(&mut ScriptedSource::new(b"a")), Key::Printable(b'a'));
    }

    #[test]
    fn control_codes_are_printable() {
        assert_eq!(decode(&mut ScriptedSource::new(b"\x11")), Key::Printable(0x11));
        assert_eq!(decode(&mut ScriptedSource::new(b"\r")), Key::Printable(b'\r'));
    }

    #[test]
    fn multiple_bytes_decode_one_at_a_time() {
        assert_eq!(
            decode_all(b"hi"),
            vec![Key::Printable(b'h'), Key::Printable(b'i')]
        );
    }

    // ── Quit ──────────────────────────────────────────────────────────

    #[test]
    fn ctrl_key_masks_high_bits() {
        assert_eq!(ctrl_key(b'q'), 0x11);
        assert_eq!(ctrl_key(b'a'), 0x01);
    }

    #[test]
    fn ctrl_q_is_quit() {
        assert!(Key::Printable(QUIT_BYTE).is_quit());
        assert!(Key::Quit.is_quit());
        assert!(!Key::Printable(b'q').is_quit());
        assert!(!Key::RawEscape.is_quit());
    }

    // ── Arrows and delete ─────────────────────────────────────────────

    #[test]
    fn arrow_up() {
        assert_eq!(decode(&mut ScriptedSource::new(b"\x1b[A")), Key::ArrowUp);
    }

    #[test]
    fn arrow_down() {
        assert_eq!(decode(&mut ScriptedSource::new(b"\x1b[B")), Key::ArrowDown);
    }

    #[test]
    fn arrow_right() {
        assert_eq!(decode(&mut ScriptedSource::new(b"\x1b[C")), Key::ArrowRight);
    }

    #[test]
    fn arrow_left() {
        assert_eq!(decode(&mut ScriptedSource::new(b"\x1b[D")), Key::ArrowLeft);
    }

    #[test]
    fn delete_prefix() {
        assert_eq!(decode(&mut ScriptedSource::new(b"\x1b[3")), Key::Delete);
    }

    #[test]
    fn delete_tilde_is_left_in_stream() {
        assert_eq!(
            decode_all(b"\x1b[3~"),
            vec![Key::Delete, Key::Printable(b'~')]
        );
    }

    #[test]
    fn back_to_back_sequences() {
        assert_eq!(
            decode_all(b"\x1b[A\x1b[Dx"),
            vec![Key::ArrowUp, Key::ArrowLeft, Key::Printable(b'x')]
        );
    }

    // ── Raw escape ────────────────────────────────────────────────────

    #[test]
    fn lone_escape_then_timeout() {
        let mut src = ScriptedSource::new(b"\x1b").then_timeout();
        assert_eq!(decode(&mut src), Key::RawEscape);
    }

    #[test]
    fn escape_bracket_then_timeout() {
        let mut src = ScriptedSource::new(b"\x1b[").then_timeout();
        assert_eq!(decode(&mut src), Key::RawEscape);
    }

    #[test]
    fn lone_escape_then_eof() {
        let mut src = ScriptedSource::new(b"\x1b");
        assert_eq!(decode(&mut src), Key::RawEscape);
    }

    #[test]
    fn unknown_csi_final_byte() {
        assert_eq!(decode(&mut ScriptedSource::new(b"\x1b[Z")), Key::RawEscape);
    }

    #[test]
    fn non_csi_second_byte_consumes_three_bytes() {
        let mut src = ScriptedSource::new(b"\x1bOAx");
        let mut decoder = KeyDecoder::new();
        assert_eq!(decoder.read_key(&mut src).unwrap(), Key::RawEscape);
        assert_eq!(decoder.read_key(&mut src).unwrap(), Key::Printable(b'x'));
    }

    #[test]
    fn decoder_returns_to_ground_after_timeout() {
        let mut src = ScriptedSource::new(b"\x1b").then_timeout().then_bytes(b"\x1b[B");
        let mut decoder = KeyDecoder::new();
        assert_eq!(decoder.read_key(&mut src).unwrap(), Key::RawEscape);
        assert!(!decoder.has_pending());
        assert_eq!(decoder.read_key(&mut src).unwrap(), Key::ArrowDown);
    }

    // ── Timeouts and errors ───────────────────────────────────────────

    #[test]
    fn ground_timeouts_are_retried() {
        let mut src = ScriptedSource::new(b"")
            .then_timeout()
            .then_timeout()
            .then_bytes(b"k");
        assert_eq!(decode(&mut src), Key::Printable(b'k'));
    }

    #[test]
    fn ground_error_is_propagated() {
        let mut src = ScriptedSource::new(b"").then_timeout();
        let err = KeyDecoder::new().read_key(&mut src).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn flush_in_ground_is_none() {
        let mut decoder = KeyDecoder::new();
        assert_eq!(decoder.flush(), None);
    }

    #[test]
    fn advance_tracks_pending() {
        let mut decoder = KeyDecoder::new();
        assert_eq!(decoder.advance(ESC), None);
        assert!(decoder.has_pending());
        assert_eq!(decoder.advance(b'['), None);
        assert!(decoder.has_pending());
        assert_eq!(decoder.advance(b'C'), Some(Key::ArrowRight));
        assert!(!decoder.has_pending());
    }
}

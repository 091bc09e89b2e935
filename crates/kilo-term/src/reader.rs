// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Byte sources: where the key decoder gets its input.
//
// In raw mode the terminal driver configures stdin with VMIN=0 and a small
// VTIME, so a read() returns after at most one timeout period even when no
// key was pressed. That bounded wait is what lets the decoder tell a lone
// ESC keypress apart from the first byte of an arrow-key sequence: if the
// next byte doesn't arrive within one timeout, there is no next byte.
//
// The decoder never talks to stdin directly. It reads through the
// `ByteSource` trait, so tests drive it with a `ScriptedSource` that replays
// bytes and timeouts in a fixed order.

use std::collections::VecDeque;
use std::io;

/// A blocking byte source with a bounded wait.
pub trait ByteSource {
    /// Read one byte.
    ///
    /// Returns `Ok(Some(byte))` when a byte arrived and `Ok(None)` when the
    /// source's timeout expired first.
    ///
    /// # Errors
    ///
    /// Returns an error for genuine I/O failures (not timeouts).
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_byte()
    }
}

// ─── Stdin ──────────────────────────────────────────────────────────────────

/// Reads stdin one byte at a time with `read(2)`.
///
/// The timeout comes from the termios settings installed by
/// [`Terminal::enter`](crate::terminal::Terminal::enter); this type just
/// reports a zero-byte read as a timeout.
#[derive(Debug, Default)]
pub struct StdinSource;

impl StdinSource {
    /// Create a stdin byte source.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ByteSource for StdinSource {
    #[cfg(unix)]
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = 0u8;
        let n = unsafe { libc::read(libc::STDIN_FILENO, (&raw mut byte).cast(), 1) };

        match n {
            1 => Ok(Some(byte)),
            0 => Ok(None),
            _ => {
                let err = io::Error::last_os_error();
                // EAGAIN is what some platforms report instead of a 0-byte
                // read when VMIN=0 expires; EINTR happens on SIGWINCH.
                match err.kind() {
                    io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => Ok(None),
                    _ => Err(err),
                }
            }
        }
    }

    #[cfg(not(unix))]
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        use std::io::Read;

        let mut byte = [0u8; 1];
        match io::stdin().lock().read(&mut byte) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(byte[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(None),
            Err(e) => Err(e),
        }
    }
}

// ─── Scripted ───────────────────────────────────────────────────────────────

/// One step of a [`ScriptedSource`] script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A byte arrives.
    Byte(u8),
    /// The read timeout expires with no byte.
    Timeout,
}

/// A byte source that replays a fixed script of bytes and timeouts.
///
/// Once the script is exhausted every read fails with
/// [`io::ErrorKind::UnexpectedEof`], which ends any loop reading from it.
///
/// ```
/// use kilo_term::reader::{ByteSource, ScriptedSource};
///
/// let mut src = ScriptedSource::new(b"\x1b").then_timeout();
/// assert_eq!(src.read_byte().unwrap(), Some(0x1b));
/// assert_eq!(src.read_byte().unwrap(), None);
/// assert!(src.read_byte().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    steps: VecDeque<Step>,
}

impl ScriptedSource {
    /// A script that delivers `bytes` back to back.
    #[must_use]
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            steps: bytes.iter().copied().map(Step::Byte).collect(),
        }
    }

    /// Append more bytes to the script.
    #[must_use]
    pub fn then_bytes(mut self, bytes: &[u8]) -> Self {
        self.steps.extend(bytes.iter().copied().map(Step::Byte));
        self
    }

    /// Append one timeout to the script.
    #[must_use]
    pub fn then_timeout(mut self) -> Self {
        self.steps.push_back(Step::Timeout);
        self
    }

    /// Number of steps not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

impl ByteSource for ScriptedSource {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        match self.steps.pop_front() {
            Some(Step::Byte(b)) => Ok(Some(b)),
            Some(Step::Timeout) => Ok(None),
            None => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "scripted input exhausted",
            )),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

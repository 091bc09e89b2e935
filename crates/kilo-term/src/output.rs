// SPDX-License-Identifier: MIT
//
// Frame accumulator.
//
// The composer writes a whole frame here, escape sequences and text alike,
// and the event loop hands it to the terminal with one write_all. The
// terminal never sees half a frame, so there is no flicker between the
// hide-cursor at the start and the show-cursor at the end.
//
// Appends never fail. When the allocator can't grow the buffer the bytes
// of that one append are dropped and the rest of the frame goes out as
// usual.

use std::io::{self, Write};
use std::mem;

/// Room for an 80x24 screen of text plus escapes several times over.
const INITIAL_CAPACITY: usize = 16 * 1024;

/// Append-only byte buffer holding one frame.
#[derive(Debug)]
pub struct OutputBuffer {
    frame: Vec<u8>,
}

impl OutputBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            frame: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.frame.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frame.is_empty()
    }

    /// Bytes appended so far.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.frame
    }

    /// Add `bytes` to the end of the frame, or nothing if there's no memory
    /// for them.
    pub fn append(&mut self, bytes: &[u8]) {
        if self.frame.try_reserve(bytes.len()).is_ok() {
            self.frame.extend_from_slice(bytes);
        }
    }

    /// Hand over the frame and start a new, empty one.
    #[must_use]
    pub fn take(&mut self) -> Vec<u8> {
        mem::take(&mut self.frame)
    }

    /// Write the frame to `w` in one `write_all`, flush `w`, and clear.
    /// An empty frame writes nothing.
    ///
    /// The frame is kept if the write fails.
    ///
    /// # Errors
    ///
    /// Any error from writing or flushing `w`.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if self.frame.is_empty() {
            return Ok(());
        }
        w.write_all(&self.frame)?;
        w.flush()?;
        self.frame.clear();
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Lets the `ansi` helpers and `write!` target a frame directly.
impl Write for OutputBuffer {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.append(bytes);
        Ok(bytes.len())
    }

    /// Nothing to do; the frame goes out through `flush_to`.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

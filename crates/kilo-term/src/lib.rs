// SPDX-License-Identifier: MIT
//
// kilo-term: Terminal driver for kilo-rs.
//
// Everything that touches the terminal lives here: raw mode and window
// size queries, the handful of ANSI sequences the editor emits, the frame
// output sink, the byte source that stdin reads go through, and the key
// decoder that turns those bytes into navigation keys.
//
// There is no TUI framework underneath. The editor composes whole frames
// as escape-sequence byte streams and hands each one to a single write.

pub mod ansi;
pub mod event_loop;
pub mod input;
pub mod output;
pub mod reader;
pub mod terminal;

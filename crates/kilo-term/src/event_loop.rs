// SPDX-License-Identifier: MIT
//
// Event loop: the heartbeat of the editor.
//
// One synchronous loop, one thread:
//
//   1. query the window size
//   2. let the application paint a full frame into a fresh OutputBuffer
//   3. flush that frame with a single write
//   4. block on the byte source until one key is decoded
//   5. hand the key to the application
//
// The only blocking point is step 4, and it is bounded: the terminal's
// VTIME timeout makes every read return within one tick, so a partial
// escape sequence resolves within a tick as well.
//
// Quit paints one last frame before returning. A fatal error also attempts
// one last frame (best-effort, its own errors ignored) so the screen shows
// the final state when the error message is printed.

use std::io::{self, Stdout, Write};

use tracing::{debug, warn};

use crate::input::{Key, KeyDecoder};
use crate::output::OutputBuffer;
use crate::reader::{ByteSource, StdinSource};
use crate::terminal::{self, Size, Terminal};

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the event loop to do after handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Continue running.
    Continue,
    /// Paint a final frame and exit the event loop.
    Quit,
}

/// Application interface for the event loop.
///
/// Each iteration calls [`paint`](App::paint) and then
/// [`on_key`](App::on_key) with the next decoded key.
pub trait App {
    /// Handle one decoded key.
    ///
    /// Return [`Action::Quit`] to exit the event loop.
    fn on_key(&mut self, key: Key) -> Action;

    /// Compose a full frame for a terminal of `size` into `out`.
    ///
    /// `out` is empty on entry and is flushed with a single write after
    /// this returns.
    fn paint(&mut self, size: Size, out: &mut OutputBuffer);
}

// ─── Loop Config ─────────────────────────────────────────────────────────────

/// Configuration for the event loop timing.
#[derive(Debug, Clone, Copy)]
pub struct LoopConfig {
    /// Longest a stdin read waits for a byte, in tenths of a second.
    ///
    /// This is both the idle tick and the escape-sequence timeout.
    /// Default: 1 (100 ms).
    pub read_timeout_ds: u8,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self { read_timeout_ds: 1 }
    }
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// The terminal event loop.
///
/// Owns the terminal handle, the byte source, the key decoder and the
/// output sink. Call [`run`](Self::run) to enter the loop; it returns when
/// the application signals [`Action::Quit`] or an I/O error occurs.
///
/// # Example
///
/// ```no_run
/// use kilo_term::event_loop::{Action, App, EventLoop};
/// use kilo_term::input::Key;
/// use kilo_term::output::OutputBuffer;
/// use kilo_term::terminal::Size;
///
/// struct MyApp;
///
/// impl App for MyApp {
///     fn on_key(&mut self, key: Key) -> Action {
///         if key.is_quit() { Action::Quit } else { Action::Continue }
///     }
///
///     fn paint(&mut self, _size: Size, out: &mut OutputBuffer) {
///         out.append(b"\x1b[Hhello");
///     }
/// }
///
/// EventLoop::new().run(&mut MyApp)?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct EventLoop<S = StdinSource, W = Stdout> {
    /// `None` for headless loops that never touch termios.
    terminal: Option<Terminal>,
    source: S,
    sink: W,
    decoder: KeyDecoder,
    /// Fixed size for headless loops; `None` queries the terminal.
    fixed_size: Option<Size>,
}

impl EventLoop {
    /// Create an event loop on stdin/stdout with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LoopConfig::default())
    }

    /// Create an event loop on stdin/stdout with custom timing.
    #[must_use]
    pub fn with_config(config: LoopConfig) -> Self {
        Self {
            terminal: Some(Terminal::new(config.read_timeout_ds)),
            source: StdinSource::new(),
            sink: io::stdout(),
            decoder: KeyDecoder::new(),
            fixed_size: None,
        }
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ByteSource, W: Write> EventLoop<S, W> {
    /// Create a loop that never touches the real terminal: keys come from
    /// `source`, frames go to `sink`, and the window is always `size`.
    pub const fn headless(source: S, sink: W, size: Size) -> Self {
        Self {
            terminal: None,
            source,
            sink,
            decoder: KeyDecoder::new(),
            fixed_size: Some(size),
        }
    }

    /// The output sink (for inspecting headless frames).
    #[inline]
    pub const fn sink(&self) -> &W {
        &self.sink
    }

    /// Consume the loop and return its output sink.
    pub fn into_sink(self) -> W {
        self.sink
    }

    /// Run the event loop until the application returns [`Action::Quit`].
    ///
    /// Enters raw mode first and always restores the terminal before
    /// returning, whether the loop ended normally or with an error.
    ///
    /// # Errors
    ///
    /// Returns the first I/O error from the terminal, the byte source, or
    /// the output sink.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        if let Some(term) = self.terminal.as_mut() {
            term.enter()?;
        }

        let result = self.run_inner(app);

        if let Err(ref e) = result {
            warn!(error = %e, "event loop failed, drawing final frame");
            let _ = self.render(app);
        }

        let restored = self.terminal.as_mut().map_or(Ok(()), Terminal::leave);
        result.and(restored)
    }

    /// The inner loop, separated so cleanup runs regardless of outcome.
    fn run_inner(&mut self, app: &mut impl App) -> io::Result<()> {
        loop {
            self.render(app)?;

            let key = self.decoder.read_key(&mut self.source)?;
            if app.on_key(key) == Action::Quit {
                debug!("quit requested");
                return self.render(app);
            }
        }
    }

    /// Paint one frame and write it to the sink.
    fn render(&mut self, app: &mut impl App) -> io::Result<()> {
        let size = self.window_size()?;
        let mut out = OutputBuffer::new();
        app.paint(size, &mut out);
        out.flush_to(&mut self.sink)
    }

    /// The current window size.
    fn window_size(&mut self) -> io::Result<Size> {
        if let Some(size) = self.fixed_size {
            return Ok(size);
        }
        if let Some(size) = terminal::get_size() {
            return Ok(size);
        }
        debug!("ioctl size unavailable, querying cursor position");
        terminal::query_size(&mut self.sink, &mut self.source)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::ScriptedSource;

    /// Counts keys and paints the count, quits on Ctrl+Q.
    #[derive(Default)]
    struct Counter {
        keys: Vec<Key>,
        paints: usize,
    }

    impl App for Counter {
        fn on_key(&mut self, key: Key) -> Action {
            self.keys.push(key);
            if key.is_quit() {
                Action::Quit
            } else {
                Action::Continue
            }
        }

        fn paint(&mut self, size: Size, out: &mut OutputBuffer) {
            self.paints += 1;
            out.append(format!("[{}x{} #{}]", size.cols, size.rows, self.paints).as_bytes());
        }
    }

    fn headless(bytes: &[u8]) -> EventLoop<ScriptedSource, Vec<u8>> {
        EventLoop::headless(ScriptedSource::new(bytes), Vec::new(), Size::new(80, 24))
    }

    // ── LoopConfig ──────────────────────────────────────────────

    #[test]
    fn default_config_is_100ms() {
        assert_eq!(LoopConfig::default().read_timeout_ds, 1);
    }

    // ── Headless loop ───────────────────────────────────────────

    #[test]
    fn quit_paints_final_frame() {
        let mut app = Counter::default();
        let mut ev = headless(b"\x11");
        ev.run(&mut app).unwrap();

        assert_eq!(app.keys, vec![Key::Printable(0x11)]);
        assert_eq!(app.paints, 2);
        assert_eq!(ev.into_sink(), b"[80x24 #1][80x24 #2]");
    }

    #[test]
    fn one_frame_per_key() {
        let mut app = Counter::default();
        let mut ev = headless(b"\x1b[Ab\x11");
        ev.run(&mut app).unwrap();

        assert_eq!(
            app.keys,
            vec![Key::ArrowUp, Key::Printable(b'b'), Key::Printable(0x11)]
        );
        // Initial frame, one per non-quit key, final frame.
        assert_eq!(app.paints, 4);
    }

    #[test]
    fn source_error_is_returned_after_final_frame() {
        let mut app = Counter::default();
        let mut ev = headless(b"a");
        let err = ev.run(&mut app).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        // Initial frame, frame after 'a', best-effort frame on error.
        assert_eq!(app.paints, 3);
        assert!(ev.sink().ends_with(b"[80x24 #3]"));
    }

    #[test]
    fn timeouts_do_not_reach_the_app() {
        let mut app = Counter::default();
        let src = ScriptedSource::new(b"")
            .then_timeout()
            .then_timeout()
            .then_bytes(b"\x11");
        let mut ev = EventLoop::headless(src, Vec::new(), Size::new(10, 5));
        ev.run(&mut app).unwrap();
        assert_eq!(app.keys, vec![Key::Printable(0x11)]);
    }
}

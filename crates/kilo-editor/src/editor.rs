//! Editor: the application the event loop drives.
//!
//! [`Editor`] owns the [`Session`] and the [`Options`] and implements
//! [`App`]: arrow keys move the cursor, Ctrl+Q quits, every other key is
//! ignored. Each paint picks up the current window size, reconciles the
//! viewport and composes a full frame.

use std::path::Path;

use kilo_term::event_loop::{Action, App, EventLoop, LoopConfig};
use kilo_term::input::Key;
use kilo_term::output::OutputBuffer;
use kilo_term::terminal::Size;
use tracing::{info, trace, warn};

use crate::cursor::Motion;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::options::Options;
use crate::session::{ScreenDimensions, Session};
use crate::view;

/// The editor: one session plus its options.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    session: Session,
    options: Options,
}

impl Editor {
    /// An editor on an empty document.
    #[must_use]
    pub fn new(options: Options) -> Self {
        let doc = Document::with_tab_stop(options.tab_stop);
        Self {
            session: Session::new(doc),
            options,
        }
    }

    /// An editor on the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Open`] if the file can't be read.
    pub fn open(path: impl AsRef<Path>, options: Options) -> Result<Self> {
        let path = path.as_ref();
        let doc = Document::open(path, options.tab_stop)?;
        info!(path = %path.display(), rows = doc.row_count(), "opened");
        Ok(Self {
            session: Session::new(doc).with_filename(path.display().to_string()),
            options,
        })
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Run the editor on the controlling terminal until the user quits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Terminal`] if raw mode, the window size query, a
    /// key read or a frame write fails. The terminal is restored either
    /// way.
    pub fn run(&mut self) -> Result<()> {
        let config = LoopConfig {
            read_timeout_ds: self.options.read_timeout_ds,
        };
        EventLoop::with_config(config)
            .run(self)
            .map_err(Error::Terminal)
    }
}

impl App for Editor {
    fn on_key(&mut self, key: Key) -> Action {
        if key.is_quit() {
            info!("quit");
            return Action::Quit;
        }
        match Motion::from_key(key) {
            Some(motion) => self.session.move_cursor(motion),
            None => trace!(?key, "ignored key"),
        }
        Action::Continue
    }

    fn paint(&mut self, size: Size, out: &mut OutputBuffer) {
        self.session.set_screen(ScreenDimensions::from(size));
        self.session.scroll();
        if let Err(e) = view::compose_frame(&self.session, &self.options.status_hint, out) {
            warn!(error = %e, "frame composition failed");
        }
    }
}

//! Error types for the editor core.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Editor error
#[derive(Debug, Error)]
pub enum Error {
    /// The file named on the command line could not be read.
    #[error("{}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A terminal operation failed (raw mode, window size, reading keys,
    /// writing frames).
    #[error("terminal: {0}")]
    Terminal(#[source] io::Error),
}

/// Editor result
pub type Result<T> = std::result::Result<T, Error>;

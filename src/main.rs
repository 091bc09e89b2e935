// SPDX-License-Identifier: MIT
//
// kilo: a small terminal text viewer in the kilo tradition.
//
// This is the main binary that wires the crates together:
//
//   kilo-term   → raw mode, window size, key decoding, event loop
//   kilo-editor → rows, tab rendering, cursor, viewport, frame composition
//
// Usage: `kilo [filename]`. Without a filename the editor opens an empty
// document and shows the welcome banner.
//
// Logging goes to the file named by KILO_LOG (stderr belongs to the
// terminal while the editor runs), filtered by KILO_LOG_LEVEL.
//
// Exit status: 0 on Ctrl+Q, 1 on a fatal error. The error is printed after
// the terminal has been restored. The file is opened before raw mode, so a
// file that can't be read is reported on a cooked terminal and no frame is
// drawn.

use std::env;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;

use kilo_editor::editor::Editor;
use kilo_editor::options::{LogOptions, Options};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// The file to open: the first argument after the program name.
fn file_arg(args: impl IntoIterator<Item = String>) -> Option<PathBuf> {
    args.into_iter().nth(1).map(PathBuf::from)
}

/// Install a file-backed subscriber if a log file is configured.
///
/// Logging is best-effort: a log file that can't be opened is reported on
/// stderr before the terminal switches to raw mode and otherwise ignored.
fn init_logging(log: &LogOptions) {
    let Some(path) = log.file.as_deref() else {
        return;
    };

    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("kilo: log file {}: {e}", path.display());
            return;
        }
    };

    let filter = EnvFilter::try_new(&log.filter).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn editor_for(path: Option<&Path>, options: Options) -> kilo_editor::error::Result<Editor> {
    match path {
        Some(path) => Editor::open(path, options),
        None => Ok(Editor::new(options)),
    }
}

fn main() {
    let options = Options::from_env();
    init_logging(&options.log);

    let path = file_arg(env::args());
    info!(version = env!("CARGO_PKG_VERSION"), file = ?path, "starting");

    let mut editor = editor_for(path.as_deref(), options).unwrap_or_else(|e| {
        error!(error = %e, "failed to open");
        eprintln!("kilo: {e}");
        process::exit(1);
    });

    if let Err(e) = editor.run() {
        error!(error = %e, "exiting on error");
        eprintln!("kilo: {e}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

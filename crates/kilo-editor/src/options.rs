//! Editor options.
//!
//! Every option has a fixed default. A few can be overridden from the
//! environment when the editor starts:
//!
//! | Variable         | Field            | Default                |
//! |------------------|------------------|------------------------|
//! | `KILO_TABSTOP`   | `tab_stop`       | 8                      |
//! | `KILO_LOG`       | `log.file`       | unset (no logging)     |
//! | `KILO_LOG_LEVEL` | `log.filter`     | `info`                 |
//!
//! Logging goes to a file because stdout and stderr belong to the terminal
//! while the editor is running.

use std::path::PathBuf;

/// Default tab stop width in columns.
pub const DEFAULT_TAB_STOP: usize = 8;

/// Largest accepted `KILO_TABSTOP`.
pub const MAX_TAB_STOP: usize = 32;

/// The hint shown in the middle of the status bar.
pub const DEFAULT_STATUS_HINT: &str = "Press Ctrl+Q to exit";

/// Where and how much to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    /// Log file path. `None` disables logging.
    pub file: Option<PathBuf>,
    /// `tracing-subscriber` filter directive, e.g. `debug` or `kilo_term=trace`.
    pub filter: String,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            file: None,
            filter: "info".to_string(),
        }
    }
}

/// Editor configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Tab stop width (columns per tab stop, at least 1).
    pub tab_stop: usize,
    /// Text centered in the status bar.
    pub status_hint: String,
    /// Longest a key read waits, in tenths of a second.
    pub read_timeout_ds: u8,
    /// Logging destination and filter.
    pub log: LogOptions,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tab_stop: DEFAULT_TAB_STOP,
            status_hint: DEFAULT_STATUS_HINT.to_string(),
            read_timeout_ds: 1,
            log: LogOptions::default(),
        }
    }
}

impl Options {
    /// Defaults overridden by the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    ///
    /// Unparseable or out-of-range values are ignored.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut opts = Self::default();

        if let Some(ts) = lookup("KILO_TABSTOP")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|ts| (1..=MAX_TAB_STOP).contains(ts))
        {
            opts.tab_stop = ts;
        }

        opts.log.file = lookup("KILO_LOG")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        if let Some(filter) = lookup("KILO_LOG_LEVEL").filter(|f| !f.trim().is_empty()) {
            opts.log.filter = filter;
        }

        opts
    }
}

//! # kilo-editor: Editor core for kilo-rs
//!
//! This crate contains everything between the decoded key and the composed
//! frame:
//!
//! - **[`row`]**: `Row` (raw bytes + tab-expanded rendering) and the
//!   raw-column → rendered-column mapping
//! - **[`document`]**: `Document`, the ordered row store, and file loading
//! - **[`position`]**: `Position` (row, col) in raw-byte space, 0-indexed
//! - **[`cursor`]**: arrow-key movement over a document
//! - **[`viewport`]**: scroll offsets that keep the cursor on screen
//! - **[`session`]**: the session value threaded through every operation
//! - **[`view`]**: full-frame composition: rows, banner, status bar
//! - **[`editor`]**: the `App` the event loop drives
//! - **[`options`]** / **[`error`]**: configuration and error types

pub mod cursor;
pub mod document;
pub mod editor;
pub mod error;
pub mod options;
pub mod position;
pub mod row;
pub mod session;
pub mod view;
pub mod viewport;

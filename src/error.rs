// src/error.rs
//! Crate-wide error type.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures the library can surface to the command boundary.
///
/// Missing indexes, unknown ids, and rejected inserts are not errors; those
/// are ordinary `Option`/`bool` outcomes reported by the handlers.
#[derive(Debug, Error)]
pub enum Error {
    /// The OS clipboard rejected a read or write.
    #[error("clipboard error: {0}")]
    Clipboard(#[from] arboard::Error),

    /// The history file could not be read or written.
    #[error("history state I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The history file exists but does not parse.
    #[error("history state is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    /// No per-user configuration directory could be resolved.
    #[error("could not resolve a configuration directory for this platform")]
    StateDir,
}

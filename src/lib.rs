//! clipkeep library
//!
//! A bounded, persistent clipboard history plus a polling watcher that
//! feeds it. The binary in `src/main.rs` is a thin clap layer over the
//! handlers in [`commands`]; everything stateful lives in [`core`].

pub mod clipboard;
pub mod commands;
pub mod core;
pub mod error;

pub use crate::core::store::{ClipRecord, HistoryStore};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::clipboard::{ClipboardProvider, SystemClipboard};
    pub use crate::core::store::{ClipRecord, HistoryStore};
    pub use crate::core::watcher::{ClipboardWatcher, WatchListener};
    pub use crate::error::{Error, Result};
}

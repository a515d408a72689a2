// src/core/watcher.rs
//! Clipboard polling loop
//!
//! Bridges the external, non-deterministic clipboard into the history
//! store by sampling it on a fixed period. Polls are strictly sequential:
//! the next tick is only scheduled once the previous read has resolved, so
//! no locking is needed around the loop's only state, the last observed
//! content.

use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, trace};

use crate::clipboard::ClipboardProvider;
use crate::core::store::{ClipRecord, HistoryStore};
use crate::error::Result;

/// How often the watch loop samples the clipboard.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Callbacks fired by the watch loop.
///
/// Implemented by whatever wants to observe captures; the CLI registers a
/// listener that prints each one.
pub trait WatchListener {
    fn on_watch_started(&mut self) {}
    fn on_clip_captured(&mut self, clip: &ClipRecord);
    fn on_watch_stopped(&mut self) {}
}

/// Polling watcher over an external clipboard.
pub struct ClipboardWatcher<C: ClipboardProvider> {
    clipboard: C,
    store: HistoryStore,
    last_content: String,
    poll_interval: Duration,
    listeners: Vec<Box<dyn WatchListener>>,
}

impl<C: ClipboardProvider> ClipboardWatcher<C> {
    pub fn new(store: HistoryStore, clipboard: C) -> Self {
        Self {
            clipboard,
            store,
            last_content: String::new(),
            poll_interval: POLL_INTERVAL,
            listeners: Vec::new(),
        }
    }

    /// Override the poll period. Tests use a short one.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn add_listener(&mut self, listener: impl WatchListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Establish the "last observed content" baseline.
    ///
    /// A failed read here is tolerated: the baseline stays empty and the
    /// first successful poll captures whatever is on the clipboard.
    pub fn establish_baseline(&mut self) {
        match self.clipboard.read() {
            Ok(content) => self.last_content = content,
            Err(err) => debug!("baseline clipboard read failed: {err}"),
        }
    }

    /// One poll tick: read the clipboard and append on change.
    ///
    /// Transient read failures are expected (the clipboard may be briefly
    /// held by another process) and skip the tick without surfacing
    /// anything. Store persistence failures do propagate.
    pub fn poll_once(&mut self) -> Result<Option<ClipRecord>> {
        let content = match self.clipboard.read() {
            Ok(content) => content,
            Err(err) => {
                trace!("clipboard read failed, skipping tick: {err}");
                return Ok(None);
            }
        };
        if content == self.last_content || content.trim().is_empty() {
            return Ok(None);
        }
        self.last_content.clone_from(&content);

        // The store may still decline the content (e.g. it already sits at
        // the head from an earlier `add`); nobody is notified then.
        let Some(clip) = self.store.insert(&content)? else {
            return Ok(None);
        };
        for listener in &mut self.listeners {
            listener.on_clip_captured(&clip);
        }
        Ok(Some(clip))
    }

    /// Poll until Ctrl-C.
    ///
    /// Cancellation stops scheduling further ticks; an in-flight read is
    /// never force-aborted. Returns normally so the process exits with a
    /// success status.
    pub async fn run(&mut self) -> Result<()> {
        self.establish_baseline();
        for listener in &mut self.listeners {
            listener.on_watch_started();
        }

        let mut ticks = time::interval(self.poll_interval);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticks.tick() => {
                    self.poll_once()?;
                }
                _ = tokio::signal::ctrl_c() => {
                    debug!("interrupt received, stopping watch loop");
                    break;
                }
            }
        }

        for listener in &mut self.listeners {
            listener.on_watch_stopped();
        }
        Ok(())
    }
}

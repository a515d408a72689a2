// src/core/store.rs
//! Bounded, persistent clipboard history
//!
//! This module provides:
//! - The persisted history state (clips, id counter, capacity bound)
//! - Insertion with duplicate suppression and capacity eviction
//! - Lookup by position or id, substring search, deletion
//!
//! The store is an explicit handle: loaded once at startup and passed to
//! whichever component needs it. Every mutating operation flushes the full
//! state back to disk before returning, so there is no separate save step
//! and a crash loses at most the operation in flight.

use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::Utc;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Longest preview the list view will render, in visible characters.
const PREVIEW_MAX_CHARS: usize = 80;
/// Characters kept when a preview is truncated, before the "..." suffix.
const PREVIEW_KEPT_CHARS: usize = 77;
/// Capacity bound for a fresh store.
const DEFAULT_MAX_ITEMS: usize = 100;

/// One captured clipboard snapshot plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipRecord {
    pub id: u64,
    pub content: String,
    /// Capture time, milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Truncated, whitespace-substituted display form, derived once at
    /// insert time and stored.
    pub preview: String,
}

/// The persisted aggregate: newest-first clips plus counters.
#[derive(Debug, Serialize, Deserialize)]
struct HistoryState {
    clips: Vec<ClipRecord>,
    next_id: u64,
    max_items: usize,
}

impl Default for HistoryState {
    fn default() -> Self {
        Self {
            clips: Vec::new(),
            next_id: 1,
            max_items: DEFAULT_MAX_ITEMS,
        }
    }
}

/// Handle over the persisted clipboard history.
///
/// Clips are kept newest-first; index 0 is the most recent capture and is
/// the addressing scheme used by position-based lookups.
pub struct HistoryStore {
    path: PathBuf,
    state: HistoryState,
}

impl HistoryStore {
    /// Open the store backed by the default per-user state file.
    pub fn open_default() -> Result<Self> {
        let dirs = ProjectDirs::from("com", "clipkeep", "clipkeep").ok_or(Error::StateDir)?;
        Self::open(dirs.config_dir().join("history.json"))
    }

    /// Open the store backed by an explicit state file.
    ///
    /// A missing file is a fresh store with default state. A present but
    /// unreadable or malformed file is an error, not silent data loss.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => HistoryState::default(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, state })
    }

    /// All stored clips, newest-first.
    pub fn clips(&self) -> &[ClipRecord] {
        &self.state.clips
    }

    pub fn len(&self) -> usize {
        self.state.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.clips.is_empty()
    }

    /// Capture new content at the head of the history.
    ///
    /// Returns `None` without touching the store when the content is empty
    /// or whitespace-only, or when it exactly matches the current head
    /// (repeated polls observing the same clipboard). Equal content further
    /// down the history is a legitimate re-capture and is kept.
    pub fn insert(&mut self, content: &str) -> Result<Option<ClipRecord>> {
        if content.trim().is_empty() {
            return Ok(None);
        }
        if self
            .state
            .clips
            .first()
            .is_some_and(|head| head.content == content)
        {
            return Ok(None);
        }

        let record = ClipRecord {
            id: self.state.next_id,
            content: content.to_string(),
            timestamp: Utc::now().timestamp_millis(),
            preview: make_preview(content),
        };
        self.state.clips.insert(0, record.clone());
        self.state.next_id += 1;
        if self.state.clips.len() > self.state.max_items {
            self.state.clips.pop();
        }
        self.persist()?;
        debug!(id = record.id, "captured clip");
        Ok(Some(record))
    }

    /// Clip at a list position, 0 being the most recent.
    pub fn get_by_index(&self, index: usize) -> Option<&ClipRecord> {
        self.state.clips.get(index)
    }

    pub fn get_by_id(&self, id: u64) -> Option<&ClipRecord> {
        self.state.clips.iter().find(|clip| clip.id == id)
    }

    /// Remove the clip with the given id. Returns whether one was removed.
    pub fn delete_by_id(&mut self, id: u64) -> Result<bool> {
        let Some(position) = self.state.clips.iter().position(|clip| clip.id == id) else {
            return Ok(false);
        };
        self.state.clips.remove(position);
        self.persist()?;
        Ok(true)
    }

    /// Drop every clip. The id counter is deliberately left alone so ids
    /// are never reused across a clear.
    pub fn clear(&mut self) -> Result<()> {
        self.state.clips.clear();
        self.persist()
    }

    /// Case-insensitive substring search over clip content, newest-first.
    pub fn search(&self, query: &str) -> Vec<&ClipRecord> {
        let needle = query.to_lowercase();
        self.state
            .clips
            .iter()
            .filter(|clip| clip.content.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn max_items(&self) -> usize {
        self.state.max_items
    }

    /// Update the capacity bound. Lowering it below the current size drops
    /// the oldest clips immediately.
    pub fn set_max_items(&mut self, max: usize) -> Result<()> {
        self.state.max_items = max;
        self.state.clips.truncate(max);
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(&self.state)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

/// Derive the stored display preview: truncate overlong content, then make
/// whitespace visible so a clip always fits on one list line.
fn make_preview(content: &str) -> String {
    let preview: String = if content.chars().count() > PREVIEW_MAX_CHARS {
        let kept: String = content.chars().take(PREVIEW_KEPT_CHARS).collect();
        format!("{kept}...")
    } else {
        content.to_string()
    };
    preview.replace('\n', "↵").replace('\t', "→")
}

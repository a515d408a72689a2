// src/commands.rs
//! One handler per CLI subcommand.
//!
//! Handlers report user-facing failures (missing index, non-numeric input,
//! empty clipboard, a clipboard that cannot be read or written) as printed
//! messages and still return `Ok(())`, so the process exits zero for those.
//! Only unexpected store failures propagate.

use chrono::Utc;
use colored::Colorize;

use crate::clipboard::ClipboardProvider;
use crate::core::store::{ClipRecord, HistoryStore};
use crate::error::Result;

/// Rows shown by `list` when neither `-n` nor `-a` is given.
pub const DEFAULT_LIST_COUNT: usize = 10;

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 3_600_000;
const DAY_MS: i64 = 86_400_000;

pub struct ListOptions {
    pub count: usize,
    pub all: bool,
}

pub fn print_banner() {
    println!();
    println!("   {}", "📋 clipkeep".cyan().bold());
    println!("   {}", "Clipboard history manager".dimmed());
    println!();
}

/// Humanize a capture timestamp relative to now.
pub fn format_age(timestamp_ms: i64) -> String {
    format_age_at(timestamp_ms, Utc::now().timestamp_millis())
}

fn format_age_at(timestamp_ms: i64, now_ms: i64) -> String {
    let elapsed = now_ms.saturating_sub(timestamp_ms);
    if elapsed < MINUTE_MS {
        "just now".to_string()
    } else if elapsed < HOUR_MS {
        format!("{}m ago", elapsed / MINUTE_MS)
    } else if elapsed < DAY_MS {
        format!("{}h ago", elapsed / HOUR_MS)
    } else {
        format!("{}d ago", elapsed / DAY_MS)
    }
}

fn print_clip(clip: &ClipRecord, index: usize) {
    println!(
        "{}{}{}",
        format!("[{index}]").cyan(),
        format!(" ({}) ", format_age(clip.timestamp)).dimmed(),
        clip.preview
    );
}

/// Parse a user-supplied list position, reporting (not failing on) bad
/// input.
fn parse_index(raw: &str) -> Option<usize> {
    match raw.parse() {
        Ok(index) => Some(index),
        Err(_) => {
            println!("{} Invalid index: {raw}", "✗".red());
            None
        }
    }
}

pub fn list(store: &HistoryStore, options: &ListOptions) {
    let clips = store.clips();

    if clips.is_empty() {
        print_banner();
        println!("   {}", "No clips yet. Copy something!".dimmed());
        println!(
            "   {}\n",
            "Run `clipkeep add` to capture your clipboard.".dimmed()
        );
        return;
    }

    let limit = if options.all {
        clips.len()
    } else {
        options.count.min(clips.len())
    };

    print_banner();
    println!(
        "   {}\n",
        format!("Showing {limit} of {} clips", clips.len()).dimmed()
    );
    for (index, clip) in clips.iter().take(limit).enumerate() {
        print_clip(clip, index);
    }
    println!();
    println!(
        "   {}\n",
        "Use `clipkeep copy <index>` to copy an item.".dimmed()
    );
}

pub fn add(store: &mut HistoryStore, clipboard: &mut impl ClipboardProvider) -> Result<()> {
    let content = match clipboard.read() {
        Ok(content) => content,
        Err(_) => {
            println!("{} Failed to read clipboard", "✗".red());
            return Ok(());
        }
    };

    if let Some(clip) = store.insert(&content)? {
        println!("{} Saved: {}", "✓".green(), clip.preview.dimmed());
    } else if content.trim().is_empty() {
        println!("{} Clipboard is empty", "⚠".yellow());
    } else {
        println!("{}", "Already have this clip".dimmed());
    }
    Ok(())
}

pub fn copy(
    store: &HistoryStore,
    clipboard: &mut impl ClipboardProvider,
    raw_index: &str,
) -> Result<()> {
    let Some(index) = parse_index(raw_index) else {
        return Ok(());
    };
    let Some(clip) = store.get_by_index(index) else {
        println!("{} No clip at index {index}", "✗".red());
        return Ok(());
    };

    match clipboard.write(&clip.content) {
        Ok(()) => println!("{} Copied: {}", "✓".green(), clip.preview.dimmed()),
        Err(_) => println!("{} Failed to write to clipboard", "✗".red()),
    }
    Ok(())
}

pub fn show(store: &HistoryStore, raw_index: &str) {
    let Some(index) = parse_index(raw_index) else {
        return;
    };
    let Some(clip) = store.get_by_index(index) else {
        println!("{} No clip at index {index}", "✗".red());
        return;
    };

    println!(
        "{}",
        format!("\n--- Clip {index} ({}) ---\n", format_age(clip.timestamp)).dimmed()
    );
    println!("{}", clip.content);
    println!("{}", "\n--- End ---\n".dimmed());
}

pub fn search(store: &HistoryStore, query: &str) {
    let matches = store.search(query);

    if matches.is_empty() {
        println!("{}", format!("No clips matching \"{query}\"").dimmed());
        return;
    }

    print_banner();
    println!(
        "   {}\n",
        format!("Found {} clip(s) matching \"{query}\"", matches.len()).dimmed()
    );
    // Each match is labeled with its current list position so the printed
    // index works directly with `copy`/`show`/`delete`.
    for clip in &matches {
        if let Some(index) = store.clips().iter().position(|c| c.id == clip.id) {
            print_clip(clip, index);
        }
    }
    println!();
}

pub fn delete(store: &mut HistoryStore, raw_index: &str) -> Result<()> {
    let Some(index) = parse_index(raw_index) else {
        return Ok(());
    };
    let Some(clip) = store.get_by_index(index) else {
        println!("{} No clip at index {index}", "✗".red());
        return Ok(());
    };

    let (id, preview) = (clip.id, clip.preview.clone());
    store.delete_by_id(id)?;
    println!("{} Deleted: {}", "✓".green(), preview.dimmed());
    Ok(())
}

pub fn clear(store: &mut HistoryStore, force: bool) -> Result<()> {
    if store.is_empty() {
        println!("{}", "History is already empty".dimmed());
        return Ok(());
    }

    if !force {
        println!("{} This will delete {} clip(s).", "⚠".yellow(), store.len());
        println!("  {}", "Run with --force to confirm.".dimmed());
        return Ok(());
    }

    let count = store.len();
    store.clear()?;
    println!("{} Cleared {count} clip(s)", "✓".green());
    Ok(())
}

pub fn config(store: &mut HistoryStore, max: Option<&str>) -> Result<()> {
    let Some(raw) = max else {
        print_banner();
        println!("   {}\n", "Configuration:".dimmed());
        println!("   Max history size: {}", store.max_items());
        println!("   Current clips: {}\n", store.len());
        return Ok(());
    };

    match raw.parse::<usize>() {
        Ok(max) if max >= 1 => {
            store.set_max_items(max)?;
            println!("{} Max history size: {max}", "✓".green());
        }
        _ => println!("{} Max must be a positive number", "✗".red()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::fake::FakeClipboard;
    use tempfile::TempDir;

    fn temp_store(dir: &TempDir) -> HistoryStore {
        HistoryStore::open(dir.path().join("history.json")).unwrap()
    }

    #[test]
    fn age_formatting_buckets() {
        let now = 10 * DAY_MS;
        assert_eq!(format_age_at(now, now), "just now");
        assert_eq!(format_age_at(now - 59_000, now), "just now");
        assert_eq!(format_age_at(now - 5 * MINUTE_MS, now), "5m ago");
        assert_eq!(format_age_at(now - 3 * HOUR_MS, now), "3h ago");
        assert_eq!(format_age_at(now - 2 * DAY_MS, now), "2d ago");
        // A clock that went backwards still reads as fresh.
        assert_eq!(format_age_at(now + MINUTE_MS, now), "just now");
    }

    #[test]
    fn add_stores_clipboard_content() {
        let dir = TempDir::new().unwrap();
        let mut store = temp_store(&dir);
        let mut clipboard = FakeClipboard::with_reads([FakeClipboard::read_ok("captured")]);

        add(&mut store, &mut clipboard).unwrap();
        assert_eq!(store.clips()[0].content, "captured");
    }

    #[test]
    fn add_survives_a_failing_clipboard() {
        // Exit-code pinning: a clipboard failure is a message, not an Err.
        let dir = TempDir::new().unwrap();
        let mut store = temp_store(&dir);
        let mut clipboard = FakeClipboard::with_reads([FakeClipboard::read_err()]);

        assert!(add(&mut store, &mut clipboard).is_ok());
        assert!(store.is_empty());
    }

    #[test]
    fn add_leaves_store_untouched_on_duplicate_and_empty() {
        let dir = TempDir::new().unwrap();
        let mut store = temp_store(&dir);
        store.insert("existing").unwrap();

        let mut clipboard = FakeClipboard::with_reads([
            FakeClipboard::read_ok("existing"),
            FakeClipboard::read_ok("   "),
        ]);
        add(&mut store, &mut clipboard).unwrap();
        add(&mut store, &mut clipboard).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn copy_writes_the_full_content() {
        let dir = TempDir::new().unwrap();
        let mut store = temp_store(&dir);
        let long = "x".repeat(200);
        store.insert(&long).unwrap();

        let mut clipboard = FakeClipboard::default();
        copy(&store, &mut clipboard, "0").unwrap();
        // The untruncated payload goes back out, not the preview.
        assert_eq!(clipboard.written, [long]);
    }

    #[test]
    fn copy_with_bad_index_exits_cleanly() {
        // Exit-code pinning: NotFound and InvalidInput never become Err.
        let dir = TempDir::new().unwrap();
        let store = temp_store(&dir);
        let mut clipboard = FakeClipboard::default();

        assert!(copy(&store, &mut clipboard, "7").is_ok());
        assert!(copy(&store, &mut clipboard, "seven").is_ok());
        assert!(clipboard.written.is_empty());
    }

    #[test]
    fn copy_survives_a_failing_clipboard_write() {
        let dir = TempDir::new().unwrap();
        let mut store = temp_store(&dir);
        store.insert("content").unwrap();

        let mut clipboard = FakeClipboard {
            fail_writes: true,
            ..FakeClipboard::default()
        };
        assert!(copy(&store, &mut clipboard, "0").is_ok());
    }

    #[test]
    fn delete_removes_by_position() {
        let dir = TempDir::new().unwrap();
        let mut store = temp_store(&dir);
        store.insert("older").unwrap();
        store.insert("newer").unwrap();

        delete(&mut store, "1").unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.clips()[0].content, "newer");

        // Out of range and non-numeric both leave the store alone.
        delete(&mut store, "5").unwrap();
        delete(&mut store, "x").unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn clear_refuses_without_force() {
        let dir = TempDir::new().unwrap();
        let mut store = temp_store(&dir);
        store.insert("precious").unwrap();

        clear(&mut store, false).unwrap();
        assert_eq!(store.len(), 1);

        clear(&mut store, true).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn config_rejects_non_positive_max() {
        let dir = TempDir::new().unwrap();
        let mut store = temp_store(&dir);

        for raw in ["0", "-3", "lots"] {
            assert!(config(&mut store, Some(raw)).is_ok());
            assert_eq!(store.max_items(), 100);
        }

        config(&mut store, Some("25")).unwrap();
        assert_eq!(store.max_items(), 25);
    }
}

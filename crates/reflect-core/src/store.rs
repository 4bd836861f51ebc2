//! Entry store
//!
//! The `EntryStore` owns one JSON file holding the whole entry collection as
//! a top-level array. Every operation reads the file fresh and every change
//! rewrites it in full; nothing is cached between calls.
//!
//! ## Usage
//!
//! ```ignore
//! let store = config.store();
//!
//! let mut entries = store.load();
//! let entry = store.append(&mut entries, draft, CLI_SOURCE, Placement::Front);
//! store.save(&entries)?;
//! ```
//!
//! `create`, `delete` and `list` wrap the load / mutate / save sequence for
//! callers that don't need the collection in between. The store takes no
//! locks: callers that share a file across threads must serialize mutating
//! sequences themselves, and separate processes are last-write-wins.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::models::{Entry, EntryDraft, EntryId, Placement};

/// Date pattern used when none is configured
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Time pattern used when none is configured
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M:%S";

/// Formatting options for new entries and the file layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// strftime pattern for `Entry::date`
    pub date_format: String,
    /// strftime pattern for `Entry::time`
    pub time_format: String,
    /// Spaces per indentation level when writing the file
    pub json_indent: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            json_indent: 4,
        }
    }
}

impl StoreOptions {
    /// Check that both patterns are ones chrono can format with
    pub fn validate(&self) -> StoreResult<()> {
        check_strftime("date_format", &self.date_format)?;
        check_strftime("time_format", &self.time_format)
    }
}

/// Reject a strftime pattern containing an unknown or malformed specifier
pub fn check_strftime(field: &'static str, pattern: &str) -> StoreResult<()> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(StoreError::InvalidFormat {
            field,
            pattern: pattern.to_string(),
        });
    }
    Ok(())
}

/// Format `now` with `pattern`, falling back to `fallback` if the pattern
/// is invalid
fn stamp<Tz>(now: &DateTime<Tz>, field: &'static str, pattern: &str, fallback: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match check_strftime(field, pattern) {
        Ok(()) => now.format(pattern).to_string(),
        Err(e) => {
            warn!(error = %e, fallback, "Using fallback format");
            now.format(fallback).to_string()
        }
    }
}

/// File-backed storage for the entry collection
#[derive(Debug, Clone)]
pub struct EntryStore {
    path: PathBuf,
    options: StoreOptions,
}

impl EntryStore {
    /// Create a store backed by the file at `path`
    ///
    /// Nothing touches the filesystem until the first `load` or `save`.
    pub fn new(path: impl Into<PathBuf>, options: StoreOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Check if the backing file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the entry collection
    ///
    /// A missing file is an empty collection. So is a file that can't be
    /// read or doesn't hold a JSON array of objects; that case is logged and
    /// the next `save` replaces the file.
    pub fn load(&self) -> Vec<Entry> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Entries file not found, starting empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to read entries file, starting with an empty collection"
                );
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<Entry>>(&bytes) {
            Ok(entries) => {
                debug!(path = %self.path.display(), count = entries.len(), "Loaded entries");
                entries
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Entries file is empty or invalid, starting with an empty collection"
                );
                Vec::new()
            }
        }
    }

    /// Replace the file contents with `entries`
    ///
    /// Creates the containing directory if needed. The new contents are
    /// written to a temporary file and renamed over the target, so a crash
    /// leaves either the old file or the new one.
    pub fn save(&self, entries: &[Entry]) -> StoreResult<()> {
        let bytes = self.encode(entries)?;
        atomic_write(&self.path, &bytes)?;
        debug!(path = %self.path.display(), count = entries.len(), "Saved entries");
        Ok(())
    }

    /// Build an entry from `draft` stamped with the current local time and
    /// insert it into `entries`
    ///
    /// Returns the new entry; persisting the collection is up to the caller.
    pub fn append(
        &self,
        entries: &mut Vec<Entry>,
        draft: EntryDraft,
        source: &str,
        placement: Placement,
    ) -> Entry {
        self.append_at(entries, draft, source, placement, Local::now())
    }

    /// Like `append`, with an explicit clock reading
    ///
    /// The id is `now` in milliseconds. If that id is already taken it is
    /// bumped until it's free, so two entries created within the same
    /// millisecond still get distinct ids.
    pub fn append_at<Tz>(
        &self,
        entries: &mut Vec<Entry>,
        draft: EntryDraft,
        source: &str,
        placement: Placement,
        now: DateTime<Tz>,
    ) -> Entry
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let mut id = now.timestamp_millis().max(1);
        while entries.iter().any(|e| e.id.value() == id) {
            id += 1;
        }

        let entry = Entry {
            id: EntryId(id),
            title: draft.title_or_default(),
            content: draft.content_or_default(),
            date: stamp(&now, "date_format", &self.options.date_format, DEFAULT_DATE_FORMAT),
            time: stamp(&now, "time_format", &self.options.time_format, DEFAULT_TIME_FORMAT),
            source: source.to_string(),
            extra: Default::default(),
        };

        match placement {
            Placement::Front => entries.insert(0, entry.clone()),
            Placement::Back => entries.push(entry.clone()),
        }

        entry
    }

    /// Remove every entry whose id equals `id`
    ///
    /// Returns `false`, leaving `entries` untouched, when nothing matched.
    pub fn remove(&self, entries: &mut Vec<Entry>, id: EntryId) -> bool {
        let before = entries.len();
        entries.retain(|e| e.id != id);
        entries.len() < before
    }

    /// Load the collection (alias kept for symmetry with `create`/`delete`)
    pub fn list(&self) -> Vec<Entry> {
        self.load()
    }

    /// Load, append one entry and save
    pub fn create(
        &self,
        draft: EntryDraft,
        source: &str,
        placement: Placement,
    ) -> StoreResult<Entry> {
        let mut entries = self.load();
        let entry = self.append(&mut entries, draft, source, placement);
        self.save(&entries)?;
        info!(id = %entry.id, source, %placement, total = entries.len(), "Created entry");
        Ok(entry)
    }

    /// Load, remove by id and save
    ///
    /// The file is only rewritten when something was removed.
    pub fn delete(&self, id: EntryId) -> StoreResult<bool> {
        let mut entries = self.load();
        if !self.remove(&mut entries, id) {
            debug!(%id, "No entry to delete");
            return Ok(false);
        }
        self.save(&entries)?;
        info!(%id, remaining = entries.len(), "Deleted entry");
        Ok(true)
    }

    fn encode(&self, entries: &[Entry]) -> StoreResult<Vec<u8>> {
        let indent = vec![b' '; self.options.json_indent];
        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(&indent));
        entries.serialize(&mut serializer)?;
        buf.push(b'\n');
        Ok(buf)
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> StoreResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StoreError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let temp_path = temp_path_for(path);

    let result = (|| {
        let mut file =
            File::create(&temp_path).map_err(|e| StoreError::from_io(e, temp_path.clone()))?;
        file.write_all(data)
            .map_err(|e| StoreError::from_io(e, temp_path.clone()))?;
        file.sync_all()
            .map_err(|e| StoreError::from_io(e, temp_path.clone()))?;

        fs::rename(&temp_path, path).map_err(|source| StoreError::AtomicWriteFailed {
            from: temp_path.clone(),
            to: path.to_path_buf(),
            source,
        })
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

/// Sibling temp file, unique per process
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "entries".to_string());
    path.with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
}

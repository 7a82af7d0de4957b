//! Local persistent key-value storage
//!
//! The on-disk analog of the browser storage the catalog front-end keeps:
//! one JSON file per concern under the user data dir
//! (~/.local/share/mflix). Access is single-threaded from the main loop;
//! writes are whole-file, last writer wins.
//!
//! Malformed files are deleted and replaced by the default value; a
//! corrupt progress or session file must never crash startup.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// File holding the per-movie playback progress map
pub const PROGRESS_FILE: &str = "progress.json";

/// File holding the flat list of already-seen catalog titles
pub const KNOWN_TITLES_FILE: &str = "known_titles.json";

/// File holding the auth session (absent ⇒ anonymous)
pub const SESSION_FILE: &str = "session.json";

/// JSON-file-backed storage rooted at a directory
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Open storage at the default data dir, creating it if needed.
    /// Returns None when no data dir can be determined.
    pub fn open_default() -> Option<Self> {
        let root = dirs::data_local_dir()?.join("mflix");
        std::fs::create_dir_all(&root).ok()?;
        Some(Self { root })
    }

    /// Open storage rooted at an explicit directory (used by tests)
    pub fn at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let _ = std::fs::create_dir_all(&root);
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Load a value, falling back to the default when the file is missing.
    /// A file that exists but fails to parse is deleted and the default
    /// returned; the error never propagates.
    pub fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.path(name);
        let contents = match std::fs::read_to_string(&path) {
            Ok(s) => s,
            Err(_) => return T::default(),
        };

        match serde_json::from_str(&contents) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(file = name, error = %e, "discarding malformed storage file");
                let _ = std::fs::remove_file(&path);
                T::default()
            }
        }
    }

    /// Persist a value as pretty-printed JSON
    pub fn save<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        std::fs::write(self.path(name), json)?;
        Ok(())
    }

    /// Remove a stored file; missing files are fine
    pub fn delete(&self, name: &str) {
        let _ = std::fs::remove_file(self.path(name));
    }
}

/// Current wall-clock time as epoch milliseconds
pub fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::models::ProgressRecord;

    #[test]
    fn test_load_missing_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::at(dir.path());

        let titles: Vec<String> = storage.load(KNOWN_TITLES_FILE);
        assert!(titles.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::at(dir.path());

        let mut records = HashMap::new();
        records.insert(7u64, ProgressRecord::new(120.0, 5400.0, 99));
        storage.save(PROGRESS_FILE, &records).unwrap();

        let loaded: HashMap<u64, ProgressRecord> = storage.load(PROGRESS_FILE);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[&7].position_secs, 120.0);
        assert_eq!(loaded[&7].saved_at_ms, 99);
    }

    #[test]
    fn test_malformed_file_is_deleted_and_defaulted() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::at(dir.path());
        let path = dir.path().join(PROGRESS_FILE);

        std::fs::write(&path, "not json {{{").unwrap();

        let loaded: HashMap<u64, ProgressRecord> = storage.load(PROGRESS_FILE);
        assert!(loaded.is_empty());
        // The corrupt file must be gone so the next write starts clean
        assert!(!path.exists());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::at(dir.path());

        storage.save(SESSION_FILE, &"x").unwrap();
        storage.delete(SESSION_FILE);
        storage.delete(SESSION_FILE);
        assert!(!dir.path().join(SESSION_FILE).exists());
    }

    #[test]
    fn test_epoch_ms_is_monotonic_enough() {
        let a = epoch_ms();
        let b = epoch_ms();
        assert!(b >= a);
        // Sanity: after 2020-01-01
        assert!(a > 1_577_836_800_000);
    }
}

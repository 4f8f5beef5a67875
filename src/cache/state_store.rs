//! Snapshot store for presentation state
//!
//! Provides a `StateStore` that writes small serializable snapshots (current
//! page, query, list position, open recipe) to JSON files, so the screens
//! can pick up where they left off when the process is restarted.

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// Wrapper struct for a snapshot stored on disk
#[derive(Debug, Serialize, Deserialize)]
struct StateEntry<T> {
    /// The saved snapshot
    data: T,
    /// When the snapshot was written
    saved_at: DateTime<Utc>,
}

/// Result of reading a snapshot
#[derive(Debug)]
pub struct SavedState<T> {
    /// The saved snapshot
    pub data: T,
    /// When the snapshot was written
    pub saved_at: DateTime<Utc>,
}

/// Reads and writes snapshots as `<key>.json` files
///
/// Uses `~/.local/share/recipe-search/state/` on Linux, or the equivalent
/// platform data directory elsewhere.
#[derive(Debug, Clone)]
pub struct StateStore {
    /// Directory where snapshot files are stored
    state_dir: PathBuf,
}

impl StateStore {
    /// Creates a StateStore in the platform data directory
    ///
    /// Returns `None` if the directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "recipe-search")?;
        let state_dir = project_dirs.data_dir().join("state");
        Some(Self { state_dir })
    }

    /// Creates a StateStore with a custom directory
    pub fn with_dir(state_dir: PathBuf) -> Self {
        Self { state_dir }
    }

    /// Returns the path to a snapshot file for the given key
    fn state_path(&self, key: &str) -> PathBuf {
        self.state_dir.join(format!("{}.json", key))
    }

    /// Writes a snapshot, replacing any previous one under the same key
    ///
    /// # Arguments
    /// * `key` - Unique identifier for the snapshot (e.g., "recipe_list")
    /// * `data` - The snapshot to save
    pub fn write<T: Serialize>(&self, key: &str, data: &T) -> std::io::Result<()> {
        fs::create_dir_all(&self.state_dir)?;

        let entry = StateEntry {
            data,
            saved_at: Utc::now(),
        };

        let json = serde_json::to_string_pretty(&entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        fs::write(self.state_path(key), json)
    }

    /// Writes a snapshot, logging instead of failing
    ///
    /// Losing a snapshot only costs the user their place in the list, so
    /// state holders call this on every change.
    pub fn save<T: Serialize>(&self, key: &str, data: &T) {
        if let Err(e) = self.write(key, data) {
            warn!(key, error = %e, "failed to save state snapshot");
        }
    }

    /// Reads a snapshot
    ///
    /// Returns `None` if the snapshot doesn't exist or cannot be parsed.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<SavedState<T>> {
        let content = fs::read_to_string(self.state_path(key)).ok()?;
        let entry: StateEntry<T> = serde_json::from_str(&content).ok()?;

        Some(SavedState {
            data: entry.data,
            saved_at: entry.saved_at,
        })
    }

    /// Deletes a snapshot; a missing file is not an error
    pub fn clear(&self, key: &str) -> std::io::Result<()> {
        match fs::remove_file(self.state_path(key)) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

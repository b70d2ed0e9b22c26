//! Response cache persisted as a single JSON file
//!
//! Provides a `CacheStore` mapping request locators to raw response bodies.
//! The whole map is rewritten to disk after every insert, so the file always
//! reflects the in-memory state once `put` returns.

use directories::ProjectDirs;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File name of the cache inside the XDG cache directory
const CACHE_FILE_NAME: &str = "cache.json";

/// Errors that can occur when persisting the cache
#[derive(Debug, Error)]
pub enum CacheError {
    /// Writing the cache file failed
    #[error("Failed to write cache file: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the cache contents failed
    #[error("Failed to serialize cache: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable mapping from request locator to raw response body
///
/// Keys are stored byte-exact. No normalization is applied, so two locators
/// that differ only in query parameter order are distinct entries.
#[derive(Debug, Clone)]
pub struct CacheStore {
    /// Location of the durable copy
    path: PathBuf,
    /// In-memory entries
    entries: HashMap<String, String>,
}

/// Returns the XDG-compliant location of the cache file
///
/// Uses `~/.cache/npsites/cache.json` on Linux, or the equivalent on other
/// platforms. Returns `None` if no home directory can be determined.
pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "npsites").map(|dirs| dirs.cache_dir().join(CACHE_FILE_NAME))
}

impl CacheStore {
    /// Creates an empty store bound to `path` without touching the filesystem
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: HashMap::new(),
        }
    }

    /// Loads the store from `path`
    ///
    /// A missing, unreadable or malformed file yields an empty store. This never
    /// fails: a corrupt cache only costs a re-fetch.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no readable cache file, starting empty");
                return Self::empty(path);
            }
        };

        match serde_json::from_str::<HashMap<String, String>>(&content) {
            Ok(entries) => {
                debug!(path = %path.display(), entries = entries.len(), "loaded cache");
                Self { path, entries }
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "ignoring corrupt cache file");
                Self::empty(path)
            }
        }
    }

    /// Looks up the cached body for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns true if `key` has a cached body
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts or overwrites `key`, then rewrites the whole file
    ///
    /// # Returns
    /// * `Ok(())` once the file on disk contains the new value
    /// * `Err(CacheError)` if serialization or writing fails
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<(), CacheError> {
        self.entries.insert(key.into(), value.into());
        self.save()
    }

    /// Serializes every entry and overwrites the durable file
    ///
    /// Parent directories are created if missing. The write goes through a
    /// temporary file that is renamed over the target.
    pub fn save(&self) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string(&self.entries)?;

        let temp_path = self.path.with_extension("tmp");
        if let Err(e) = write_synced(&temp_path, json.as_bytes())
            .and_then(|()| fs::rename(&temp_path, &self.path))
        {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        Ok(())
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Path of the durable file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read-only view of all entries
    pub fn entries(&self) -> &HashMap<String, String> {
        &self.entries
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

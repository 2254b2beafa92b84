//! Best score persistence
//!
//! The game keeps a single number across sessions: the best final score.
//! `ScoreStore` is the seam; the session driver never touches storage
//! directly.
//!
//! - `MemoryStore`: in-process, for tests and the headless demo
//! - `FileStore`: JSON file under the platform data dir (native)
//! - `LocalStore`: browser LocalStorage (wasm32)

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};

/// Storage failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no storage location available")]
    Unavailable,
    #[error("storage backend rejected the write: {0}")]
    Backend(String),
}

/// On-disk/in-storage record
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub best_score: f64,
}

/// Where the best score lives between sessions
pub trait ScoreStore {
    /// Stored best, or `None` if nothing was saved yet
    fn load_best(&self) -> Result<Option<f64>, StoreError>;
    fn save_best(&mut self, score: f64) -> Result<(), StoreError>;
}

/// Volatile store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best: Option<f64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_best(score: f64) -> Self {
        Self { best: Some(score) }
    }
}

impl ScoreStore for MemoryStore {
    fn load_best(&self) -> Result<Option<f64>, StoreError> {
        Ok(self.best)
    }

    fn save_best(&mut self, score: f64) -> Result<(), StoreError> {
        self.best = Some(score);
        Ok(())
    }
}

/// Application directory name used for native data files
#[cfg(not(target_arch = "wasm32"))]
pub const APP_DIR: &str = "sky-aviator";

/// Platform data directory for this game (created on demand)
#[cfg(not(target_arch = "wasm32"))]
pub fn data_dir() -> Result<PathBuf, StoreError> {
    let dirs = directories::ProjectDirs::from("", "", APP_DIR).ok_or(StoreError::Unavailable)?;
    let dir = dirs.data_dir();
    std::fs::create_dir_all(dir)?;
    Ok(dir.to_path_buf())
}

/// JSON file store
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `best_score.json` in the platform data directory
    pub fn open_default() -> Result<Self, StoreError> {
        Ok(Self::new(data_dir()?.join("best_score.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ScoreStore for FileStore {
    fn load_best(&self) -> Result<Option<f64>, StoreError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let record: ScoreRecord = serde_json::from_str(&json)?;
        Ok(Some(record.best_score))
    }

    fn save_best(&mut self, score: f64) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&ScoreRecord { best_score: score })?;
        // Write then rename so a crash never leaves a truncated file
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        log::info!("Best score {} saved to {}", score.floor(), self.path.display());
        Ok(())
    }
}

/// Browser LocalStorage store
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct LocalStore {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    pub const DEFAULT_KEY: &'static str = "sky_aviator_best_score";

    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for LocalStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_KEY)
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStore {
    fn load_best(&self) -> Result<Option<f64>, StoreError> {
        let storage = Self::storage()?;
        let Ok(Some(json)) = storage.get_item(&self.key) else {
            return Ok(None);
        };
        let record: ScoreRecord = serde_json::from_str(&json)?;
        Ok(Some(record.best_score))
    }

    fn save_best(&mut self, score: f64) -> Result<(), StoreError> {
        let storage = Self::storage()?;
        let json = serde_json::to_string(&ScoreRecord { best_score: score })?;
        storage
            .set_item(&self.key, &json)
            .map_err(|e| StoreError::Backend(format!("{e:?}")))?;
        log::info!("Best score {} saved", score.floor());
        Ok(())
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir()
            .join(format!("sky-aviator-test-{}-{}", std::process::id(), id))
            .join(name)
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load_best().unwrap(), None);
        store.save_best(120.5).unwrap();
        assert_eq!(store.load_best().unwrap(), Some(120.5));
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let store = FileStore::new(temp_path("missing.json"));
        assert_eq!(store.load_best().unwrap(), None);
    }

    #[test]
    fn test_file_store_persists() {
        let path = temp_path("best.json");
        let mut store = FileStore::new(&path);
        store.save_best(812.0).unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.load_best().unwrap(), Some(812.0));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let path = temp_path("garbage.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(store.load_best(), Err(StoreError::Json(_))));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}

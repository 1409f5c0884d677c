//! Persistence capabilities for history and preferences.
//!
//! The session writes locally first and hands entries to a [`HistoryStore`]
//! on a detached task. Stores only ever see completed entries.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use crate::core::history::HistoryEntry;
use crate::session::preferences::Preferences;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem error
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
    /// Stored data could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The backend refused or could not be reached
    #[error("Store unavailable: {message}")]
    Unavailable {
        /// Description
        message: String,
    },
}

impl StoreError {
    /// Create an unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Remote calculation history
#[async_trait]
pub trait HistoryStore: Send + Sync + std::fmt::Debug {
    /// Saves one completed calculation
    async fn persist_entry(&self, entry: &HistoryEntry) -> StoreResult<()>;

    /// Returns up to `limit` entries, newest first
    async fn fetch_entries(&self, limit: usize) -> StoreResult<Vec<HistoryEntry>>;

    /// Deletes every stored entry
    async fn clear_persisted(&self) -> StoreResult<()>;
}

/// Remote preference storage
#[async_trait]
pub trait PreferenceStore: Send + Sync + std::fmt::Debug {
    /// Loads preferences; `None` when nothing was saved yet
    async fn load_preferences(&self) -> StoreResult<Option<Preferences>>;

    /// Saves preferences
    async fn save_preferences(&self, preferences: &Preferences) -> StoreResult<()>;
}

// =============================================================================
// In-memory store
// =============================================================================

/// In-memory store, also used to simulate backend outages
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<Vec<HistoryEntry>>,
    preferences: Mutex<Option<Preferences>>,
    failing: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose every operation fails
    #[must_use]
    pub fn failing() -> Self {
        let store = Self::default();
        store.set_failing(true);
        store
    }

    /// Creates a store pre-populated with entries (newest first)
    #[must_use]
    pub fn with_entries(entries: Vec<HistoryEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
            ..Self::default()
        }
    }

    /// Toggles simulated failure
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of stored entries, newest first
    pub async fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.lock().await.clone()
    }

    /// Snapshot of stored preferences
    pub async fn preferences(&self) -> Option<Preferences> {
        self.preferences.lock().await.clone()
    }

    fn check(&self) -> StoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::unavailable("memory store is in failure mode"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl HistoryStore for MemoryStore {
    async fn persist_entry(&self, entry: &HistoryEntry) -> StoreResult<()> {
        self.check()?;
        self.entries.lock().await.insert(0, entry.clone());
        Ok(())
    }

    async fn fetch_entries(&self, limit: usize) -> StoreResult<Vec<HistoryEntry>> {
        self.check()?;
        Ok(self.entries.lock().await.iter().take(limit).cloned().collect())
    }

    async fn clear_persisted(&self) -> StoreResult<()> {
        self.check()?;
        self.entries.lock().await.clear();
        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for MemoryStore {
    async fn load_preferences(&self) -> StoreResult<Option<Preferences>> {
        self.check()?;
        Ok(self.preferences.lock().await.clone())
    }

    async fn save_preferences(&self, preferences: &Preferences) -> StoreResult<()> {
        self.check()?;
        *self.preferences.lock().await = Some(preferences.clone());
        Ok(())
    }
}

// =============================================================================
// JSON file store
// =============================================================================

/// Stores history and preferences as JSON files in a directory.
///
/// Layout:
/// ```text
/// <dir>/history.json      newest-first array of entries
/// <dir>/preferences.json  preferences object
/// ```
///
/// `history.json` keeps at most [`JsonFileStore::MAX_ENTRIES`] entries;
/// older ones are dropped on write.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    max_entries: usize,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// History file name
    pub const HISTORY_FILE: &'static str = "history.json";
    /// Preferences file name
    pub const PREFERENCES_FILE: &'static str = "preferences.json";
    /// Default cap on stored history entries
    pub const MAX_ENTRIES: usize = 1000;

    /// Creates a store rooted at `dir`; the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            max_entries: Self::MAX_ENTRIES,
            write_lock: Mutex::new(()),
        }
    }

    /// Sets the cap on stored history entries (at least one)
    #[must_use]
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    /// Root directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn history_path(&self) -> PathBuf {
        self.dir.join(Self::HISTORY_FILE)
    }

    fn preferences_path(&self) -> PathBuf {
        self.dir.join(Self::PREFERENCES_FILE)
    }

    async fn read_optional(path: &Path) -> StoreResult<Option<String>> {
        match tokio::fs::read_to_string(path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::io(path, err)),
        }
    }

    async fn read_history(&self) -> StoreResult<Vec<HistoryEntry>> {
        match Self::read_optional(&self.history_path()).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    /// Writes through a temporary file and renames it into place
    async fn write_atomic(&self, path: &Path, data: &[u8]) -> StoreResult<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::io(&self.dir, e))?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, data)
            .await
            .map_err(|e| StoreError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| StoreError::io(path, e))?;
        debug!(path = %path.display(), bytes = data.len(), "store file written");
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for JsonFileStore {
    async fn persist_entry(&self, entry: &HistoryEntry) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_history().await?;
        entries.insert(0, entry.clone());
        entries.truncate(self.max_entries);
        let data = serde_json::to_vec_pretty(&entries)?;
        self.write_atomic(&self.history_path(), &data).await
    }

    async fn fetch_entries(&self, limit: usize) -> StoreResult<Vec<HistoryEntry>> {
        let mut entries = self.read_history().await?;
        entries.truncate(limit);
        Ok(entries)
    }

    async fn clear_persisted(&self) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let data = serde_json::to_vec_pretty(&Vec::<HistoryEntry>::new())?;
        self.write_atomic(&self.history_path(), &data).await
    }
}

#[async_trait]
impl PreferenceStore for JsonFileStore {
    async fn load_preferences(&self) -> StoreResult<Option<Preferences>> {
        match Self::read_optional(&self.preferences_path()).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn save_preferences(&self, preferences: &Preferences) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let data = serde_json::to_vec_pretty(preferences)?;
        self.write_atomic(&self.preferences_path(), &data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::preferences::CalculatorMode;
    use tempfile::TempDir;

    // ===== MemoryStore tests =====

    #[tokio::test]
    async fn test_memory_store_newest_first() {
        let store = MemoryStore::new();
        store.persist_entry(&HistoryEntry::new("1 + 1", "2")).await.unwrap();
        store.persist_entry(&HistoryEntry::new("2 + 2", "4")).await.unwrap();

        let fetched = store.fetch_entries(1).await.unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].expression, "2 + 2");
        assert_eq!(store.entries().await.len(), 2);
    }

    #[tokio::test]
    async fn test_memory_store_failure_mode() {
        let store = MemoryStore::failing();
        let err = store
            .persist_entry(&HistoryEntry::new("1 + 1", "2"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable { .. }));
        assert!(store.fetch_entries(10).await.is_err());

        store.set_failing(false);
        assert!(store.fetch_entries(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_store_preferences() {
        let store = MemoryStore::new();
        assert_eq!(store.load_preferences().await.unwrap(), None);
        let prefs = Preferences::default().with_dark_mode(true);
        store.save_preferences(&prefs).await.unwrap();
        assert_eq!(store.load_preferences().await.unwrap(), Some(prefs));
    }

    // ===== JsonFileStore tests =====

    #[tokio::test]
    async fn test_file_store_missing_files_are_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("data"));
        assert!(store.fetch_entries(10).await.unwrap().is_empty());
        assert_eq!(store.load_preferences().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_history_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());
        store.persist_entry(&HistoryEntry::new("5 + 3", "8")).await.unwrap();
        store.persist_entry(&HistoryEntry::new("8 * 2", "16")).await.unwrap();

        let reopened = JsonFileStore::new(dir.path());
        let entries = reopened.fetch_entries(10).await.unwrap();
        let expressions: Vec<_> = entries.iter().map(|e| e.expression.as_str()).collect();
        assert_eq!(expressions, vec!["8 * 2", "5 + 3"]);
        assert!(!dir.path().join("history.json.tmp").exists());

        reopened.clear_persisted().await.unwrap();
        assert!(store.fetch_entries(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_store_trims_history_file() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path()).with_max_entries(3);
        for i in 0..5 {
            store
                .persist_entry(&HistoryEntry::new(format!("{i} + 0"), i.to_string()))
                .await
                .unwrap();
        }

        let raw = std::fs::read_to_string(dir.path().join(JsonFileStore::HISTORY_FILE)).unwrap();
        let stored: Vec<HistoryEntry> = serde_json::from_str(&raw).unwrap();
        let results: Vec<_> = stored.iter().map(|e| e.result.as_str()).collect();
        assert_eq!(results, vec!["4", "3", "2"]);
    }

    #[tokio::test]
    async fn test_file_store_preferences_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());
        let prefs = Preferences::default()
            .with_history_limit(25)
            .with_default_mode(CalculatorMode::Scientific);
        store.save_preferences(&prefs).await.unwrap();
        assert_eq!(store.load_preferences().await.unwrap(), Some(prefs));
    }

    #[tokio::test]
    async fn test_file_store_corrupt_history() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(JsonFileStore::HISTORY_FILE), "{oops").unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(matches!(
            store.fetch_entries(10).await,
            Err(StoreError::Serialization(_))
        ));
    }
}

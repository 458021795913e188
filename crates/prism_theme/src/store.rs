//! Durable key-value storage for theme preferences
//!
//! [`ThemeStore`] is the capability the engine uses to persist the user's
//! mode. Both operations are fallible; the engine absorbs failures (a failed
//! read falls back to the default mode, a failed write is logged and
//! dropped) so storage trouble never surfaces in the UI.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

/// Well-known storage key for the persisted theme mode
pub const MODE_STORAGE_KEY: &str = "appearance.mode";

/// Errors from a theme store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage format error: {0}")]
    Format(#[from] toml::de::Error),

    #[error("storage encode error: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Asynchronous get/set of string values at string keys
#[async_trait]
pub trait ThemeStore: Send + Sync {
    /// Read the value at `key`; `Ok(None)` means never set
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Durably write `value` at `key`
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store for tests and previews
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a key, e.g. to simulate state left by a previous run
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
        store
    }
}

#[async_trait]
impl ThemeStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// File-backed store holding a flat TOML table of key/value strings
///
/// Writes are read-modify-write over the whole file; the file is created on
/// first write. A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    async fn load(&self) -> Result<HashMap<String, String>, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => Ok(toml::from_str(&text)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl ThemeStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut entries = self.load().await?;
        Ok(entries.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.load().await.unwrap_or_default();
        entries.insert(key.to_owned(), value.to_owned());
        let text = toml::to_string(&entries)?;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, text).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_round_trips() {
        let store = MemoryStore::new();
        assert_eq!(store.get(MODE_STORAGE_KEY).await.unwrap(), None);

        store.set(MODE_STORAGE_KEY, "dark").await.unwrap();
        assert_eq!(
            store.get(MODE_STORAGE_KEY).await.unwrap(),
            Some("dark".to_owned())
        );
    }

    #[tokio::test]
    async fn file_store_round_trips_and_preserves_other_keys() {
        let path = std::env::temp_dir().join(format!(
            "prism-store-test-{}-{:?}.toml",
            std::process::id(),
            std::thread::current().id()
        ));
        let _ = tokio::fs::remove_file(&path).await;
        let store = FileStore::new(&path);

        assert_eq!(store.get(MODE_STORAGE_KEY).await.unwrap(), None);

        store.set("other.key", "kept").await.unwrap();
        store.set(MODE_STORAGE_KEY, "light").await.unwrap();

        assert_eq!(
            store.get(MODE_STORAGE_KEY).await.unwrap(),
            Some("light".to_owned())
        );
        assert_eq!(store.get("other.key").await.unwrap(), Some("kept".to_owned()));

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn file_store_rejects_corrupt_files() {
        let path = std::env::temp_dir().join(format!(
            "prism-store-corrupt-{}-{:?}.toml",
            std::process::id(),
            std::thread::current().id()
        ));
        tokio::fs::write(&path, "not valid toml [[[").await.unwrap();
        let store = FileStore::new(&path);

        assert!(store.get(MODE_STORAGE_KEY).await.is_err());

        let _ = tokio::fs::remove_file(&path).await;
    }
}

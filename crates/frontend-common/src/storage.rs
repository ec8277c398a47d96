//! Session-scoped key/value storage backends
//!
//! The browser backend wraps `window.sessionStorage`. Native builds use an
//! in-memory map (tests) or a JSON file (command line frontend) with the
//! same string-in, string-out contract.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage is not available in this environment
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage IO failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage contents are corrupt: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// String key/value storage with the semantics of `sessionStorage`
pub trait SessionStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage. Clones share the same map, which is how a page reload
/// is simulated: build a fresh session on a clone of the old storage.
#[derive(Clone, Debug, Default)]
pub struct MemorySessionStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.remove(key);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileSessionStorage;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use super::{SessionStorage, StorageError};
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};
    use std::sync::{Mutex, PoisonError};

    /// Storage persisted as a JSON object in a single file
    #[derive(Debug)]
    pub struct FileSessionStorage {
        path: PathBuf,
        // Serializes read-modify-write cycles within the process
        lock: Mutex<()>,
    }

    impl FileSessionStorage {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self {
                path: path.into(),
                lock: Mutex::new(()),
            }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
            match std::fs::read_to_string(&self.path) {
                Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
                Ok(content) => Ok(serde_json::from_str(&content)?),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
                Err(e) => Err(e.into()),
            }
        }

        fn save(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&self.path, serde_json::to_string_pretty(items)?)?;
            Ok(())
        }
    }

    impl SessionStorage for FileSessionStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
            Ok(self.load()?.remove(key))
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
            let mut items = self.load()?;
            items.insert(key.to_string(), value.to_string());
            self.save(&items)
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
            let mut items = self.load()?;
            if items.remove(key).is_some() {
                self.save(&items)?;
            }
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserSessionStorage;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::{SessionStorage, StorageError};

    /// `window.sessionStorage`, looked up on every call
    #[derive(Clone, Copy, Debug, Default)]
    pub struct BrowserSessionStorage;

    fn session_storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?
            .session_storage()
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))?
            .ok_or_else(|| StorageError::Unavailable("sessionStorage disabled".to_string()))
    }

    impl SessionStorage for BrowserSessionStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            session_storage()?
                .get_item(key)
                .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            session_storage()?
                .set_item(key, value)
                .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            session_storage()?
                .remove_item(key)
                .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
        }
    }
}

/// The single persisted token value: one storage backend plus the key it
/// lives under. Read failures are logged and treated as "no token".
#[derive(Clone)]
pub struct TokenSlot {
    storage: Arc<dyn SessionStorage>,
    key: String,
}

impl TokenSlot {
    pub fn new(storage: Arc<dyn SessionStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn read(&self) -> Option<String> {
        match self.storage.get_item(&self.key) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(key = %self.key, "Failed to read token from session storage: {e}");
                None
            }
        }
    }

    pub fn write(&self, token: &str) -> Result<(), StorageError> {
        self.storage.set_item(&self.key, token)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove_item(&self.key)
    }
}

impl std::fmt::Debug for TokenSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSlot")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

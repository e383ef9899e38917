use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use collview_core::error::CollviewError;

/// Key holding the bearer token attached to API requests.
pub const TOKEN_KEY: &str = "token";

/// Key holding the development theme preference.
pub const THEME_KEY: &str = "theme";

/// A small persistent key-value store, the stand-in for browser local storage.
pub trait LocalStore: Send + Sync {
    /// Store a value under the given key, replacing any previous value.
    fn store(&self, key: &str, value: &str) -> Result<(), CollviewError>;

    /// Retrieve a value by key.
    fn get(&self, key: &str) -> Result<Option<String>, CollviewError>;

    /// Delete a stored value. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), CollviewError>;
}

fn store_err(e: impl std::fmt::Display) -> CollviewError {
    CollviewError::Store {
        message: e.to_string(),
    }
}

/// OS keychain-backed store using the `keyring` crate. Used for the token.
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new() -> Self {
        Self {
            service: "collview".to_string(),
        }
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalStore for KeyringStore {
    fn store(&self, key: &str, value: &str) -> Result<(), CollviewError> {
        let entry = keyring::Entry::new(&self.service, key).map_err(store_err)?;
        entry.set_password(value).map_err(store_err)
    }

    fn get(&self, key: &str) -> Result<Option<String>, CollviewError> {
        let entry = keyring::Entry::new(&self.service, key).map_err(store_err)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(store_err(e)),
        }
    }

    fn delete(&self, key: &str) -> Result<(), CollviewError> {
        let entry = keyring::Entry::new(&self.service, key).map_err(store_err)?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(store_err(e)),
        }
    }
}

/// JSON-file-backed store, one flat object of string values.
///
/// The file is read on every access so separate processes see each
/// other's writes.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, CollviewError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| CollviewError::Serialization(e.to_string()))
    }

    fn write_all(&self, map: &BTreeMap<String, String>) -> Result<(), CollviewError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(map)
            .map_err(|e| CollviewError::Serialization(e.to_string()))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, ()>, CollviewError> {
        self.lock.lock().map_err(|_| store_err("file store lock poisoned"))
    }
}

impl LocalStore for FileStore {
    fn store(&self, key: &str, value: &str) -> Result<(), CollviewError> {
        let _guard = self.guard()?;
        let mut map = self.read_all()?;
        map.insert(key.to_string(), value.to_string());
        tracing::debug!(key, path = %self.path.display(), "stored value");
        self.write_all(&map)
    }

    fn get(&self, key: &str) -> Result<Option<String>, CollviewError> {
        let _guard = self.guard()?;
        Ok(self.read_all()?.remove(key))
    }

    fn delete(&self, key: &str) -> Result<(), CollviewError> {
        let _guard = self.guard()?;
        let mut map = self.read_all()?;
        if map.remove(key).is_some() {
            self.write_all(&map)?;
        }
        Ok(())
    }
}

/// In-memory store for testing.
pub struct MemoryStore {
    store: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            store: Mutex::new(BTreeMap::new()),
        }
    }

    /// A store that already holds a bearer token.
    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store
            .store
            .lock()
            .unwrap()
            .insert(TOKEN_KEY.to_string(), token.to_string());
        store
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalStore for MemoryStore {
    fn store(&self, key: &str, value: &str) -> Result<(), CollviewError> {
        self.store
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, CollviewError> {
        Ok(self.store.lock().unwrap().get(key).cloned())
    }

    fn delete(&self, key: &str) -> Result<(), CollviewError> {
        self.store.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_crud() {
        let store = MemoryStore::new();
        assert_eq!(store.get("test-key").unwrap(), None);
        store.store("test-key", "secret-token").unwrap();
        assert_eq!(store.get("test-key").unwrap(), Some("secret-token".to_string()));
        store.delete("test-key").unwrap();
        assert_eq!(store.get("test-key").unwrap(), None);
    }

    #[test]
    fn test_memory_store_delete_nonexistent() {
        let store = MemoryStore::new();
        store.delete("no-such-key").unwrap();
    }

    #[test]
    fn test_memory_store_with_token() {
        let store = MemoryStore::with_token("abc");
        assert_eq!(store.get(TOKEN_KEY).unwrap(), Some("abc".to_string()));
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("local_storage.json");

        let store = FileStore::new(&path);
        assert_eq!(store.get(THEME_KEY).unwrap(), None);
        store.store(THEME_KEY, "dark").unwrap();
        store.store("other", "1").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get(THEME_KEY).unwrap(), Some("dark".to_string()));

        reopened.delete(THEME_KEY).unwrap();
        assert_eq!(store.get(THEME_KEY).unwrap(), None);
        assert_eq!(store.get("other").unwrap(), Some("1".to_string()));
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local_storage.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(
            store.get(THEME_KEY),
            Err(CollviewError::Serialization(_))
        ));
    }
}

//! Session Store
//!
//! Byte-oriented key/value store with a lifetime tied to the user's browser
//! session. The host web framework supplies the production implementation;
//! the in-memory one backs tests and single-process hosts.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{AuthError, StorageError};

/// Session-scoped key/value byte store.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read the blob stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, AuthError>;

    /// Write `value` under `key`, replacing any existing blob.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), AuthError>;

    /// Delete the blob under `key`. Returns whether a blob existed.
    async fn delete(&self, key: &str) -> Result<bool, AuthError>;
}

/// In-memory session store.
#[derive(Default)]
pub struct InMemorySessionStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemorySessionStore {
    /// Create new in-memory session store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, AuthError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), AuthError> {
        self.entries.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, AuthError> {
        Ok(self.entries.lock().unwrap().remove(key).is_some())
    }
}

/// Mock session store for testing.
#[derive(Default)]
pub struct MockSessionStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    get_history: Mutex<Vec<String>>,
    set_history: Mutex<Vec<(String, Vec<u8>)>>,
    delete_history: Mutex<Vec<String>>,
    should_fail: Mutex<bool>,
}

impl MockSessionStore {
    /// Create new mock session store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set store to fail all operations.
    pub fn set_should_fail(&self, should_fail: bool) -> &Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    /// Pre-populate a blob.
    pub fn add_entry(&self, key: &str, value: Vec<u8>) -> &Self {
        self.entries.lock().unwrap().insert(key.to_string(), value);
        self
    }

    /// Get read history.
    pub fn get_get_history(&self) -> Vec<String> {
        self.get_history.lock().unwrap().clone()
    }

    /// Get write history.
    pub fn get_set_history(&self) -> Vec<(String, Vec<u8>)> {
        self.set_history.lock().unwrap().clone()
    }

    /// Get delete history.
    pub fn get_delete_history(&self) -> Vec<String> {
        self.delete_history.lock().unwrap().clone()
    }

    fn check_error(&self) -> Result<(), AuthError> {
        if *self.should_fail.lock().unwrap() {
            return Err(AuthError::Storage(StorageError::ReadFailed {
                message: "Mock store failure".to_string(),
            }));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MockSessionStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, AuthError> {
        self.check_error()?;
        self.get_history.lock().unwrap().push(key.to_string());
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), AuthError> {
        self.check_error()?;
        self.set_history
            .lock()
            .unwrap()
            .push((key.to_string(), value.clone()));
        self.entries.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, AuthError> {
        self.check_error()?;
        self.delete_history.lock().unwrap().push(key.to_string());
        Ok(self.entries.lock().unwrap().remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_set_and_get() {
        let store = InMemorySessionStore::new();
        store.set("user1_TokenCache", b"[]".to_vec()).await.unwrap();

        let blob = store.get("user1_TokenCache").await.unwrap();
        assert_eq!(blob, Some(b"[]".to_vec()));
    }

    #[tokio::test]
    async fn test_in_memory_delete() {
        let store = InMemorySessionStore::new();
        store.set("key", b"v".to_vec()).await.unwrap();

        assert!(store.delete("key").await.unwrap());
        assert!(!store.delete("key").await.unwrap());
        assert_eq!(store.get("key").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_mock_store_histories() {
        let store = MockSessionStore::new();
        store.set("k", b"v".to_vec()).await.unwrap();
        store.get("k").await.unwrap();
        store.delete("k").await.unwrap();

        assert_eq!(store.get_set_history().len(), 1);
        assert_eq!(store.get_get_history(), vec!["k".to_string()]);
        assert_eq!(store.get_delete_history(), vec!["k".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_store_failure() {
        let store = MockSessionStore::new();
        store.set_should_fail(true);

        assert!(store.get("k").await.is_err());
    }
}

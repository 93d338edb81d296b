//! Token Cache
//!
//! Per-user collection of token records, loaded from and persisted to the
//! session store as one JSON blob. Constructed per request; mutations stay
//! in memory until `persist` writes the whole sequence back.

use crate::error::{AuthError, StorageError};
use crate::token::store::SessionStore;
use crate::types::{ScopeMatching, TokenRecord};

/// Per-user token cache.
#[derive(Debug)]
pub struct TokenCache {
    user_id: String,
    cache_key: String,
    records: Vec<TokenRecord>,
}

impl TokenCache {
    /// Session key under which a user's cache blob is stored.
    pub fn cache_key(user_id: &str) -> String {
        format!("{}_TokenCache", user_id)
    }

    /// Load the user's cache from the session store. An absent blob yields an
    /// empty cache; a malformed blob is a [`StorageError::Corrupted`] error so
    /// callers can tell corruption apart from a genuine miss.
    pub async fn load<S: SessionStore>(user_id: &str, store: &S) -> Result<Self, AuthError> {
        let cache_key = Self::cache_key(user_id);
        let records = match store.get(&cache_key).await? {
            Some(blob) => serde_json::from_slice(&blob).map_err(|e| {
                AuthError::Storage(StorageError::Corrupted {
                    message: e.to_string(),
                })
            })?,
            None => Vec::new(),
        };

        Ok(Self {
            user_id: user_id.to_string(),
            cache_key,
            records,
        })
    }

    /// Load the user's cache, recovering from a corrupted blob by starting
    /// empty. The corrupt blob is left in place; the next persist overwrites it.
    pub async fn load_or_empty<S: SessionStore>(user_id: &str, store: &S) -> Result<Self, AuthError> {
        match Self::load(user_id, store).await {
            Ok(cache) => Ok(cache),
            Err(AuthError::Storage(StorageError::Corrupted { message })) => {
                tracing::warn!(user_id, %message, "discarding corrupted token cache blob");
                Ok(Self {
                    user_id: user_id.to_string(),
                    cache_key: Self::cache_key(user_id),
                    records: Vec::new(),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Serialize the full record sequence and write it back to the session
    /// store in one blob overwrite.
    pub async fn persist<S: SessionStore>(&self, store: &S) -> Result<(), AuthError> {
        let blob = serde_json::to_vec(&self.records).map_err(|e| {
            AuthError::Storage(StorageError::WriteFailed {
                message: e.to_string(),
            })
        })?;
        store.set(&self.cache_key, blob).await
    }

    /// The user this cache belongs to.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Current in-memory records.
    pub fn records(&self) -> &[TokenRecord] {
        &self.records
    }

    /// Whether the cache holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Index of the first record granting `scope`, in insertion order.
    pub fn find(&self, scope: &str, matching: ScopeMatching) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.grants_scope(scope, matching))
    }

    /// Record at `index`.
    pub fn get(&self, index: usize) -> Option<&TokenRecord> {
        self.records.get(index)
    }

    /// Append a newly acquired record.
    pub fn push(&mut self, record: TokenRecord) {
        self.records.push(record);
    }

    /// Overwrite the record at `index` in place.
    pub fn replace(&mut self, index: usize, record: TokenRecord) {
        self.records[index] = record;
    }
}

//! # Key Stores
//!
//! The persistent home of the identity seed. A [`KeyStore`] is a plain
//! string-keyed byte store: `get` returns whatever was last `set`, or `None`.
//! What the bytes mean is the caller's business; the identity helper stores
//! the seed as a JSON array of byte values.
//!
//! Two backends ship with the crate:
//!
//! | Store            | Lifetime                | Used by                    |
//! |------------------|-------------------------|----------------------------|
//! | [`MemoryKeyStore`] | the process           | tests, throwaway sessions  |
//! | [`SledKeyStore`]   | the profile directory | the CLI                    |

use parking_lot::RwLock;
use sled::{Db, Tree};
use std::collections::HashMap;
use std::path::Path;

use crate::config::IDENTITY_TREE;

/// Errors a key store can raise.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("corrupt entry under {key}: {reason}")]
    Corrupt { key: String, reason: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A string-keyed get/set byte store.
///
/// Implementations must be safe to share across threads; the identity
/// helper holds one behind an `Arc`.
pub trait KeyStore: Send + Sync {
    /// Returns the bytes stored under `key`, or `None` if nothing is there.
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()>;
}

// ---------------------------------------------------------------------------
// MemoryKeyStore
// ---------------------------------------------------------------------------

/// An in-memory store. Forgets everything when dropped.
#[derive(Debug, Default)]
pub struct MemoryKeyStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every entry, like a user clearing site data.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyStore for MemoryKeyStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        self.entries.write().insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SledKeyStore
// ---------------------------------------------------------------------------

/// A store backed by a sled tree on disk.
///
/// Every `set` is flushed before returning: losing the identity seed to a
/// crash means losing the identity.
#[derive(Debug, Clone)]
pub struct SledKeyStore {
    db: Db,
    entries: Tree,
}

impl SledKeyStore {
    /// Open or create a store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Self::from_db(sled::open(path)?)
    }

    /// A store that lives in a temporary directory and is removed on drop.
    pub fn open_temporary() -> StoreResult<Self> {
        Self::from_db(sled::Config::new().temporary(true).open()?)
    }

    fn from_db(db: Db) -> StoreResult<Self> {
        let entries = db.open_tree(IDENTITY_TREE)?;
        Ok(Self { db, entries })
    }

    /// Removes `key`. Returns `true` if something was there.
    pub fn remove(&self, key: &str) -> StoreResult<bool> {
        let existed = self.entries.remove(key.as_bytes())?.is_some();
        self.db.flush()?;
        Ok(existed)
    }
}

impl KeyStore for SledKeyStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.entries.get(key.as_bytes())?.map(|v| v.to_vec()))
    }

    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        self.entries.insert(key.as_bytes(), value)?;
        self.db.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_get_set() {
        let store = MemoryKeyStore::new();
        assert!(store.get("k").unwrap().is_none());

        store.set("k", b"v1").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some(&b"v1"[..]));

        store.set("k", b"v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some(&b"v2"[..]));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn memory_store_clear() {
        let store = MemoryKeyStore::new();
        store.set("k", b"v").unwrap();
        store.clear();
        assert!(store.is_empty());
        assert!(store.get("k").unwrap().is_none());
    }

    #[test]
    fn sled_store_get_set_remove() {
        let store = SledKeyStore::open_temporary().unwrap();
        assert!(store.get("seed").unwrap().is_none());

        store.set("seed", &[1, 2, 3]).unwrap();
        assert_eq!(store.get("seed").unwrap(), Some(vec![1, 2, 3]));

        assert!(store.remove("seed").unwrap());
        assert!(!store.remove("seed").unwrap());
        assert!(store.get("seed").unwrap().is_none());
    }

    #[test]
    fn sled_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = SledKeyStore::open(dir.path()).unwrap();
            store.set("seed", b"persisted").unwrap();
        }
        let reopened = SledKeyStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get("seed").unwrap(), Some(b"persisted".to_vec()));
    }
}

//! # Backing Store Trait
//!
//! This module defines the capability every storage medium has to provide.
//! The engine treats the medium as an opaque byte store and only ever calls
//! these four operations, so memory, the process-wide defaults store and sled
//! are interchangeable.
//!
//! ## Implementations
//!
//! - `MemoryStore`: thread-safe in-memory storage using RwLock<HashMap>
//! - `DefaultsStore`: named suites of the process-wide settings store
//! - `SledStore`: persistent storage using the sled embedded database

use anyhow::Result;
use std::collections::HashSet;
use std::sync::Arc;

/// Common interface for all backing stores.
///
/// `set` and `remove` must be durable by the time they return. All stores
/// should be safe to share across threads (Send + Sync).
#[cfg_attr(test, mockall::automock)]
pub trait BackingStore: Send + Sync {
    /// Retrieve the bytes stored under `key`.
    ///
    /// # Returns
    /// * `Result<Option<Vec<u8>>>` - The value if found, None otherwise
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// All keys currently stored, in no particular order.
    fn keys(&self) -> Result<HashSet<String>>;
}

impl<S: BackingStore + ?Sized> BackingStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<HashSet<String>> {
        (**self).keys()
    }
}

impl<S: BackingStore + ?Sized> BackingStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<HashSet<String>> {
        (**self).keys()
    }
}

impl<S: BackingStore + ?Sized> BackingStore for &S {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<HashSet<String>> {
        (**self).keys()
    }
}

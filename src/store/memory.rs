//! # Thread-Safe In-Memory Backing Store
//!
//! This module provides an in-memory backing store using RwLock<HashMap>.
//! Implements the `BackingStore` interface so the engine can run on it
//! without touching disk.
//!
//! ## Thread Safety Implementation
//!
//! The store uses `Arc<RwLock<HashMap<String, Vec<u8>>>>`:
//! - **Multiple concurrent readers**: `get` and `keys` take a shared lock
//! - **Single writer**: `set` and `remove` take an exclusive lock
//! - **Cheap clones**: clones share the same map
//!
//! Each call is atomic on its own. The engine's check-then-write sequences
//! span two calls and are not.

use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::backing::BackingStore;

type Map = HashMap<String, Vec<u8>>;

/// Thread-safe in-memory backing store.
///
/// **Note**: This store is not persistent! All data is lost when the last
/// clone is dropped.
#[derive(Clone, Default)]
pub struct MemoryStore {
    /// Shared map; every clone of the store sees the same entries
    data: Arc<RwLock<Map>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in the store.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    /// Remove every entry.
    pub fn clear(&self) -> Result<()> {
        self.write()?.clear();
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Map>> {
        self.data
            .read()
            .map_err(|_| anyhow!("memory store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Map>> {
        self.data
            .write()
            .map_err(|_| anyhow!("memory store lock poisoned"))
    }
}

impl BackingStore for MemoryStore {
    /// Acquires a **shared read lock**; concurrent readers do not block
    /// each other.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.read()?.get(key).cloned())
    }

    /// Acquires an **exclusive write lock**. An in-memory write is durable
    /// for the lifetime of the store as soon as the lock is released.
    fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.write()?.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.write()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<HashSet<String>> {
        Ok(self.read()?.keys().cloned().collect())
    }
}

// src/store/sled_store.rs
use anyhow::{anyhow, Result};
use log::info;
use sled::{Db, Tree};
use std::collections::HashSet;
use std::path::Path;

use super::backing::BackingStore;

/// Name of the sled tree records are kept in.
const TREE_NAME: &[u8] = b"codable_store";

/// Persistent backing store on a sled database. Every write is flushed
/// before it returns.
pub struct SledStore {
    db: Db,
    tree: Tree,
}

impl SledStore {
    pub fn new(storage_path: impl AsRef<Path>) -> Result<Self> {
        let path = storage_path.as_ref();
        let db = sled::open(path)?;
        let tree = db.open_tree(TREE_NAME)?;
        info!("Opened sled store at {}", path.display());
        Ok(Self { db, tree })
    }

    /// Open a throwaway database that is deleted on drop.
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        let tree = db.open_tree(TREE_NAME)?;
        Ok(Self { db, tree })
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

impl BackingStore for SledStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.tree.get(key)?.map(|v| v.to_vec()))
    }

    fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.tree.insert(key.as_bytes(), value)?;
        self.flush()
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.tree.remove(key)?;
        self.flush()
    }

    fn keys(&self) -> Result<HashSet<String>> {
        self.tree
            .iter()
            .keys()
            .map(|k| {
                let k = k?;
                String::from_utf8(k.to_vec()).map_err(|e| anyhow!("non UTF-8 key in sled tree: {}", e))
            })
            .collect()
    }
}

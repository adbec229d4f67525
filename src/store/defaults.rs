//! # Process-Wide Defaults Store
//!
//! A settings store shared by the whole process, split into named domains
//! ("suites"). `DefaultsStore::standard()` is the domain the default engine
//! uses; `DefaultsStore::suite(name)` opens an isolated domain, which is what
//! tests and secondary components should use so they never touch the
//! standard one.
//!
//! Every handle to the same domain sees the same entries. Nothing is written
//! to disk: "persistent" here means a domain outlives the handles to it and
//! lasts for the lifetime of the process, until the process exits or
//! `remove_persistent_domain` wipes it. Use `SledStore` for data that must
//! survive a restart.

use anyhow::Result;
use log::debug;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};

use super::backing::BackingStore;
use super::memory::MemoryStore;

static STANDARD: Lazy<MemoryStore> = Lazy::new(MemoryStore::new);

static SUITES: Lazy<RwLock<HashMap<String, MemoryStore>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Handle to one domain of the process-wide settings store.
#[derive(Clone)]
pub struct DefaultsStore {
    suite: Option<String>,
    data: MemoryStore,
}

impl DefaultsStore {
    /// The standard domain shared by the whole process.
    pub fn standard() -> Self {
        Self {
            suite: None,
            data: STANDARD.clone(),
        }
    }

    /// The domain named `name`, created empty on first use.
    pub fn suite(name: &str) -> Self {
        if let Some(data) = SUITES
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return Self {
                suite: Some(name.to_string()),
                data: data.clone(),
            };
        }

        let mut suites = SUITES.write().unwrap_or_else(PoisonError::into_inner);
        let data = suites
            .entry(name.to_string())
            .or_insert_with(|| {
                debug!("Creating defaults suite '{}'", name);
                MemoryStore::new()
            })
            .clone();
        Self {
            suite: Some(name.to_string()),
            data,
        }
    }

    /// Wipe every entry of the domain named `name`. Open handles to it stay
    /// valid and see an empty domain.
    ///
    /// The domain is persistent only in the sense that it lasts for the life
    /// of the process; there is no on-disk copy to remove.
    pub fn remove_persistent_domain(name: &str) -> Result<()> {
        let suites = SUITES.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(data) = suites.get(name) {
            debug!("Removing defaults suite '{}'", name);
            data.clear()?;
        }
        Ok(())
    }

    /// Name of this domain; `None` for the standard domain.
    pub fn suite_name(&self) -> Option<&str> {
        self.suite.as_deref()
    }

    /// Number of entries in this domain.
    pub fn len(&self) -> Result<usize> {
        self.data.len()
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.data.is_empty()
    }
}

impl Default for DefaultsStore {
    fn default() -> Self {
        Self::standard()
    }
}

impl BackingStore for DefaultsStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.data.get(key)
    }

    fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.data.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.data.remove(key)
    }

    fn keys(&self) -> Result<HashSet<String>> {
        self.data.keys()
    }
}

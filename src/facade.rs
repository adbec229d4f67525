//! # Typed Store Façade
//!
//! `CodableStore<T>` is the entry point callers use. It fixes the record
//! type once and forwards every call to its engine. By default it runs on
//! the process-wide defaults store; pass another engine with
//! [`CodableStore::with_engine`] to use a different backend or an isolated
//! store in tests.
//!
//! ```rust
//! use codable_store::{CodableStore, KvEngine, MemoryStore, Record};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Note {
//!     text: String,
//! }
//!
//! impl Record for Note {
//!     const NAMESPACE: &'static str = "Note";
//! }
//!
//! let notes = CodableStore::<Note, _>::with_engine(KvEngine::new(MemoryStore::new()));
//! notes.create("n1", &Note { text: "hello".into() })?;
//! assert_eq!(notes.read("n1")?, Some(Note { text: "hello".into() }));
//! # Ok::<(), codable_store::StoreError>(())
//! ```

use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;

use crate::engine::{DefaultEngine, Engine};
use crate::error::Result;
use crate::record::Record;

/// Typed pass-through to an engine for records of type `T`.
pub struct CodableStore<T: Record, E: Engine = DefaultEngine> {
    engine: E,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> CodableStore<T, DefaultEngine> {
    /// A store on the standard domain of the process-wide defaults store.
    pub fn new() -> Self {
        Self::with_engine(DefaultEngine::default())
    }
}

impl<T: Record> Default for CodableStore<T, DefaultEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record, E: Engine> CodableStore<T, E> {
    /// A store forwarding to `engine`.
    pub fn with_engine(engine: E) -> Self {
        Self {
            engine,
            _record: PhantomData,
        }
    }

    /// The engine calls are forwarded to.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Persist a new record.
    ///
    /// # Errors
    /// `ItemAlreadyExists` if a record of this type already uses `id`.
    pub fn create(&self, id: &str, record: &T) -> Result<()> {
        self.engine.create(id, record)
    }

    /// Read a record; `None` if it is not stored.
    pub fn read(&self, id: &str) -> Result<Option<T>> {
        self.engine.read(id)
    }

    /// Overwrite a record.
    ///
    /// # Errors
    /// `ItemDoesNotExist` if no record of this type uses `id`.
    pub fn update(&self, id: &str, new_record: &T) -> Result<()> {
        self.engine.update(id, new_record)
    }

    /// Overwrite a record, inserting it if it does not exist.
    pub fn update_or_insert(&self, id: &str, new_record: &T) -> Result<()> {
        self.engine.update_or_create(id, new_record)
    }

    /// Delete a record. Deleting a missing record does nothing.
    pub fn delete(&self, id: &str) -> Result<()> {
        self.engine.delete::<T>(id)
    }

    /// All IDs in use for this record type.
    pub fn fetch_all_ids(&self) -> Result<HashSet<String>> {
        self.engine.fetch_all_ids::<T>()
    }

    /// All records of this type keyed by ID.
    pub fn fetch_all_entries(&self) -> Result<HashMap<String, Option<T>>> {
        self.engine.fetch_all_entries::<T>()
    }
}

//! # Storage Engine
//!
//! The engine turns typed CRUD requests into backing-store calls. It owns
//! the rules of the store:
//!
//! - every record of type `T` lives under `"<T::NAMESPACE>/<id>"`
//! - `create` refuses to overwrite, `update` refuses to insert
//! - `update_or_create` and `delete` never fail on existence
//! - listings scan all keys and keep those with the type's prefix
//!
//! Nothing is cached. Every call goes to the backing store, which remains
//! the only source of truth.
//!
//! ## Concurrency
//!
//! The existence check in `create`/`update` and the write that follows are
//! two separate backing-store calls. Callers that mutate the same ID from
//! several threads have to serialize those calls themselves.

use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use crate::codec::{Codec, DecodePolicy};
use crate::error::{Result, StoreError};
use crate::record::{
    internal_key, namespace_of, strip_namespace, validate_namespace, Record,
};
use crate::store::{BackingStore, DefaultsStore};

/// The CRUD contract a storage backend provides to the façade.
pub trait Engine {
    /// Persist a new record. Fails with `ItemAlreadyExists` if `id` is taken.
    fn create<T: Record>(&self, id: &str, record: &T) -> Result<()>;

    /// Read a record, `None` if it does not exist.
    fn read<T: Record>(&self, id: &str) -> Result<Option<T>>;

    /// Overwrite a record. Fails with `ItemDoesNotExist` if `id` is unknown.
    fn update<T: Record>(&self, id: &str, new_record: &T) -> Result<()>;

    /// Write a record whether or not it exists.
    fn update_or_create<T: Record>(&self, id: &str, new_record: &T) -> Result<()>;

    /// Remove a record. Missing records are ignored.
    fn delete<T: Record>(&self, id: &str) -> Result<()>;

    /// IDs of every stored record of type `T`.
    fn fetch_all_ids<T: Record>(&self) -> Result<HashSet<String>>;

    /// Every stored record of type `T`, keyed by ID. Entries that fail to
    /// decode map to `None` under the lenient decode policy.
    fn fetch_all_entries<T: Record>(&self) -> Result<HashMap<String, Option<T>>>;
}

impl<E: Engine> Engine for Arc<E> {
    fn create<T: Record>(&self, id: &str, record: &T) -> Result<()> {
        (**self).create(id, record)
    }

    fn read<T: Record>(&self, id: &str) -> Result<Option<T>> {
        (**self).read(id)
    }

    fn update<T: Record>(&self, id: &str, new_record: &T) -> Result<()> {
        (**self).update(id, new_record)
    }

    fn update_or_create<T: Record>(&self, id: &str, new_record: &T) -> Result<()> {
        (**self).update_or_create(id, new_record)
    }

    fn delete<T: Record>(&self, id: &str) -> Result<()> {
        (**self).delete::<T>(id)
    }

    fn fetch_all_ids<T: Record>(&self) -> Result<HashSet<String>> {
        (**self).fetch_all_ids::<T>()
    }

    fn fetch_all_entries<T: Record>(&self) -> Result<HashMap<String, Option<T>>> {
        (**self).fetch_all_entries::<T>()
    }
}

/// Engine on top of the process-wide defaults store.
pub type DefaultEngine = KvEngine<DefaultsStore>;

/// Engine over any key-value backing store.
pub struct KvEngine<S: BackingStore = DefaultsStore> {
    store: S,
    codec: Codec,
    decode_policy: DecodePolicy,
    /// Namespaces this engine has served so far
    namespaces: RwLock<BTreeSet<String>>,
}

impl Default for KvEngine<DefaultsStore> {
    fn default() -> Self {
        Self::new(DefaultsStore::standard())
    }
}

impl<S: BackingStore> KvEngine<S> {
    /// Create an engine using JSON and the lenient decode policy.
    pub fn new(store: S) -> Self {
        Self {
            store,
            codec: Codec::default(),
            decode_policy: DecodePolicy::default(),
            namespaces: RwLock::new(BTreeSet::new()),
        }
    }

    /// Encode and decode record values with `codec` instead of JSON.
    pub fn with_codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    /// Choose what `read` and `fetch_all_entries` do with undecodable values.
    pub fn with_decode_policy(mut self, decode_policy: DecodePolicy) -> Self {
        self.decode_policy = decode_policy;
        self
    }

    /// The codec record values are stored with.
    pub fn codec(&self) -> Codec {
        self.codec
    }

    /// The policy applied when a stored value fails to decode.
    pub fn decode_policy(&self) -> DecodePolicy {
        self.decode_policy
    }

    /// The backing store this engine reads and writes.
    pub fn backing(&self) -> &S {
        &self.store
    }

    /// Namespaces registered so far, sorted.
    pub fn namespaces(&self) -> Vec<String> {
        self.namespaces
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Validate `namespace` and record it. A namespace that is a string
    /// prefix of another one (or the other way round) is refused, whether
    /// the other one was registered on this engine or already has keys in
    /// the backing store.
    pub fn register_namespace(&self, namespace: &str) -> Result<()> {
        if self
            .namespaces
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(namespace)
        {
            return Ok(());
        }
        validate_namespace(namespace)?;

        let mut registered = self
            .namespaces
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = registered
            .iter()
            .find(|existing| namespaces_overlap(existing, namespace))
        {
            return Err(StoreError::NamespaceConflict {
                existing: existing.clone(),
                requested: namespace.to_string(),
            });
        }

        // Other engines may share this backing store
        let stored = self.store.keys()?;
        if let Some(existing) = stored
            .iter()
            .filter_map(|key| namespace_of(key))
            .find(|existing| namespaces_overlap(existing, namespace))
        {
            return Err(StoreError::NamespaceConflict {
                existing: existing.to_string(),
                requested: namespace.to_string(),
            });
        }
        debug!("Registered namespace '{}'", namespace);
        registered.insert(namespace.to_string());
        Ok(())
    }

    /// IDs stored under `namespace`, without registering it.
    pub fn ids_in(&self, namespace: &str) -> Result<HashSet<String>> {
        validate_namespace(namespace)?;
        Ok(self
            .store
            .keys()?
            .iter()
            .filter_map(|key| strip_namespace(namespace, key))
            .map(str::to_string)
            .collect())
    }

    /// Undecoded values stored under `namespace`, keyed by ID.
    pub fn raw_entries_in(&self, namespace: &str) -> Result<BTreeMap<String, Vec<u8>>> {
        let mut entries = BTreeMap::new();
        for id in self.ids_in(namespace)? {
            // The key may have been removed since the scan
            if let Some(bytes) = self.store.get(&internal_key(namespace, &id))? {
                entries.insert(id, bytes);
            }
        }
        Ok(entries)
    }

    /// Remove the raw entry `namespace/id`, without registering the namespace.
    pub fn remove_raw(&self, namespace: &str, id: &str) -> Result<()> {
        validate_namespace(namespace)?;
        self.store.remove(&internal_key(namespace, id))?;
        Ok(())
    }

    /// Register `T`'s namespace and derive its key for `id`.
    fn key_for<T: Record>(&self, id: &str) -> Result<String> {
        self.register_namespace(T::NAMESPACE)?;
        Ok(internal_key(T::NAMESPACE, id))
    }

    fn encode<T: Record>(&self, key: &str, record: &T) -> Result<Vec<u8>> {
        self.codec
            .encode(record)
            .map_err(|source| StoreError::Encode {
                key: key.to_string(),
                source,
            })
    }

    fn decode<T: Record>(&self, key: &str, bytes: &[u8]) -> Result<Option<T>> {
        match self.codec.decode(bytes) {
            Ok(record) => Ok(Some(record)),
            Err(source) => match self.decode_policy {
                DecodePolicy::Lenient => {
                    warn!(
                        "Treating undecodable value under '{}' as absent: {}",
                        key, source
                    );
                    Ok(None)
                }
                DecodePolicy::Strict => Err(StoreError::CorruptData {
                    key: key.to_string(),
                    source,
                }),
            },
        }
    }
}

/// True for two different namespaces where one starts with the other.
fn namespaces_overlap(existing: &str, requested: &str) -> bool {
    existing != requested && (existing.starts_with(requested) || requested.starts_with(existing))
}

impl<S: BackingStore> Engine for KvEngine<S> {
    fn create<T: Record>(&self, id: &str, record: &T) -> Result<()> {
        let key = self.key_for::<T>(id)?;
        if self.store.get(&key)?.is_some() {
            return Err(StoreError::ItemAlreadyExists { key });
        }
        let bytes = self.encode(&key, record)?;
        debug!("create {}", key);
        self.store.set(&key, bytes)?;
        Ok(())
    }

    fn read<T: Record>(&self, id: &str) -> Result<Option<T>> {
        let key = self.key_for::<T>(id)?;
        debug!("read {}", key);
        match self.store.get(&key)? {
            Some(bytes) => self.decode(&key, &bytes),
            None => Ok(None),
        }
    }

    fn update<T: Record>(&self, id: &str, new_record: &T) -> Result<()> {
        let key = self.key_for::<T>(id)?;
        if self.store.get(&key)?.is_none() {
            return Err(StoreError::ItemDoesNotExist { key });
        }
        let bytes = self.encode(&key, new_record)?;
        debug!("update {}", key);
        self.store.set(&key, bytes)?;
        Ok(())
    }

    fn update_or_create<T: Record>(&self, id: &str, new_record: &T) -> Result<()> {
        let key = self.key_for::<T>(id)?;
        let bytes = self.encode(&key, new_record)?;
        debug!("update_or_create {}", key);
        self.store.set(&key, bytes)?;
        Ok(())
    }

    fn delete<T: Record>(&self, id: &str) -> Result<()> {
        let key = self.key_for::<T>(id)?;
        debug!("delete {}", key);
        self.store.remove(&key)?;
        Ok(())
    }

    fn fetch_all_ids<T: Record>(&self) -> Result<HashSet<String>> {
        self.register_namespace(T::NAMESPACE)?;
        self.ids_in(T::NAMESPACE)
    }

    fn fetch_all_entries<T: Record>(&self) -> Result<HashMap<String, Option<T>>> {
        self.register_namespace(T::NAMESPACE)?;
        let mut entries = HashMap::new();
        for (id, bytes) in self.raw_entries_in(T::NAMESPACE)? {
            let key = internal_key(T::NAMESPACE, &id);
            let record = self.decode(&key, &bytes)?;
            entries.insert(id, record);
        }
        Ok(entries)
    }
}

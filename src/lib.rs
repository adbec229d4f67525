//! # codable_store
//!
//! Typed record persistence over pluggable key-value backends.
//!
//! - [`CodableStore`]: the typed façade callers use
//! - [`Engine`] / [`KvEngine`]: the CRUD contract and its default implementation
//! - [`store`]: backing stores (process-wide defaults, memory, sled)
//! - [`Codec`]: how records are turned into bytes

pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod facade;
pub mod record;
pub mod store;

pub use codec::{Codec, CodecError, DecodePolicy};
pub use self::config::{Backend, StoreConfig};
pub use engine::{DefaultEngine, Engine, KvEngine};
pub use error::{Result, StoreError};
pub use facade::CodableStore;
pub use record::Record;
pub use store::{BackingStore, DefaultsStore, MemoryStore, SledStore};

//! # Records and Key Derivation
//!
//! A record type declares an explicit namespace tag. The engine stores a
//! record with ID `id` under the internal key `"<NAMESPACE>/<id>"`, so the
//! same ID can be used by different record types without collision.
//!
//! Namespaces must be non-empty and must not contain the separator. That
//! keeps the boundary between namespace and ID unambiguous, and the ID is
//! recovered by dropping the first `NAMESPACE.len() + 1` bytes of the key.
//!
//! ```rust
//! use codable_store::Record;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct TestRecord {
//!     name: String,
//!     number: i64,
//! }
//!
//! impl Record for TestRecord {
//!     const NAMESPACE: &'static str = "TestRecord";
//! }
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StoreError};

/// Separator between namespace and ID in internal keys.
pub const SEPARATOR: char = '/';

/// A value that can be persisted by the store.
pub trait Record: Serialize + DeserializeOwned {
    /// Stable tag scoping this type's keys. Renaming the Rust type does not
    /// change it, so existing data stays reachable.
    const NAMESPACE: &'static str;
}

/// Check that a namespace can be used as a key prefix.
pub fn validate_namespace(namespace: &str) -> Result<()> {
    if namespace.is_empty() {
        return Err(StoreError::InvalidNamespace {
            namespace: namespace.to_string(),
            reason: "namespace must not be empty".to_string(),
        });
    }
    if namespace.contains(SEPARATOR) {
        return Err(StoreError::InvalidNamespace {
            namespace: namespace.to_string(),
            reason: format!("namespace must not contain '{}'", SEPARATOR),
        });
    }
    Ok(())
}

/// The prefix every key of `namespace` starts with.
pub fn namespace_prefix(namespace: &str) -> String {
    format!("{}{}", namespace, SEPARATOR)
}

/// Derive the internal key for `id` within `namespace`.
pub fn internal_key(namespace: &str, id: &str) -> String {
    format!("{}{}{}", namespace, SEPARATOR, id)
}

/// Recover the ID from an internal key, or `None` if the key belongs to
/// another namespace.
pub fn strip_namespace<'a>(namespace: &str, key: &'a str) -> Option<&'a str> {
    key.strip_prefix(namespace)?.strip_prefix(SEPARATOR)
}

/// The namespace part of an internal key, or `None` for keys without a
/// separator or with nothing before it.
pub fn namespace_of(key: &str) -> Option<&str> {
    key.split_once(SEPARATOR)
        .map(|(namespace, _)| namespace)
        .filter(|namespace| !namespace.is_empty())
}

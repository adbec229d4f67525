//! # Error Types
//!
//! Every fallible operation of the store returns [`StoreError`]. The two
//! existence errors are part of the CRUD contract and are never swallowed by
//! the engine or the façade. Backing-store failures arrive as `anyhow::Error`
//! and are wrapped untouched in [`StoreError::Backend`].

use thiserror::Error;

use crate::codec::CodecError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// `create` found a value under the key already.
    #[error("The record already exists in the data store (key '{key}').")]
    ItemAlreadyExists { key: String },

    /// `update` found no value under the key.
    #[error("The record does not exist in the data store (key '{key}').")]
    ItemDoesNotExist { key: String },

    /// Stored bytes could not be decoded. Only raised under `DecodePolicy::Strict`.
    #[error("Stored value under key '{key}' could not be decoded: {source}")]
    CorruptData {
        key: String,
        #[source]
        source: CodecError,
    },

    #[error("Record for key '{key}' could not be encoded: {source}")]
    Encode {
        key: String,
        #[source]
        source: CodecError,
    },

    #[error("Invalid namespace '{namespace}': {reason}")]
    InvalidNamespace { namespace: String, reason: String },

    /// Two namespaces where one is a prefix of the other.
    #[error("Namespace '{requested}' conflicts with registered namespace '{existing}'")]
    NamespaceConflict { existing: String, requested: String },

    /// Failure reported by the backing store. Not retried.
    #[error("Backing store error: {0}")]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    /// A short hint telling the caller what to do instead.
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            StoreError::ItemAlreadyExists { .. } => {
                "Remove the record from the data store and try again, or use an update operation."
            }
            StoreError::ItemDoesNotExist { .. } => {
                "Create the record first, or use update_or_insert."
            }
            StoreError::CorruptData { .. } => {
                "Overwrite the entry with update_or_insert or delete it."
            }
            StoreError::Encode { .. } => "Check that the record type serializes with the configured codec.",
            StoreError::InvalidNamespace { .. } => {
                "Use a non-empty namespace that does not contain '/'."
            }
            StoreError::NamespaceConflict { .. } => {
                "Pick namespaces where neither is a prefix of the other."
            }
            StoreError::Backend(_) => "Check the backing store and retry the operation.",
        }
    }

    /// True for the two existence errors of the CRUD contract.
    pub fn is_existence_error(&self) -> bool {
        matches!(
            self,
            StoreError::ItemAlreadyExists { .. } | StoreError::ItemDoesNotExist { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_key() {
        let err = StoreError::ItemAlreadyExists {
            key: "TestRecord/qwerty".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("already exists"));
        assert!(msg.contains("TestRecord/qwerty"));
        assert!(err.is_existence_error());
    }

    #[test]
    fn test_backend_wraps_anyhow() {
        let err: StoreError = anyhow::anyhow!("disk full").into();
        assert!(matches!(err, StoreError::Backend(_)));
        assert!(err.to_string().contains("disk full"));
        assert!(!err.is_existence_error());
    }

    #[test]
    fn test_recovery_suggestions() {
        let missing = StoreError::ItemDoesNotExist { key: "a/b".into() };
        assert!(missing.recovery_suggestion().contains("update_or_insert"));
        let exists = StoreError::ItemAlreadyExists { key: "a/b".into() };
        assert!(exists.recovery_suggestion().contains("update"));
    }
}

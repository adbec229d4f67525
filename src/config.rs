//! # Configuration Management
//!
//! This module loads the settings that decide which backing store a store
//! runs on and how records are encoded. Configuration is read from TOML
//! files; every field is optional and falls back to `StoreConfig::default()`.
//!
//! ## Example Configuration File (store.toml)
//! ```toml
//! backend = "sled"          # "defaults", "memory" or "sled"
//! storage_path = "data"     # sled directory
//! suite = "com.example.app" # defaults suite; omit for the standard domain
//! codec = "json"            # "json", "cbor" or "bincode"
//! decode_policy = "lenient" # "lenient" or "strict"
//! ```

use anyhow::Result;
use config::{Config as ConfigLib, File, FileFormat};
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use crate::codec::{Codec, DecodePolicy};
use crate::engine::KvEngine;
use crate::store::{BackingStore, DefaultsStore, MemoryStore, SledStore};

/// Which backing store to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Process-wide defaults store
    #[default]
    Defaults,
    /// Private in-memory store, gone when the engine is dropped
    Memory,
    /// Persistent sled database at `storage_path`
    Sled,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "defaults" => Ok(Backend::Defaults),
            "memory" => Ok(Backend::Memory),
            "sled" => Ok(Backend::Sled),
            other => Err(format!(
                "unknown backend '{}' (available: defaults, memory, sled)",
                other
            )),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Backend::Defaults => "defaults",
            Backend::Memory => "memory",
            Backend::Sled => "sled",
        };
        f.write_str(name)
    }
}

/// Settings for opening a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: Backend,

    /// Directory of the sled database; ignored by the other backends
    pub storage_path: String,

    /// Defaults suite to open. `None` means the standard domain.
    pub suite: Option<String>,

    pub codec: Codec,

    pub decode_policy: DecodePolicy,
}

impl Default for StoreConfig {
    /// Standard defaults domain, JSON values, lenient decoding.
    fn default() -> Self {
        Self {
            backend: Backend::Defaults,
            storage_path: "data".to_string(),
            suite: None,
            codec: Codec::Json,
            decode_policy: DecodePolicy::Lenient,
        }
    }
}

impl StoreConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Result<StoreConfig>` - Parsed configuration or error if file is invalid
    pub fn load(path: &Path) -> Result<Self> {
        let settings = ConfigLib::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()?;

        let config: StoreConfig = settings.try_deserialize()?;
        Ok(config)
    }

    /// Open the configured backing store.
    pub fn open_backing(&self) -> Result<Arc<dyn BackingStore>> {
        let store: Arc<dyn BackingStore> = match self.backend {
            Backend::Defaults => match &self.suite {
                Some(name) => Arc::new(DefaultsStore::suite(name)),
                None => Arc::new(DefaultsStore::standard()),
            },
            Backend::Memory => Arc::new(MemoryStore::new()),
            Backend::Sled => Arc::new(SledStore::new(&self.storage_path)?),
        };
        info!(
            "Opened {} backing store (codec {}, {:?} decoding)",
            self.backend,
            self.codec.name(),
            self.decode_policy
        );
        Ok(store)
    }

    /// Open the configured backing store and wrap it in an engine.
    pub fn open_engine(&self) -> Result<KvEngine<Arc<dyn BackingStore>>> {
        Ok(KvEngine::new(self.open_backing()?)
            .with_codec(self.codec)
            .with_decode_policy(self.decode_policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_config_load() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file.as_file_mut(),
            r#"
backend = "sled"
storage_path = "records"
codec = "cbor"
decode_policy = "strict"
            "#
        )
        .unwrap();

        let config = StoreConfig::load(temp_file.path()).unwrap();
        assert_eq!(config.backend, Backend::Sled);
        assert_eq!(config.storage_path, "records");
        assert_eq!(config.suite, None);
        assert_eq!(config.codec, Codec::Cbor);
        assert_eq!(config.decode_policy, DecodePolicy::Strict);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file.as_file_mut(), r#"suite = "com.example.tests""#).unwrap();

        let config = StoreConfig::load(temp_file.path()).unwrap();
        assert_eq!(config.backend, Backend::Defaults);
        assert_eq!(config.suite.as_deref(), Some("com.example.tests"));
        assert_eq!(config.codec, Codec::Json);
        assert_eq!(config.storage_path, "data");
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file.as_file_mut(), r#"backend = "rocksdb""#).unwrap();
        assert!(StoreConfig::load(temp_file.path()).is_err());
        assert!("rocksdb".parse::<Backend>().is_err());
        assert_eq!("sled".parse::<Backend>().unwrap(), Backend::Sled);
    }

    #[test]
    fn test_open_engine_applies_settings() {
        let dir = tempdir().unwrap();
        let config = StoreConfig {
            backend: Backend::Sled,
            storage_path: dir.path().to_string_lossy().into_owned(),
            codec: Codec::Bincode,
            decode_policy: DecodePolicy::Strict,
            ..StoreConfig::default()
        };
        let engine = config.open_engine().unwrap();
        assert_eq!(engine.codec(), Codec::Bincode);
        assert_eq!(engine.decode_policy(), DecodePolicy::Strict);

        engine.backing().set("k", vec![1]).unwrap();
        assert_eq!(engine.backing().get("k").unwrap(), Some(vec![1]));
    }
}

//! # Record Codecs
//!
//! Records are turned into bytes before they reach a backing store. Three
//! encodings are available:
//!
//! - **JSON** (default): human-readable, what the persisted layout looks like
//!   unless configured otherwise.
//! - **CBOR**: compact and still self-describing.
//! - **Bincode**: most compact, not self-describing. Reading bincode data
//!   back requires the exact record type it was written with.
//!
//! Decoding never panics. What the engine does with a failed decode is
//! decided by [`DecodePolicy`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure while encoding or decoding a record.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cbor: {0}")]
    Cbor(#[from] serde_cbor::Error),
    #[error("bincode: {0}")]
    Bincode(#[from] bincode::Error),
}

/// Encoding used for stored record values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Codec {
    #[default]
    Json,
    Cbor,
    Bincode,
}

impl Codec {
    /// Serialize a record according to the selected codec.
    pub fn encode<T: Serialize>(self, record: &T) -> Result<Vec<u8>, CodecError> {
        let bytes = match self {
            Codec::Json => serde_json::to_vec(record)?,
            Codec::Cbor => serde_cbor::to_vec(record)?,
            Codec::Bincode => bincode::serialize(record)?,
        };
        Ok(bytes)
    }

    /// Deserialize a record according to the selected codec.
    pub fn decode<T: DeserializeOwned>(self, bytes: &[u8]) -> Result<T, CodecError> {
        let record = match self {
            Codec::Json => serde_json::from_slice(bytes)?,
            Codec::Cbor => serde_cbor::from_slice(bytes)?,
            Codec::Bincode => bincode::deserialize(bytes)?,
        };
        Ok(record)
    }

    /// Lowercase name, as used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Codec::Json => "json",
            Codec::Cbor => "cbor",
            Codec::Bincode => "bincode",
        }
    }
}

/// What `read` and `fetch_all_entries` do when stored bytes fail to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    /// Treat the entry as absent and log a warning.
    #[default]
    Lenient,
    /// Fail with `StoreError::CorruptData`.
    Strict,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        number: i64,
    }

    fn sample() -> Sample {
        Sample {
            name: "A name".to_string(),
            number: 64,
        }
    }

    #[test]
    fn each_codec_decodes_its_own_output() {
        for codec in [Codec::Json, Codec::Cbor, Codec::Bincode] {
            let bytes = codec.encode(&sample()).unwrap();
            let back: Sample = codec.decode(&bytes).unwrap();
            assert_eq!(back, sample(), "codec {}", codec.name());
        }
    }

    #[test]
    fn json_layout_is_plain_text() {
        let bytes = Codec::Json.encode(&sample()).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"name":"A name","number":64}"#
        );
    }

    #[test]
    fn garbage_is_rejected() {
        let garbage = b"\x00\x01\x02not-a-valid-payload";
        assert!(Codec::Json.decode::<Sample>(garbage).is_err());
        assert!(Codec::Cbor.decode::<Sample>(garbage).is_err());
        assert!(Codec::Bincode.decode::<Sample>(b"\x01").is_err());
    }

    #[test]
    fn defaults() {
        assert_eq!(Codec::default(), Codec::Json);
        assert_eq!(DecodePolicy::default(), DecodePolicy::Lenient);
    }
}

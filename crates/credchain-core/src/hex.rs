//! # Hex Utilities
//!
//! Lowercase hex encoding used for keys, signatures, and raw byte fields.
//! Kept in-crate (no external hex dependency) because the canonical payload
//! format depends on the exact output: lowercase, no prefix, no separators.

use serde::{Deserialize, Deserializer, Serializer};

use crate::error::CredchainError;

/// Render bytes as a lowercase hex string.
pub fn encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Decode a hex string (either case) into bytes.
pub fn decode(hex: &str) -> Result<Vec<u8>, CredchainError> {
    let hex = hex.trim();
    if hex.len() % 2 != 0 {
        return Err(CredchainError::HexDecode(
            "hex string must have even length".to_string(),
        ));
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            hex.get(i..i + 2)
                .filter(|pair| pair.bytes().all(|b| b.is_ascii_hexdigit()))
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| CredchainError::HexDecode(format!("invalid hex at position {i}")))
        })
        .collect()
}

/// Serde adapter for `Vec<u8>` fields carried as hex strings.
pub mod serde_bytes {
    use super::*;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        decode(&s).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for `Option<Vec<u8>>` fields carried as hex strings.
pub mod serde_opt_bytes {
    use super::*;

    pub fn serialize<S: Serializer>(
        bytes: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(b) => serializer.serialize_str(&encode(b)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        let s = Option::<String>::deserialize(deserializer)?;
        s.map(|s| decode(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

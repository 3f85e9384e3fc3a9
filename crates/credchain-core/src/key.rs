//! # Public Keys
//!
//! `PublicKey` identifies issuers, subjects, signers, and devices. It is
//! also the type of content-derived credential ids (a SHA-256 digest has the
//! same 32-byte shape).
//!
//! ## Serde
//!
//! Public keys serialize/deserialize as 64-character lowercase hex strings.
//! The canonical encoder uses the same hex form, so the wire form and the
//! signed form of a key never differ.

use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CredchainError;
use crate::hex;

/// Length in bytes of a public key.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// A 32-byte public key with a canonical lowercase hex form.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_LENGTH]);

impl PublicKey {
    /// Create a public key from raw 32 bytes.
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Create a public key from a byte slice, which must be exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CredchainError> {
        let arr: [u8; PUBLIC_KEY_LENGTH] = bytes.try_into().map_err(|_| {
            CredchainError::InvalidKey(format!(
                "expected {PUBLIC_KEY_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }

    /// Generate a random key. The result is not tied to any secret; use it
    /// for opaque identifiers (space keys, test fixtures).
    pub fn random() -> Self {
        let mut bytes = [0u8; PUBLIC_KEY_LENGTH];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Return the raw 32-byte key.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }

    /// Render the key as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Parse a key from a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, CredchainError> {
        let s = s.trim();
        if s.len() != PUBLIC_KEY_LENGTH * 2 {
            return Err(CredchainError::InvalidKey(format!(
                "public key hex must be {} chars, got {}",
                PUBLIC_KEY_LENGTH * 2,
                s.len()
            )));
        }
        let bytes = hex::decode(s).map_err(|e| CredchainError::InvalidKey(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Short form `abcd...wxyz`: first and last four hex characters.
    ///
    /// Timeframe payloads key their entries by this form, so the exact
    /// output is part of the signed byte format.
    pub fn truncate(&self) -> String {
        let hex = self.to_hex();
        format!("{}...{}", &hex[..4], &hex[hex.len() - 4..])
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl std::str::FromStr for PublicKey {
    type Err = CredchainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({})", self.truncate())
    }
}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

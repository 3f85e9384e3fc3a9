//! # Canonical Encoding — Signing Payload Bytes
//!
//! This module defines `CanonicalBytes`, the sole construction path for bytes
//! that are signed, verified, or hashed into a credential id.
//!
//! ## Security Invariant
//!
//! The `CanonicalBytes` newtype has a private inner field. The only way to
//! construct it is [`CanonicalBytes::new()`], which walks a
//! [`CanonicalValue`] tree and applies every encoding rule below before JCS
//! serialization. A signer and a verifier that both go through this function
//! cannot disagree about the payload.
//!
//! ## Encoding Rules
//!
//! Applied recursively:
//!
//! 1. **Sorted keys** — object members are emitted in lexicographic key order
//!    (RFC 8785), independent of insertion order.
//! 2. **Private fields dropped** — members whose key starts with `__` are
//!    local bookkeeping and never signed.
//! 3. **Type tag dropped** — the `@type` member is omitted, so envelope type
//!    metadata can vary without invalidating signatures.
//! 4. **Nulls dropped** — an object member whose value is `null` is treated
//!    as absent. `null` elements inside arrays are kept.
//! 5. **Keys and bytes as hex** — `PublicKey` and raw byte values encode as
//!    lowercase hex strings.
//! 6. **Timeframes truncated** — a `Timeframe` encodes as an object from
//!    `abcd...wxyz` (see [`PublicKey::truncate`]) to sequence number.
//! 7. **Scalars** — booleans, numbers, and strings encode as JSON.
//!
//! After the rules are applied, serialization uses `serde_jcs` for RFC 8785
//! output: sorted keys, compact separators, deterministic UTF-8 bytes.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::CanonicalizationError;
use crate::key::PublicKey;
use crate::temporal::Timestamp;
use crate::timeframe::Timeframe;
use crate::hex;

/// Prefix marking a member as private (never signed).
pub const PRIVATE_FIELD_PREFIX: &str = "__";

/// Member name of the type discriminator (never signed).
pub const TYPE_FIELD: &str = "@type";

/// Bytes produced exclusively by the canonical encoder.
///
/// # Invariants
///
/// - The only constructor is `CanonicalBytes::new()`.
/// - The bytes are a compact, key-sorted JSON document with every rule in
///   the module documentation applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Encode a value into canonical signing-payload bytes.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::SerializationFailed` if JCS
    /// serialization fails. The closed value model makes this unreachable
    /// for values built from this crate's types.
    pub fn new(obj: &impl Canonicalize) -> Result<Self, CanonicalizationError> {
        let encoded = encode_value(obj.canonical_value());
        let s = serde_jcs::to_string(&encoded)?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The payload as a string. Canonical bytes are always UTF-8 JSON.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// The closed set of value kinds a signing payload is built from.
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    /// Raw bytes; encoded as lowercase hex.
    Bytes(Vec<u8>),
    /// Encoded as lowercase hex.
    PublicKey(PublicKey),
    /// Encoded as a truncated-key map.
    Timeframe(Timeframe),
    Array(Vec<CanonicalValue>),
    Object(BTreeMap<String, CanonicalValue>),
}

impl CanonicalValue {
    /// Raw byte value.
    pub fn bytes(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

/// Conversion into the canonical value model.
///
/// Implemented by every type that appears inside a signing payload.
pub trait Canonicalize {
    fn canonical_value(&self) -> CanonicalValue;
}

/// Builder for `CanonicalValue::Object` payloads.
///
/// Members are stored as given; the exclusion rules are applied by the
/// encoder, not by the builder.
#[derive(Debug, Default)]
pub struct ObjectBuilder(BTreeMap<String, CanonicalValue>);

impl ObjectBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member from any canonicalizable value.
    pub fn field(mut self, name: &str, value: &(impl Canonicalize + ?Sized)) -> Self {
        self.0.insert(name.to_string(), value.canonical_value());
        self
    }

    /// Add a member from an already-built value.
    pub fn value(mut self, name: &str, value: CanonicalValue) -> Self {
        self.0.insert(name.to_string(), value);
        self
    }

    pub fn build(self) -> CanonicalValue {
        CanonicalValue::Object(self.0)
    }
}

/// Apply the encoding rules, producing a plain JSON tree for JCS.
fn encode_value(value: CanonicalValue) -> Value {
    match value {
        CanonicalValue::Null => Value::Null,
        CanonicalValue::Bool(b) => Value::Bool(b),
        CanonicalValue::Number(n) => Value::Number(n),
        CanonicalValue::String(s) => Value::String(s),
        CanonicalValue::Bytes(b) => Value::String(hex::encode(&b)),
        CanonicalValue::PublicKey(k) => Value::String(k.to_hex()),
        CanonicalValue::Timeframe(tf) => {
            let mut map = Map::new();
            for (key, seq) in tf.frames() {
                map.insert(key.truncate(), Value::from(seq));
            }
            Value::Object(map)
        }
        CanonicalValue::Array(items) => Value::Array(items.into_iter().map(encode_value).collect()),
        CanonicalValue::Object(members) => {
            let mut map = Map::new();
            for (key, member) in members {
                if is_excluded_member(&key, &member) {
                    continue;
                }
                map.insert(key, encode_value(member));
            }
            Value::Object(map)
        }
    }
}

fn is_excluded_member(key: &str, value: &CanonicalValue) -> bool {
    key.starts_with(PRIVATE_FIELD_PREFIX)
        || key == TYPE_FIELD
        || matches!(value, CanonicalValue::Null)
}

// ---------------------------------------------------------------------------
// Canonicalize impls
// ---------------------------------------------------------------------------

impl Canonicalize for CanonicalValue {
    fn canonical_value(&self) -> CanonicalValue {
        self.clone()
    }
}

impl<T: Canonicalize + ?Sized> Canonicalize for &T {
    fn canonical_value(&self) -> CanonicalValue {
        (**self).canonical_value()
    }
}

impl<T: Canonicalize> Canonicalize for Box<T> {
    fn canonical_value(&self) -> CanonicalValue {
        (**self).canonical_value()
    }
}

impl<T: Canonicalize> Canonicalize for Option<T> {
    fn canonical_value(&self) -> CanonicalValue {
        match self {
            Some(v) => v.canonical_value(),
            None => CanonicalValue::Null,
        }
    }
}

impl<T: Canonicalize> Canonicalize for [T] {
    fn canonical_value(&self) -> CanonicalValue {
        CanonicalValue::Array(self.iter().map(Canonicalize::canonical_value).collect())
    }
}

impl<T: Canonicalize> Canonicalize for Vec<T> {
    fn canonical_value(&self) -> CanonicalValue {
        self.as_slice().canonical_value()
    }
}

impl Canonicalize for bool {
    fn canonical_value(&self) -> CanonicalValue {
        CanonicalValue::Bool(*self)
    }
}

macro_rules! canonical_integer {
    ($($t:ty),*) => {
        $(
            impl Canonicalize for $t {
                fn canonical_value(&self) -> CanonicalValue {
                    CanonicalValue::Number(serde_json::Number::from(*self))
                }
            }
        )*
    };
}

// `u8` is deliberately absent: byte buffers must go through `CanonicalValue::Bytes`.
canonical_integer!(u16, u32, u64, i32, i64);

impl Canonicalize for str {
    fn canonical_value(&self) -> CanonicalValue {
        CanonicalValue::String(self.to_string())
    }
}

impl Canonicalize for String {
    fn canonical_value(&self) -> CanonicalValue {
        CanonicalValue::String(self.clone())
    }
}

impl Canonicalize for PublicKey {
    fn canonical_value(&self) -> CanonicalValue {
        CanonicalValue::PublicKey(*self)
    }
}

impl Canonicalize for Timeframe {
    fn canonical_value(&self) -> CanonicalValue {
        CanonicalValue::Timeframe(self.clone())
    }
}

impl Canonicalize for Timestamp {
    fn canonical_value(&self) -> CanonicalValue {
        CanonicalValue::String(self.to_iso8601())
    }
}

impl Canonicalize for Value {
    fn canonical_value(&self) -> CanonicalValue {
        match self {
            Value::Null => CanonicalValue::Null,
            Value::Bool(b) => CanonicalValue::Bool(*b),
            Value::Number(n) => CanonicalValue::Number(n.clone()),
            Value::String(s) => CanonicalValue::String(s.clone()),
            Value::Array(items) => {
                CanonicalValue::Array(items.iter().map(Canonicalize::canonical_value).collect())
            }
            Value::Object(map) => CanonicalValue::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.canonical_value()))
                    .collect(),
            ),
        }
    }
}

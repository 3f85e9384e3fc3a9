//! # Timeframe — Logical Clock Vector
//!
//! A `Timeframe` maps feed keys to the highest sequence number observed on
//! each feed. Epoch credentials carry one to pin the replicated state they
//! describe.
//!
//! ## Canonical Form
//!
//! Inside a signing payload a timeframe encodes as an object keyed by
//! [`PublicKey::truncate`] (`abcd...wxyz`) with the sequence number as value.
//! Signatures already issued over that form must keep verifying, so the
//! truncation is fixed. Two feeds whose keys share the first and last four
//! hex characters collapse into one payload entry (last writer wins in key
//! order); the full keys are still carried on the wire.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::key::PublicKey;

/// Feed key to sequence number, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timeframe(BTreeMap<PublicKey, u64>);

impl Timeframe {
    /// An empty timeframe.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `seq` for `key`, replacing any previous value.
    pub fn set(&mut self, key: PublicKey, seq: u64) {
        self.0.insert(key, seq);
    }

    /// Sequence number for `key`, if any.
    pub fn get(&self, key: &PublicKey) -> Option<u64> {
        self.0.get(key).copied()
    }

    /// Iterate `(key, seq)` pairs in key order.
    pub fn frames(&self) -> impl Iterator<Item = (&PublicKey, u64)> {
        self.0.iter().map(|(k, v)| (k, *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(PublicKey, u64)> for Timeframe {
    fn from_iter<I: IntoIterator<Item = (PublicKey, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites_sequence() {
        let a = PublicKey::from_bytes([1u8; 32]);
        let mut tf = Timeframe::new();
        tf.set(a, 5);
        tf.set(a, 3);
        assert_eq!(tf.get(&a), Some(3));
        assert_eq!(tf.len(), 1);
    }

    #[test]
    fn serde_is_hex_keyed_map() {
        let key = PublicKey::from_bytes([0xaa; 32]);
        let tf: Timeframe = [(key, 7)].into_iter().collect();
        let json = serde_json::to_value(&tf).unwrap();
        assert_eq!(json, serde_json::json!({ "aa".repeat(32): 7 }));
        let back: Timeframe = serde_json::from_value(json).unwrap();
        assert_eq!(back, tf);
    }
}

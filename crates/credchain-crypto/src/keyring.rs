//! # In-Memory Keyring
//!
//! Holds Ed25519 signing keys indexed by public key and implements both
//! [`Signer`] and [`SignatureVerifier`], so one keyring can be handed to a
//! credential factory and a verifier alike.
//!
//! Secret keys are zeroized on drop (`ed25519-dalek`'s `zeroize` feature) and
//! are never printed: `Debug` lists public keys only.

use std::collections::HashMap;

use async_trait::async_trait;
use credchain_core::{CanonicalBytes, PublicKey};
use ed25519_dalek::{Signer as _, SigningKey};
use parking_lot::RwLock;

use crate::ed25519::{public_key_of, verify_ed25519};
use crate::error::CryptoError;
use crate::signer::{SignatureVerifier, Signer};

/// Thread-safe map from public key to signing key.
#[derive(Default)]
pub struct Keyring {
    keys: RwLock<HashMap<PublicKey, SigningKey>>,
}

impl Keyring {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a fresh key, store it, and return its public key.
    pub fn create_key(&self) -> PublicKey {
        let signing_key = SigningKey::generate(&mut rand::rngs::OsRng);
        self.insert(signing_key)
    }

    /// Import a key from its 32-byte seed. Importing the same seed twice is
    /// a no-op that returns the same public key.
    pub fn import_seed(&self, seed: &[u8; 32]) -> PublicKey {
        self.insert(SigningKey::from_bytes(seed))
    }

    /// Store an existing signing key.
    pub fn insert(&self, signing_key: SigningKey) -> PublicKey {
        let public_key = public_key_of(&signing_key);
        self.keys.write().insert(public_key, signing_key);
        tracing::debug!(key = %public_key.truncate(), "key added to keyring");
        public_key
    }

    /// Whether the secret half of `public_key` is held.
    pub fn has_key(&self, public_key: &PublicKey) -> bool {
        self.keys.read().contains_key(public_key)
    }

    /// All held public keys, sorted.
    pub fn public_keys(&self) -> Vec<PublicKey> {
        let mut keys: Vec<PublicKey> = self.keys.read().keys().copied().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.keys.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.read().is_empty()
    }

    fn sign_sync(
        &self,
        signing_key: &PublicKey,
        message: &CanonicalBytes,
    ) -> Result<Vec<u8>, CryptoError> {
        let keys = self.keys.read();
        let key = keys
            .get(signing_key)
            .ok_or(CryptoError::UnknownKey(*signing_key))?;
        Ok(key.sign(message.as_bytes()).to_bytes().to_vec())
    }
}

impl std::fmt::Debug for Keyring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keyring")
            .field("public_keys", &self.public_keys())
            .finish()
    }
}

#[async_trait]
impl Signer for Keyring {
    async fn sign(
        &self,
        signing_key: &PublicKey,
        message: &CanonicalBytes,
    ) -> Result<Vec<u8>, CryptoError> {
        self.sign_sync(signing_key, message)
    }
}

/// Verification does not require the key to be held.
#[async_trait]
impl SignatureVerifier for Keyring {
    async fn verify(
        &self,
        public_key: &PublicKey,
        message: &CanonicalBytes,
        signature: &[u8],
    ) -> bool {
        verify_ed25519(public_key, message, signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> CanonicalBytes {
        CanonicalBytes::new(&serde_json::json!({"subject": "x", "n": 1})).unwrap()
    }

    #[tokio::test]
    async fn created_key_signs_and_verifies() {
        let keyring = Keyring::new();
        let key = keyring.create_key();
        assert!(keyring.has_key(&key));

        let sig = keyring.sign(&key, &payload()).await.unwrap();
        assert_eq!(sig.len(), 64);
        assert!(keyring.verify(&key, &payload(), &sig).await);
    }

    #[tokio::test]
    async fn unknown_key_is_an_error() {
        let keyring = Keyring::new();
        let stranger = PublicKey::random();
        let err = keyring.sign(&stranger, &payload()).await.unwrap_err();
        assert!(matches!(err, CryptoError::UnknownKey(k) if k == stranger));
    }

    #[tokio::test]
    async fn verifies_signatures_from_other_keyrings() {
        let alice = Keyring::new();
        let bob = Keyring::new();
        let key = alice.create_key();
        let sig = alice.sign(&key, &payload()).await.unwrap();
        assert!(!bob.has_key(&key));
        assert!(bob.verify(&key, &payload(), &sig).await);
    }

    #[test]
    fn import_seed_is_deterministic() {
        let keyring = Keyring::new();
        let first = keyring.import_seed(&[5u8; 32]);
        let second = keyring.import_seed(&[5u8; 32]);
        assert_eq!(first, second);
        assert_eq!(keyring.len(), 1);
    }

    #[test]
    fn public_keys_are_sorted() {
        let keyring = Keyring::new();
        for _ in 0..5 {
            keyring.create_key();
        }
        let keys = keyring.public_keys();
        assert_eq!(keys.len(), 5);
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn debug_lists_public_keys_only() {
        let keyring = Keyring::new();
        let key = keyring.import_seed(&[1u8; 32]);
        let debug = format!("{keyring:?}");
        assert!(debug.contains(&key.truncate()));
        assert!(!debug.contains(&"01".repeat(32)));
    }
}

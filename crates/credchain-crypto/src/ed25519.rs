//! # Ed25519 Verification
//!
//! ## Security Invariant
//!
//! - The message parameter is `&CanonicalBytes`, so only canonicalized
//!   payloads can be verified.
//! - Verification is strict (`verify_strict`): small-order keys and
//!   non-canonical signature encodings are rejected.
//! - A key that is not a valid curve point, or a signature that is not
//!   exactly 64 bytes, verifies as `false` rather than erroring.

use async_trait::async_trait;
use credchain_core::{CanonicalBytes, PublicKey};
use ed25519_dalek::{Signature, SigningKey, VerifyingKey};

use crate::signer::SignatureVerifier;

/// Length in bytes of an Ed25519 signature.
pub const SIGNATURE_LENGTH: usize = ed25519_dalek::SIGNATURE_LENGTH;

/// Stateless Ed25519 [`SignatureVerifier`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl Ed25519Verifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SignatureVerifier for Ed25519Verifier {
    async fn verify(
        &self,
        public_key: &PublicKey,
        message: &CanonicalBytes,
        signature: &[u8],
    ) -> bool {
        verify_ed25519(public_key, message, signature)
    }
}

/// Verify an Ed25519 signature over canonical bytes.
pub fn verify_ed25519(public_key: &PublicKey, message: &CanonicalBytes, signature: &[u8]) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(public_key.as_bytes()) else {
        return false;
    };
    let Ok(signature) = Signature::from_slice(signature) else {
        return false;
    };
    verifying_key
        .verify_strict(message.as_bytes(), &signature)
        .is_ok()
}

/// The public half of a signing key, as a credchain key.
pub fn public_key_of(signing_key: &SigningKey) -> PublicKey {
    PublicKey::from_bytes(signing_key.verifying_key().to_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::Signer as _;

    fn message(value: serde_json::Value) -> CanonicalBytes {
        CanonicalBytes::new(&value).unwrap()
    }

    fn sign(key: &SigningKey, msg: &CanonicalBytes) -> Vec<u8> {
        key.sign(msg.as_bytes()).to_bytes().to_vec()
    }

    #[test]
    fn valid_signature_verifies() {
        let key = SigningKey::from_bytes(&[7u8; 32]);
        let msg = message(serde_json::json!({"hello": "world"}));
        let sig = sign(&key, &msg);
        assert_eq!(sig.len(), SIGNATURE_LENGTH);
        assert!(verify_ed25519(&public_key_of(&key), &msg, &sig));
    }

    #[test]
    fn wrong_key_fails() {
        let key = SigningKey::from_bytes(&[7u8; 32]);
        let other = SigningKey::from_bytes(&[8u8; 32]);
        let msg = message(serde_json::json!({"a": 1}));
        let sig = sign(&key, &msg);
        assert!(!verify_ed25519(&public_key_of(&other), &msg, &sig));
    }

    #[test]
    fn wrong_message_fails() {
        let key = SigningKey::from_bytes(&[7u8; 32]);
        let sig = sign(&key, &message(serde_json::json!({"msg": "original"})));
        let tampered = message(serde_json::json!({"msg": "tampered"}));
        assert!(!verify_ed25519(&public_key_of(&key), &tampered, &sig));
    }

    #[test]
    fn flipped_signature_byte_fails() {
        let key = SigningKey::from_bytes(&[9u8; 32]);
        let msg = message(serde_json::json!({"n": 42}));
        let mut sig = sign(&key, &msg);
        sig[0] ^= 0x01;
        assert!(!verify_ed25519(&public_key_of(&key), &msg, &sig));
    }

    #[test]
    fn malformed_inputs_are_false_not_errors() {
        let key = SigningKey::from_bytes(&[9u8; 32]);
        let msg = message(serde_json::json!({}));
        let sig = sign(&key, &msg);
        assert!(!verify_ed25519(&public_key_of(&key), &msg, &sig[..63]));
        assert!(!verify_ed25519(&public_key_of(&key), &msg, &[]));
        let bogus = PublicKey::from_bytes([0xff; 32]);
        assert!(!verify_ed25519(&bogus, &msg, &sig));
    }

    #[tokio::test]
    async fn trait_object_delegates() {
        let key = SigningKey::from_bytes(&[3u8; 32]);
        let msg = message(serde_json::json!({"x": true}));
        let sig = sign(&key, &msg);
        let verifier: std::sync::Arc<dyn SignatureVerifier> = std::sync::Arc::new(Ed25519Verifier);
        assert!(verifier.verify(&public_key_of(&key), &msg, &sig).await);
    }
}

//! # Signer and Verifier Traits
//!
//! The signing primitive is injected into the credential factory and
//! verifiers as trait objects at construction; there is no global signer.
//! Both methods are async because a signer may sit behind a network or
//! hardware boundary. Cancellation and retries are the caller's concern.

use std::sync::Arc;

use async_trait::async_trait;
use credchain_core::{CanonicalBytes, PublicKey};

use crate::error::CryptoError;

/// Produces signatures for keys whose secret half it controls.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Sign `message` with the secret key matching `signing_key`.
    ///
    /// # Errors
    ///
    /// `CryptoError::UnknownKey` if the signer does not hold that key; any
    /// backend failure otherwise.
    async fn sign(
        &self,
        signing_key: &PublicKey,
        message: &CanonicalBytes,
    ) -> Result<Vec<u8>, CryptoError>;
}

/// Checks signatures against public keys.
///
/// Total: malformed keys or signatures yield `false`, never an error.
#[async_trait]
pub trait SignatureVerifier: Send + Sync {
    async fn verify(&self, public_key: &PublicKey, message: &CanonicalBytes, signature: &[u8])
        -> bool;
}

#[async_trait]
impl<T: Signer + ?Sized> Signer for Arc<T> {
    async fn sign(
        &self,
        signing_key: &PublicKey,
        message: &CanonicalBytes,
    ) -> Result<Vec<u8>, CryptoError> {
        (**self).sign(signing_key, message).await
    }
}

#[async_trait]
impl<T: SignatureVerifier + ?Sized> SignatureVerifier for Arc<T> {
    async fn verify(
        &self,
        public_key: &PublicKey,
        message: &CanonicalBytes,
        signature: &[u8],
    ) -> bool {
        (**self).verify(public_key, message, signature).await
    }
}

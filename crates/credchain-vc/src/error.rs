//! # Credential Errors
//!
//! Raised only at creation time. Verification failures are reported as
//! [`VerificationResult::Fail`](crate::VerificationResult) instead.

use credchain_core::CanonicalizationError;
use credchain_crypto::CryptoError;
use thiserror::Error;

/// Errors from credential and presentation creation.
#[derive(Error, Debug)]
pub enum CredentialError {
    /// The assertion is malformed or its kind tag is not recognized.
    #[error("invalid assertion: {0}")]
    InvalidAssertion(String),

    /// The signing key and chain do not agree with the issuer, or the
    /// supplied chain does not verify.
    #[error("chain consistency: {0}")]
    ChainConsistency(String),

    /// Encoding the signing payload failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// The injected signer failed.
    #[error("signing failed: {0}")]
    Signing(#[from] CryptoError),
}

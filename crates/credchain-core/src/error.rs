//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types shared by the credchain crates. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! Verification never surfaces these as errors; verifiers fold them into a
//! failed result. They are returned from construction paths (parsing keys,
//! timestamps, encoding payloads) where the caller must decide what to do.

use thiserror::Error;

/// Top-level error type for the core crate.
#[derive(Error, Debug)]
pub enum CredchainError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// A public key could not be parsed.
    #[error("invalid public key: {0}")]
    InvalidKey(String),

    /// A hex string could not be decoded.
    #[error("hex decode error: {0}")]
    HexDecode(String),

    /// A timestamp was malformed or not UTC.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// JCS serialization of the encoded tree failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

//! # credchain-core — Foundational Types for Credential Trust Chains
//!
//! This crate is the leaf of the credchain workspace. It defines the types
//! every signer and verifier must agree on byte-for-byte.
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` newtype.** ALL signing payloads flow through
//!    `CanonicalBytes::new()`. No raw `serde_json::to_vec()` for anything that
//!    gets signed or hashed. Signer and verifier cannot drift apart because
//!    there is exactly one encoder.
//!
//! 2. **Closed value model.** The encoder walks a [`CanonicalValue`] tree
//!    built by explicit [`Canonicalize`] impls. There is no reflection; the
//!    exclusion and encoding rules live in one function.
//!
//! 3. **`PublicKey` newtype.** Keys are 32 raw bytes with a lowercase hex
//!    form used on the wire, in payloads, and in logs.
//!
//! 4. **UTC-only timestamps.** `Timestamp` is UTC with second precision and a
//!    `Z` suffix so the same instant always encodes to the same bytes.
//!
//! 5. **`sha256_digest()` accepts only `&CanonicalBytes`.** Content-derived
//!    identifiers are computed over canonical payloads, never over ad hoc
//!    serializations.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `credchain-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod hex;
pub mod key;
pub mod temporal;
pub mod timeframe;

// Re-export primary types for ergonomic imports.
pub use canonical::{CanonicalBytes, CanonicalValue, Canonicalize, ObjectBuilder};
pub use digest::{sha256_digest, ContentDigest, DigestAlgorithm};
pub use error::{CanonicalizationError, CredchainError};
pub use key::{PublicKey, PUBLIC_KEY_LENGTH};
pub use temporal::Timestamp;
pub use timeframe::Timeframe;

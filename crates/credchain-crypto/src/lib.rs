//! # credchain-crypto — Signing Collaborators
//!
//! The credential layer never touches key material directly. It consumes two
//! narrow capabilities defined here:
//!
//! - [`Signer`] produces a signature for a public key whose secret half it
//!   holds (a keyring, an HSM, a remote agent).
//! - [`SignatureVerifier`] checks a signature against a public key.
//!
//! Both take `&CanonicalBytes` as the message, so nothing that bypassed the
//! canonical encoder can be signed or verified.
//!
//! Concrete implementations:
//!
//! - [`Ed25519Verifier`] — strict Ed25519 verification.
//! - [`Keyring`] — in-memory Ed25519 key store implementing both traits.
//! - [`seed`] — hex seed files and environment variables for the CLI.
//!
//! ## Crate Policy
//!
//! - Depends only on `credchain-core` internally.
//! - Tests sign and verify real `CanonicalBytes` with real Ed25519.
//! - Secret key bytes never appear in `Debug` output or logs.

pub mod ed25519;
pub mod error;
pub mod keyring;
pub mod seed;
pub mod signer;

pub use ed25519::Ed25519Verifier;
pub use error::CryptoError;
pub use keyring::Keyring;
pub use signer::{SignatureVerifier, Signer};

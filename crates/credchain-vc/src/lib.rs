//! # credchain-vc — Delegated Credentials
//!
//! Credentials are signed statements that an issuer asserts something about
//! a subject. A credential may be signed by a device key acting for the
//! issuer, in which case its proof carries a chain of `AuthorizedDevice`
//! credentials leading back to the issuer.
//!
//! - **Model** (`assertion.rs`, `proof.rs`, `credential.rs`,
//!   `presentation.rs`): the wire types and their signing payloads.
//! - **Factory** (`factory.rs`): builds, signs, and identifies credentials.
//! - **Verification** (`verifier.rs`, `chain.rs`): signature checks and
//!   recursive chain validation with an explicit depth bound.
//! - **Presentations** (`presentation.rs`): credential bundles with
//!   append-only co-signer proofs.
//!
//! ## Security Invariants
//!
//! - Signing payloads are built by `Canonicalize` impls and encoded through
//!   `CanonicalBytes::new()`. The payload excludes the credential id, the
//!   proof's own signature value (zeroed), and the proof chain.
//! - Credential ids are `sha256_digest()` of the signing payload.
//! - Verification is total: every check returns a [`VerificationResult`].
//!   Only creation returns errors.
//!
//! ## Crate Policy
//!
//! - Depends on `credchain-core` and `credchain-crypto` internally.
//! - Signing and verification primitives are injected as trait objects.

pub mod assertion;
pub mod chain;
pub mod config;
pub mod credential;
pub mod error;
pub mod factory;
pub mod presentation;
pub mod proof;
pub mod result;
pub mod verifier;

pub use assertion::{Assertion, AuthorizedDevice, Epoch, Role, SpaceMember};
pub use chain::is_valid_authorized_device_credential;
pub use config::VerifierConfig;
pub use credential::{Credential, CredentialSubject};
pub use error::CredentialError;
pub use factory::{CredentialFactory, CredentialParams, CredentialSigner};
pub use presentation::{Presentation, PresentationSigner, PresentationVerifier};
pub use proof::{Chain, Proof, ED25519_SIGNATURE};
pub use result::VerificationResult;
pub use verifier::CredentialVerifier;

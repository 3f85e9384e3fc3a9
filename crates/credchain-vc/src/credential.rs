//! # Credential
//!
//! ## Signing Payload
//!
//! [`Credential::signing_payload`] is the canonical encoding of:
//!
//! - `issuer`, `subject { id, assertion }`, `issuanceDate`;
//! - `proof` as a skeleton (signature zeroed, chain omitted);
//! - `parentCredentialIds`, only when non-empty.
//!
//! The credential `id` is never part of the payload; it is the SHA-256 of
//! the payload. An empty `parentCredentialIds` list and an absent one are
//! the same payload, on the signing and the verifying side alike.

use credchain_core::{
    sha256_digest, CanonicalBytes, Canonicalize, CanonicalValue, ObjectBuilder, PublicKey,
    Timestamp,
};
use serde::{Deserialize, Serialize};

use crate::assertion::Assertion;
use crate::error::CredentialError;
use crate::proof::Proof;

/// A signed statement by `issuer` about `subject.id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    /// Content-derived id; set by the factory after signing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PublicKey>,
    pub issuer: PublicKey,
    pub subject: CredentialSubject,
    pub issuance_date: Timestamp,
    pub proof: Proof,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parent_credential_ids: Vec<PublicKey>,
}

/// The subject key and what is asserted about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialSubject {
    pub id: PublicKey,
    pub assertion: Assertion,
}

impl Credential {
    /// The bytes covered by `proof.signature_value`.
    pub fn signing_payload(&self) -> Result<CanonicalBytes, CredentialError> {
        let payload = self
            .body()
            .value("proof", self.proof.skeleton())
            .build();
        Ok(CanonicalBytes::new(&payload)?)
    }

    /// The id this credential should carry: SHA-256 of its signing payload.
    pub fn compute_id(&self) -> Result<PublicKey, CredentialError> {
        Ok(sha256_digest(&self.signing_payload()?).to_public_key())
    }

    /// Shorthand for `subject.assertion.kind()`.
    pub fn kind(&self) -> &str {
        self.subject.assertion.kind()
    }

    /// Members shared by the signing payload and the full form.
    fn body(&self) -> ObjectBuilder {
        ObjectBuilder::new()
            .field("issuer", &self.issuer)
            .field("subject", &self.subject)
            .field("issuanceDate", &self.issuance_date)
            .value("parentCredentialIds", parent_ids(&self.parent_credential_ids))
    }
}

fn parent_ids(ids: &[PublicKey]) -> CanonicalValue {
    if ids.is_empty() {
        CanonicalValue::Null
    } else {
        ids.canonical_value()
    }
}

impl Canonicalize for CredentialSubject {
    fn canonical_value(&self) -> CanonicalValue {
        ObjectBuilder::new()
            .field("id", &self.id)
            .field("assertion", &self.assertion)
            .build()
    }
}

/// Full signed form, including `id`, the signature, and any chain. Used
/// when credentials are embedded in a presentation payload.
impl Canonicalize for Credential {
    fn canonical_value(&self) -> CanonicalValue {
        self.body()
            .field("id", &self.id)
            .field("proof", &self.proof)
            .build()
    }
}

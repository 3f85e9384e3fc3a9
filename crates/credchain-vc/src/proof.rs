//! # Proofs and Chains
//!
//! A [`Proof`] is the signature envelope on a credential or presentation. A
//! proof whose signer differs from the issuer carries a [`Chain`]: an
//! `AuthorizedDevice` credential proving the signer may act for the issuer.
//! That credential has its own proof, which may carry its own chain.
//!
//! ## Security Invariant
//!
//! A proof never signs itself. The signing payload uses
//! [`Proof::skeleton`], which zeroes `signatureValue` and omits `chain`.

use credchain_core::hex::{serde_bytes, serde_opt_bytes};
use credchain_core::{Canonicalize, CanonicalValue, ObjectBuilder, PublicKey, Timestamp};
use serde::{Deserialize, Serialize};

use crate::credential::Credential;

/// The signature algorithm produced by the factory and accepted by default.
pub const ED25519_SIGNATURE: &str = "ED25519Signature";

/// A signature envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    pub signature_algorithm: String,
    pub created_at: Timestamp,
    pub signer_public_key: PublicKey,
    /// Hex on the wire.
    #[serde(with = "serde_bytes")]
    pub signature_value: Vec<u8>,
    /// Hex on the wire.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_opt_bytes")]
    pub nonce: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain: Option<Chain>,
}

/// Delegation evidence: one `AuthorizedDevice` credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    pub credential: Box<Credential>,
}

impl Chain {
    pub fn new(credential: Credential) -> Self {
        Self {
            credential: Box::new(credential),
        }
    }

    /// Number of links, counting this one.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut next = self.credential.proof.chain.as_ref();
        while let Some(chain) = next {
            depth += 1;
            next = chain.credential.proof.chain.as_ref();
        }
        depth
    }
}

impl Proof {
    /// An unsigned Ed25519 proof.
    pub fn unsigned(signer_public_key: PublicKey, created_at: Timestamp) -> Self {
        Self {
            signature_algorithm: ED25519_SIGNATURE.to_string(),
            created_at,
            signer_public_key,
            signature_value: Vec::new(),
            nonce: None,
            chain: None,
        }
    }

    /// The proof as it appears inside its own signing payload.
    pub fn skeleton(&self) -> CanonicalValue {
        self.members(&[]).build()
    }

    fn members(&self, signature_value: &[u8]) -> ObjectBuilder {
        ObjectBuilder::new()
            .field("signatureAlgorithm", &self.signature_algorithm)
            .field("createdAt", &self.created_at)
            .field("signerPublicKey", &self.signer_public_key)
            .value("signatureValue", CanonicalValue::bytes(signature_value))
            .value(
                "nonce",
                self.nonce
                    .as_deref()
                    .map_or(CanonicalValue::Null, CanonicalValue::bytes),
            )
    }
}

/// Full form, used when a signed credential is embedded in a larger payload.
impl Canonicalize for Proof {
    fn canonical_value(&self) -> CanonicalValue {
        self.members(&self.signature_value)
            .field("chain", &self.chain)
            .build()
    }
}

impl Canonicalize for Chain {
    fn canonical_value(&self) -> CanonicalValue {
        ObjectBuilder::new()
            .field("credential", &self.credential)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credchain_core::CanonicalBytes;

    fn proof() -> Proof {
        let mut proof = Proof::unsigned(
            PublicKey::from_bytes([1; 32]),
            Timestamp::parse("2026-01-15T12:00:00Z").unwrap(),
        );
        proof.signature_value = vec![0xde, 0xad];
        proof
    }

    #[test]
    fn skeleton_zeroes_signature() {
        let cb = CanonicalBytes::new(&proof().skeleton()).unwrap();
        assert_eq!(
            cb.as_str(),
            format!(
                r#"{{"createdAt":"2026-01-15T12:00:00Z","signatureAlgorithm":"ED25519Signature","signatureValue":"","signerPublicKey":"{}"}}"#,
                "01".repeat(32)
            )
        );
    }

    #[test]
    fn skeleton_includes_nonce() {
        let mut p = proof();
        p.nonce = Some(vec![0x0a, 0xbc]);
        let cb = CanonicalBytes::new(&p.skeleton()).unwrap();
        assert!(cb.as_str().contains(r#""nonce":"0abc""#));
    }

    #[test]
    fn full_form_includes_signature() {
        let cb = CanonicalBytes::new(&proof()).unwrap();
        assert!(cb.as_str().contains(r#""signatureValue":"dead""#));
        assert!(!cb.as_str().contains("chain"));
    }

    #[test]
    fn wire_form_is_camel_case_hex() {
        let mut p = proof();
        p.nonce = Some(vec![1, 2]);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["signatureAlgorithm"], "ED25519Signature");
        assert_eq!(json["createdAt"], "2026-01-15T12:00:00Z");
        assert_eq!(json["signatureValue"], "dead");
        assert_eq!(json["nonce"], "0102");
        assert!(json.get("chain").is_none());
        let back: Proof = serde_json::from_value(json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn absent_nonce_deserializes_as_none() {
        let mut json = serde_json::to_value(proof()).unwrap();
        json.as_object_mut().unwrap().remove("nonce");
        let back: Proof = serde_json::from_value(json).unwrap();
        assert!(back.nonce.is_none());
    }
}

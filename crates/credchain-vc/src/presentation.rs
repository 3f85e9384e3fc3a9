//! # Presentations
//!
//! A presentation bundles credentials with one or more top-level proofs.
//! Proofs are appended, never replaced, so several parties can co-sign the
//! same bundle over time.
//!
//! ## Signing Payload
//!
//! Each proof signs `{credentials, proof}` where `credentials` is the full
//! signed form of every credential (empty `parentCredentialIds` dropped)
//! and `proof` is that proof's skeleton. Other proofs are not covered.
//!
//! ## Proof Semantics
//!
//! A presentation proof says "this signer may act for the subject of every
//! credential it accompanies". For each credential whose issuer is not the
//! proof signer, the proof's chain must verify with the credential's
//! *subject* as authority and the proof signer as subject.

use std::sync::Arc;

use credchain_core::{CanonicalBytes, ObjectBuilder, PublicKey, Timestamp};
use credchain_crypto::Signer;
use serde::{Deserialize, Serialize};

use crate::credential::Credential;
use crate::error::CredentialError;
use crate::proof::{Chain, Proof};
use crate::result::VerificationResult;
use crate::verifier::CredentialVerifier;

/// Credentials plus co-signer proofs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    pub credentials: Vec<Credential>,
    #[serde(default)]
    pub proofs: Vec<Proof>,
}

impl Presentation {
    /// An unsigned presentation.
    pub fn new(credentials: Vec<Credential>) -> Self {
        Self {
            credentials,
            proofs: Vec::new(),
        }
    }

    /// The bytes covered by `proof.signature_value`.
    pub fn signing_payload(&self, proof: &Proof) -> Result<CanonicalBytes, CredentialError> {
        let payload = ObjectBuilder::new()
            .field("credentials", &self.credentials)
            .value("proof", proof.skeleton())
            .build();
        Ok(CanonicalBytes::new(&payload)?)
    }
}

/// Appends proofs to presentations.
#[derive(Clone)]
pub struct PresentationSigner {
    signer: Arc<dyn Signer>,
}

impl PresentationSigner {
    pub fn new(signer: Arc<dyn Signer>) -> Self {
        Self { signer }
    }

    /// Sign `presentation` with `signer_key` and append the proof.
    ///
    /// `chain` is required by verifiers when `signer_key` is not the issuer
    /// of every credential; `nonce` answers a verifier's challenge.
    pub async fn sign_presentation(
        &self,
        mut presentation: Presentation,
        signer_key: PublicKey,
        chain: Option<Chain>,
        nonce: Option<Vec<u8>>,
    ) -> Result<Presentation, CredentialError> {
        let mut proof = Proof::unsigned(signer_key, Timestamp::now());
        proof.nonce = nonce;

        let payload = presentation.signing_payload(&proof)?;
        proof.signature_value = self.signer.sign(&signer_key, &payload).await?;
        proof.chain = chain;

        tracing::debug!(
            signer = %signer_key.truncate(),
            credentials = presentation.credentials.len(),
            proofs = presentation.proofs.len() + 1,
            "presentation signed"
        );
        presentation.proofs.push(proof);
        Ok(presentation)
    }
}

impl std::fmt::Debug for PresentationSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresentationSigner").finish_non_exhaustive()
    }
}

/// Verifies presentations, aggregating every error found.
#[derive(Debug, Clone)]
pub struct PresentationVerifier {
    credentials: CredentialVerifier,
}

impl PresentationVerifier {
    pub fn new(credentials: CredentialVerifier) -> Self {
        Self { credentials }
    }

    pub async fn verify_presentation(&self, presentation: &Presentation) -> VerificationResult {
        let mut errors = Vec::new();

        for (i, credential) in presentation.credentials.iter().enumerate() {
            let result = self.credentials.verify_credential(credential).await;
            errors.extend(result.context(&format!("credential {i}")).errors().iter().cloned());
        }

        for (j, proof) in presentation.proofs.iter().enumerate() {
            let context = format!("proof {j}");
            for credential in &presentation.credentials {
                if credential.issuer == proof.signer_public_key {
                    continue;
                }
                let authority = &credential.subject.id;
                match &proof.chain {
                    None => errors.push(format!(
                        "{context}: missing credential chain from subject {authority} to signer {}",
                        proof.signer_public_key
                    )),
                    Some(chain) => {
                        let result = self
                            .credentials
                            .verify_chain(chain, authority, &proof.signer_public_key)
                            .await;
                        errors.extend(result.context(&context).errors().iter().cloned());
                    }
                }
            }
            let result = self.verify_proof_signature(presentation, proof).await;
            errors.extend(result.context(&context).errors().iter().cloned());
        }

        let result = VerificationResult::from_errors(errors);
        if !result.is_pass() {
            tracing::debug!(
                credentials = presentation.credentials.len(),
                proofs = presentation.proofs.len(),
                errors = ?result.errors(),
                "presentation verification failed"
            );
        }
        result
    }

    /// [`verify_presentation`](Self::verify_presentation) plus a challenge
    /// check: there must be at least one proof and every proof must carry
    /// exactly `nonce`.
    pub async fn verify_presentation_with_nonce(
        &self,
        presentation: &Presentation,
        nonce: &[u8],
    ) -> VerificationResult {
        let mut errors = Vec::new();
        if presentation.proofs.is_empty() {
            errors.push("presentation has no proofs to answer the challenge".to_string());
        }
        for (j, proof) in presentation.proofs.iter().enumerate() {
            if proof.nonce.as_deref() != Some(nonce) {
                errors.push(format!("proof {j}: nonce does not match challenge"));
            }
        }
        let result = self.verify_presentation(presentation).await;
        errors.extend(result.errors().iter().cloned());
        VerificationResult::from_errors(errors)
    }

    async fn verify_proof_signature(
        &self,
        presentation: &Presentation,
        proof: &Proof,
    ) -> VerificationResult {
        if !self.credentials.config.accepts(&proof.signature_algorithm) {
            return VerificationResult::fail(format!(
                "unsupported signature algorithm {:?}",
                proof.signature_algorithm
            ));
        }
        let payload = match presentation.signing_payload(proof) {
            Ok(payload) => payload,
            Err(e) => return VerificationResult::fail(e.to_string()),
        };
        if self
            .credentials
            .verifier
            .verify(&proof.signer_public_key, &payload, &proof.signature_value)
            .await
        {
            VerificationResult::Pass
        } else {
            VerificationResult::fail(format!(
                "invalid presentation signature by {}",
                proof.signer_public_key
            ))
        }
    }
}

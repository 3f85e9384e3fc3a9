//! # Credential Verifier
//!
//! `verify_credential` checks, in order:
//!
//! 1. The assertion passes [`Assertion::validate`], the same check the
//!    factory applies before signing.
//! 2. If the proof signer is not the issuer, the proof must carry a chain
//!    that verifies with `authority = issuer` and `subject = signer`
//!    (see [`chain`](crate::chain)).
//! 3. The proof's signature algorithm is accepted and the signature verifies
//!    over the credential's signing payload.
//!
//! A single credential reports the first failure only.
//!
//! [`Assertion::validate`]: crate::Assertion::validate

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use credchain_crypto::SignatureVerifier;

use crate::config::VerifierConfig;
use crate::credential::Credential;
use crate::result::VerificationResult;

pub(crate) type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Verifies credentials and delegation chains.
///
/// Cheap to clone; the signature primitive is shared.
#[derive(Clone)]
pub struct CredentialVerifier {
    pub(crate) verifier: Arc<dyn SignatureVerifier>,
    pub(crate) config: VerifierConfig,
}

impl CredentialVerifier {
    /// A verifier with the default configuration.
    pub fn new(verifier: Arc<dyn SignatureVerifier>) -> Self {
        Self::with_config(verifier, VerifierConfig::default())
    }

    pub fn with_config(verifier: Arc<dyn SignatureVerifier>, config: VerifierConfig) -> Self {
        Self { verifier, config }
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Verify a credential, including its chain when delegated.
    pub async fn verify_credential(&self, credential: &Credential) -> VerificationResult {
        let result = self.verify_at_depth(credential, 0).await;
        if !result.is_pass() {
            tracing::debug!(
                issuer = %credential.issuer.truncate(),
                kind = credential.kind(),
                errors = ?result.errors(),
                "credential verification failed"
            );
        }
        result
    }

    /// Signature-only check; no chain semantics. For callers that already
    /// trust the signer out of band.
    pub async fn verify_credential_signature(&self, credential: &Credential) -> VerificationResult {
        let proof = &credential.proof;
        if !self.config.accepts(&proof.signature_algorithm) {
            return VerificationResult::fail(format!(
                "unsupported signature algorithm {:?}",
                proof.signature_algorithm
            ));
        }
        let payload = match credential.signing_payload() {
            Ok(payload) => payload,
            Err(e) => return VerificationResult::fail(e.to_string()),
        };
        if self
            .verifier
            .verify(&proof.signer_public_key, &payload, &proof.signature_value)
            .await
        {
            VerificationResult::Pass
        } else {
            VerificationResult::fail(format!(
                "invalid signature by {} for issuer {}",
                proof.signer_public_key, credential.issuer
            ))
        }
    }

    /// `depth` is the number of chain links above `credential`.
    pub(crate) fn verify_at_depth<'a>(
        &'a self,
        credential: &'a Credential,
        depth: usize,
    ) -> BoxFuture<'a, VerificationResult> {
        Box::pin(async move {
            if let Err(e) = credential.subject.assertion.validate() {
                return VerificationResult::fail(e.to_string());
            }
            let issuer = &credential.issuer;
            let signer = &credential.proof.signer_public_key;
            if issuer != signer {
                let Some(chain) = &credential.proof.chain else {
                    return VerificationResult::fail(format!(
                        "missing credential chain: signer {signer} is not issuer {issuer}"
                    ));
                };
                let result = self.verify_chain_at_depth(chain, issuer, signer, depth + 1).await;
                if !result.is_pass() {
                    return result;
                }
            }
            self.verify_credential_signature(credential).await
        })
    }
}

impl std::fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialVerifier")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

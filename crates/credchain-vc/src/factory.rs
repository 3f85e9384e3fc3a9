//! # Credential Factory
//!
//! Builds a credential skeleton, signs its canonical payload through the
//! injected [`Signer`], attaches the chain, and assigns the content id.
//!
//! ## Signing Key and Chain
//!
//! | `signing_key` | `chain` | Outcome |
//! |---|---|---|
//! | absent | absent | signed by the issuer |
//! | differs from issuer | present | chain verified first, then signed by the device key |
//! | anything else | | `ChainConsistency` |
//!
//! A credential whose chain does not verify is never emitted.

use std::sync::Arc;

use credchain_core::{sha256_digest, PublicKey, Timestamp};
use credchain_crypto::Signer;

use crate::assertion::Assertion;
use crate::credential::{Credential, CredentialSubject};
use crate::error::CredentialError;
use crate::proof::{Chain, Proof};
use crate::result::VerificationResult;
use crate::verifier::CredentialVerifier;

/// Inputs to [`CredentialFactory::create_credential`].
#[derive(Debug, Clone)]
pub struct CredentialParams {
    pub issuer: PublicKey,
    pub subject: PublicKey,
    pub assertion: Assertion,
    /// Device key that signs instead of the issuer. Requires `chain`.
    pub signing_key: Option<PublicKey>,
    /// Proof that `signing_key` may act for `issuer`.
    pub chain: Option<Chain>,
    pub nonce: Option<Vec<u8>>,
    pub parent_credential_ids: Vec<PublicKey>,
    /// Issuance time; now when unset.
    pub issued_at: Option<Timestamp>,
}

impl CredentialParams {
    pub fn new(issuer: PublicKey, subject: PublicKey, assertion: impl Into<Assertion>) -> Self {
        Self {
            issuer,
            subject,
            assertion: assertion.into(),
            signing_key: None,
            chain: None,
            nonce: None,
            parent_credential_ids: Vec::new(),
            issued_at: None,
        }
    }

    /// Sign with a device key authorized by `chain`.
    pub fn signing_key(mut self, signing_key: PublicKey, chain: Chain) -> Self {
        self.signing_key = Some(signing_key);
        self.chain = Some(chain);
        self
    }

    pub fn nonce(mut self, nonce: impl Into<Vec<u8>>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    pub fn parent_credential_ids(mut self, ids: Vec<PublicKey>) -> Self {
        self.parent_credential_ids = ids;
        self
    }

    pub fn issued_at(mut self, issued_at: Timestamp) -> Self {
        self.issued_at = Some(issued_at);
        self
    }
}

/// Creates signed credentials.
#[derive(Clone)]
pub struct CredentialFactory {
    signer: Arc<dyn Signer>,
    verifier: CredentialVerifier,
}

impl CredentialFactory {
    /// `verifier` pre-validates chains before anything is signed.
    pub fn new(signer: Arc<dyn Signer>, verifier: CredentialVerifier) -> Self {
        Self { signer, verifier }
    }

    pub fn verifier(&self) -> &CredentialVerifier {
        &self.verifier
    }

    /// Build, sign, and identify a credential.
    ///
    /// # Errors
    ///
    /// - `InvalidAssertion` if the assertion kind is unusable.
    /// - `ChainConsistency` if `signing_key` and `chain` disagree with the
    ///   issuer, or the chain does not verify.
    /// - `Signing` if the signer fails.
    pub async fn create_credential(
        &self,
        params: CredentialParams,
    ) -> Result<Credential, CredentialError> {
        params.assertion.validate()?;
        let signer_key = self.resolve_signing_key(&params).await?;

        let issued_at = params.issued_at.unwrap_or_else(Timestamp::now);
        let mut proof = Proof::unsigned(signer_key, issued_at);
        proof.nonce = params.nonce;

        let mut credential = Credential {
            id: None,
            issuer: params.issuer,
            subject: CredentialSubject {
                id: params.subject,
                assertion: params.assertion,
            },
            issuance_date: issued_at,
            proof,
            parent_credential_ids: params.parent_credential_ids,
        };

        let payload = credential.signing_payload()?;
        credential.proof.signature_value = self.signer.sign(&signer_key, &payload).await?;
        credential.proof.chain = params.chain;
        let id = sha256_digest(&payload).to_public_key();
        credential.id = Some(id);

        tracing::debug!(
            id = %id.truncate(),
            issuer = %credential.issuer.truncate(),
            subject = %credential.subject.id.truncate(),
            kind = credential.kind(),
            delegated = credential.proof.chain.is_some(),
            "credential issued"
        );
        Ok(credential)
    }

    async fn resolve_signing_key(
        &self,
        params: &CredentialParams,
    ) -> Result<PublicKey, CredentialError> {
        let issuer = params.issuer;
        match (params.signing_key, &params.chain) {
            (None, None) => Ok(issuer),
            (Some(key), Some(_)) if key == issuer => Err(CredentialError::ChainConsistency(
                "signing key equals issuer; a chain must not be supplied".into(),
            )),
            (Some(key), Some(chain)) => match self.verifier.verify_chain(chain, &issuer, &key).await
            {
                VerificationResult::Pass => Ok(key),
                VerificationResult::Fail { errors } => {
                    Err(CredentialError::ChainConsistency(format!(
                        "chain does not authorize {key} for {issuer}: {}",
                        errors.join("; ")
                    )))
                }
            },
            (Some(_), None) => Err(CredentialError::ChainConsistency(
                "signing key supplied without a chain".into(),
            )),
            (None, Some(_)) => Err(CredentialError::ChainConsistency(
                "chain supplied without a signing key".into(),
            )),
        }
    }
}

impl std::fmt::Debug for CredentialFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialFactory")
            .field("verifier", &self.verifier)
            .finish_non_exhaustive()
    }
}

/// A factory bound to one issuer and one way of signing for it.
#[derive(Debug, Clone)]
pub struct CredentialSigner {
    factory: CredentialFactory,
    issuer: PublicKey,
    delegation: Option<(PublicKey, Chain)>,
}

impl CredentialSigner {
    /// Sign as `issuer` with the issuer's own key.
    pub fn direct(factory: CredentialFactory, issuer: PublicKey) -> Self {
        Self {
            factory,
            issuer,
            delegation: None,
        }
    }

    /// Sign with `device_key` for the issuer of `chain`.
    pub fn delegated(factory: CredentialFactory, device_key: PublicKey, chain: Chain) -> Self {
        Self {
            factory,
            issuer: chain.credential.issuer,
            delegation: Some((device_key, chain)),
        }
    }

    pub fn issuer(&self) -> PublicKey {
        self.issuer
    }

    /// The key that actually produces signatures.
    pub fn signing_key(&self) -> PublicKey {
        self.delegation
            .as_ref()
            .map_or(self.issuer, |(device_key, _)| *device_key)
    }

    /// Parameters with issuer and signing key filled in.
    pub fn params(&self, subject: PublicKey, assertion: impl Into<Assertion>) -> CredentialParams {
        let params = CredentialParams::new(self.issuer, subject, assertion);
        match &self.delegation {
            Some((device_key, chain)) => params.signing_key(*device_key, chain.clone()),
            None => params,
        }
    }

    pub async fn create_credential(
        &self,
        subject: PublicKey,
        assertion: impl Into<Assertion>,
    ) -> Result<Credential, CredentialError> {
        self.factory
            .create_credential(self.params(subject, assertion))
            .await
    }
}

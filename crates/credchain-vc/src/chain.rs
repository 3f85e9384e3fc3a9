//! # Chain Verification
//!
//! A chain proves that `subject` (a device key) may sign for `authority`
//! (an identity key). The chain credential must itself verify, which may
//! recurse through a further chain, and must be an `AuthorizedDevice`
//! credential issued by `authority` about `subject` naming exactly that
//! pair.
//!
//! Each link forces the next link's issuer to be the current authority, so
//! a loop back to an unauthorized key fails the structural check. Recursion
//! is additionally bounded by [`VerifierConfig::max_chain_depth`].
//!
//! [`VerifierConfig::max_chain_depth`]: crate::VerifierConfig::max_chain_depth

use credchain_core::PublicKey;

use crate::assertion::AUTHORIZED_DEVICE;
use crate::credential::Credential;
use crate::proof::Chain;
use crate::result::VerificationResult;
use crate::verifier::{BoxFuture, CredentialVerifier};

impl CredentialVerifier {
    /// Verify that `chain` authorizes `subject` to act for `authority`.
    pub async fn verify_chain(
        &self,
        chain: &Chain,
        authority: &PublicKey,
        subject: &PublicKey,
    ) -> VerificationResult {
        self.verify_chain_at_depth(chain, authority, subject, 1).await
    }

    pub(crate) fn verify_chain_at_depth<'a>(
        &'a self,
        chain: &'a Chain,
        authority: &'a PublicKey,
        subject: &'a PublicKey,
        depth: usize,
    ) -> BoxFuture<'a, VerificationResult> {
        Box::pin(async move {
            let max_depth = self.config.max_chain_depth;
            if depth > max_depth {
                tracing::warn!(
                    max_depth,
                    authority = %authority.truncate(),
                    "credential chain depth limit reached"
                );
                return VerificationResult::fail(format!(
                    "credential chain exceeds maximum depth of {max_depth}"
                ));
            }

            let credential = &chain.credential;
            let result = self.verify_at_depth(credential, depth).await;
            if !result.is_pass() {
                return result.context("invalid credential chain");
            }

            match check_link(credential, authority, subject) {
                Some(error) => VerificationResult::fail(error),
                None => VerificationResult::Pass,
            }
        })
    }
}

/// The first structural mismatch of a chain link, if any.
fn check_link(credential: &Credential, authority: &PublicKey, subject: &PublicKey) -> Option<String> {
    if credential.subject.id != *subject {
        return Some(format!(
            "chain credential subject {} does not match signer {subject}",
            credential.subject.id
        ));
    }
    if credential.issuer != *authority {
        return Some(format!(
            "chain does not lead to issuer: link issued by {}, expected {authority}",
            credential.issuer
        ));
    }
    let Some(device) = credential.subject.assertion.as_authorized_device() else {
        return Some(format!(
            "chain credential asserts {}, expected {AUTHORIZED_DEVICE}",
            credential.kind()
        ));
    };
    if device.identity_key != *authority {
        return Some(format!(
            "chain assertion identity key {} does not match authority {authority}",
            device.identity_key
        ));
    }
    if device.device_key != *subject {
        return Some(format!(
            "chain assertion device key {} does not match signer {subject}",
            device.device_key
        ));
    }
    None
}

/// Whether `credential` is, structurally, `identity_key` authorizing
/// `device_key`. Does not check signatures.
pub fn is_valid_authorized_device_credential(
    credential: &Credential,
    identity_key: &PublicKey,
    device_key: &PublicKey,
) -> bool {
    check_link(credential, identity_key, device_key).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertion::{AuthorizedDevice, Role, SpaceMember};
    use crate::credential::CredentialSubject;
    use crate::proof::Proof;
    use credchain_core::Timestamp;

    fn link(issuer: PublicKey, subject: PublicKey, assertion: crate::Assertion) -> Credential {
        Credential {
            id: None,
            issuer,
            subject: CredentialSubject {
                id: subject,
                assertion,
            },
            issuance_date: Timestamp::now(),
            proof: Proof::unsigned(issuer, Timestamp::now()),
            parent_credential_ids: Vec::new(),
        }
    }

    fn device(identity: PublicKey, device: PublicKey) -> crate::Assertion {
        AuthorizedDevice {
            identity_key: identity,
            device_key: device,
        }
        .into()
    }

    #[test]
    fn matching_link_is_valid() {
        let (identity, dev) = (PublicKey::random(), PublicKey::random());
        let c = link(identity, dev, device(identity, dev));
        assert!(is_valid_authorized_device_credential(&c, &identity, &dev));
    }

    #[test]
    fn wrong_issuer_names_offending_key() {
        let (identity, other, dev) = (PublicKey::random(), PublicKey::random(), PublicKey::random());
        let c = link(other, dev, device(identity, dev));
        let error = check_link(&c, &identity, &dev).unwrap();
        assert!(error.starts_with("chain does not lead to issuer"));
        assert!(error.contains(&other.to_hex()));
    }

    #[test]
    fn wrong_subject_rejected() {
        let (identity, dev) = (PublicKey::random(), PublicKey::random());
        let c = link(identity, PublicKey::random(), device(identity, dev));
        assert!(!is_valid_authorized_device_credential(&c, &identity, &dev));
    }

    #[test]
    fn non_device_assertion_rejected() {
        let (identity, dev) = (PublicKey::random(), PublicKey::random());
        let member = SpaceMember {
            space_key: PublicKey::random(),
            role: Role::Admin,
            genesis_feed_key: None,
        };
        let c = link(identity, dev, member.into());
        let error = check_link(&c, &identity, &dev).unwrap();
        assert!(error.contains("credchain.SpaceMember"));
    }

    #[test]
    fn swapped_device_pair_rejected() {
        let (identity, dev) = (PublicKey::random(), PublicKey::random());
        let c = link(identity, dev, device(identity, PublicKey::random()));
        assert!(check_link(&c, &identity, &dev).unwrap().contains("device key"));
        let c = link(identity, dev, device(PublicKey::random(), dev));
        assert!(check_link(&c, &identity, &dev).unwrap().contains("identity key"));
    }
}

//! # Verifier Configuration

use serde::{Deserialize, Serialize};

use crate::proof::ED25519_SIGNATURE;

/// Default bound on delegation chain length.
pub const DEFAULT_MAX_CHAIN_DEPTH: usize = 32;

/// Tunables for [`CredentialVerifier`](crate::CredentialVerifier).
///
/// Every field has a default, so an empty YAML/JSON document is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Longest accepted chain of `AuthorizedDevice` links.
    pub max_chain_depth: usize,
    /// Proof `signatureAlgorithm` values that are checked; anything else fails.
    pub accepted_algorithms: Vec<String>,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            max_chain_depth: DEFAULT_MAX_CHAIN_DEPTH,
            accepted_algorithms: vec![ED25519_SIGNATURE.to_string()],
        }
    }
}

impl VerifierConfig {
    pub fn accepts(&self, algorithm: &str) -> bool {
        self.accepted_algorithms.iter().any(|a| a == algorithm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: VerifierConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, VerifierConfig::default());
        assert_eq!(config.max_chain_depth, 32);
        assert!(config.accepts("ED25519Signature"));
    }

    #[test]
    fn unknown_algorithm_not_accepted() {
        let config = VerifierConfig::default();
        assert!(!config.accepts("RSASignature"));
        assert!(!config.accepts(""));
    }

    #[test]
    fn partial_override() {
        let config: VerifierConfig = serde_json::from_str(r#"{"max_chain_depth": 4}"#).unwrap();
        assert_eq!(config.max_chain_depth, 4);
        assert_eq!(config.accepted_algorithms, vec!["ED25519Signature".to_string()]);
    }
}

//! # CLI Configuration
//!
//! Loaded from the YAML file named by `--config`. Every field has a
//! default, so running without `--config` is the same as an empty file.
//!
//! ```yaml
//! key_dir: /etc/credchain/keys
//! verifier:
//!   max_chain_depth: 8
//!   accepted_algorithms: [ED25519Signature]
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use credchain_crypto::Ed25519Verifier;
use credchain_vc::{CredentialVerifier, VerifierConfig};
use serde::{Deserialize, Serialize};

use crate::resolve_path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub verifier: VerifierConfig,
    /// Base directory for relative `--key` paths.
    pub key_dir: Option<PathBuf>,
}

impl CliConfig {
    /// Load from `path`, or the defaults when no path is given.
    ///
    /// A path that is given but cannot be read is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;
        tracing::debug!(
            config = %path.display(),
            max_chain_depth = config.verifier.max_chain_depth,
            "loaded configuration"
        );
        Ok(config)
    }

    pub fn key_path(&self, path: &Path) -> PathBuf {
        resolve_path(path, self.key_dir.as_deref())
    }

    /// A credential verifier backed by Ed25519 with these settings.
    pub fn credential_verifier(&self) -> CredentialVerifier {
        CredentialVerifier::with_config(Arc::new(Ed25519Verifier::new()), self.verifier.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_path_means_defaults() {
        let config = CliConfig::load(None).unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.verifier.max_chain_depth, 32);
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credchain.yaml");
        std::fs::write(&path, "verifier:\n  max_chain_depth: 4\n").unwrap();

        let config = CliConfig::load(Some(&path)).unwrap();
        assert_eq!(config.verifier.max_chain_depth, 4);
        assert!(config.verifier.accepts("ED25519Signature"));
        assert!(config.key_dir.is_none());
        assert_eq!(config.credential_verifier().config().max_chain_depth, 4);
    }

    #[test]
    fn key_dir_applies_to_relative_keys() {
        let config = CliConfig {
            key_dir: Some(PathBuf::from("/keys")),
            ..CliConfig::default()
        };
        assert_eq!(config.key_path(Path::new("a.seed")), PathBuf::from("/keys/a.seed"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = CliConfig::load(Some(Path::new("/nonexistent/credchain.yaml"))).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read config"));
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "verifier: [1, 2\n").unwrap();
        assert!(CliConfig::load(Some(&path)).is_err());
    }
}

//! # Seed Loading
//!
//! Signing keys at rest are 32-byte Ed25519 seeds written as one line of
//! lowercase hex. The CLI reads them from a file (`--key`) or from the
//! `CREDCHAIN_SIGNING_KEY` environment variable.

use std::path::Path;

use credchain_core::hex;
use ed25519_dalek::SigningKey;

use crate::error::CryptoError;

/// Environment variable that may carry a hex seed.
pub const SIGNING_KEY_ENV: &str = "CREDCHAIN_SIGNING_KEY";

/// Parse a hex-encoded 32-byte seed.
pub fn parse_seed_hex(s: &str) -> Result<SigningKey, CryptoError> {
    let bytes = hex::decode(s).map_err(|e| CryptoError::KeyError(e.to_string()))?;
    let seed: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
        CryptoError::KeyError(format!("seed must be 32 bytes, got {}", bytes.len()))
    })?;
    Ok(SigningKey::from_bytes(&seed))
}

/// Load a signing key from a hex seed file.
pub fn load_seed_file(path: &Path) -> Result<SigningKey, CryptoError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CryptoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_seed_hex(&contents)
}

/// Write a signing key's seed to `path` as hex.
///
/// On Unix the file is created with mode `0600`.
pub fn write_seed_file(path: &Path, signing_key: &SigningKey) -> Result<(), CryptoError> {
    let io_err = |source: std::io::Error| CryptoError::Io {
        path: path.to_path_buf(),
        source,
    };
    let contents = format!("{}\n", hex::encode(&signing_key.to_bytes()));

    #[cfg(unix)]
    {
        use std::io::Write;
        use std::os::unix::fs::OpenOptionsExt;
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .map_err(io_err)?;
        file.write_all(contents.as_bytes()).map_err(io_err)?;
    }
    #[cfg(not(unix))]
    std::fs::write(path, contents).map_err(io_err)?;

    Ok(())
}

/// Read a signing key from the environment variable `var`.
///
/// Returns `Ok(None)` when the variable is unset.
pub fn from_env(var: &str) -> Result<Option<SigningKey>, CryptoError> {
    match std::env::var(var) {
        Ok(value) => parse_seed_hex(&value).map(Some),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(CryptoError::KeyError(format!("{var}: {e}"))),
    }
}

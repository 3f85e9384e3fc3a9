//! # Crypto Errors

use std::path::PathBuf;

use credchain_core::PublicKey;
use thiserror::Error;

/// Errors raised by signers and key loading.
///
/// Verification never returns an error: a signature that cannot be checked
/// is simply invalid.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The signer holds no secret key for the requested public key.
    #[error("no signing key available for {0}")]
    UnknownKey(PublicKey),

    /// Key material could not be parsed.
    #[error("key error: {0}")]
    KeyError(String),

    /// The signing backend failed.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// Reading or writing a key file failed.
    #[error("key file {path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

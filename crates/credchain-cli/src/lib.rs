//! # credchain-cli — the `credchain` tool
//!
//! A thin binary over `credchain-vc`. Keys are hex seed files; credentials
//! and presentations are JSON files in their wire form.
//!
//! ## Subcommands
//!
//! - `credchain keygen` — write a fresh Ed25519 seed.
//! - `credchain issue` — sign a credential, directly or through a chain.
//! - `credchain verify` — verify a credential and its chain.
//! - `credchain present` — bundle credentials and add a presentation proof.
//! - `credchain verify-presentation` — verify a presentation, optionally
//!   against a challenge nonce.
//!
//! ## Exit Codes
//!
//! `0` when verification passes, `2` when it fails, `1` on any other error.
//!
//! ```bash
//! credchain keygen --out alice.seed
//! credchain issue --key alice.seed --subject <hex> \
//!     --assertion '{"@type": "example.Note", "text": "hi"}' --out note.json
//! credchain verify note.json
//! ```

pub mod config;
pub mod credential;
pub mod keys;
pub mod presentation;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use credchain_core::{hex, CredchainError};
use credchain_vc::VerificationResult;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Exit code for a verification that ran and failed.
pub const EXIT_VERIFICATION_FAILED: u8 = 2;

/// A hex-encoded byte string argument, such as a nonce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexBytes(pub Vec<u8>);

impl FromStr for HexBytes {
    type Err = CredchainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex::decode(s).map(Self)
    }
}

/// Resolve `path` against `base` when it is relative and `base` is set.
pub fn resolve_path(path: &Path, base: Option<&Path>) -> PathBuf {
    match base {
        Some(base) if path.is_relative() => base.join(path),
        _ => path.to_path_buf(),
    }
}

/// Read and parse a JSON document.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse JSON: {}", path.display()))
}

/// Write `value` as pretty JSON to `out`, or to stdout when `out` is unset.
pub fn write_json<T: Serialize>(value: &T, out: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize JSON")?;
    match out {
        Some(path) => std::fs::write(path, format!("{json}\n"))
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

/// Print a verification outcome and map it to an exit code.
pub fn report(what: &str, result: &VerificationResult) -> u8 {
    match result {
        VerificationResult::Pass => {
            println!("OK: {what} verified");
            0
        }
        VerificationResult::Fail { errors } => {
            println!("FAIL: {what} did not verify");
            for error in errors {
                println!("  - {error}");
            }
            EXIT_VERIFICATION_FAILED
        }
    }
}

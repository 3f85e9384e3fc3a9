//! # Keys
//!
//! `credchain keygen` and the shared `--key` argument. A key is a 32-byte
//! Ed25519 seed stored as one line of hex; without `--key` the seed is
//! read from `CREDCHAIN_SIGNING_KEY`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use credchain_core::PublicKey;
use credchain_crypto::ed25519::public_key_of;
use credchain_crypto::seed::{self, SIGNING_KEY_ENV};
use credchain_crypto::Keyring;
use ed25519_dalek::SigningKey;

use crate::config::CliConfig;

/// Arguments for `credchain keygen`.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// File to write the hex seed to.
    #[arg(long, value_name = "FILE")]
    pub out: PathBuf,

    /// Replace an existing file.
    #[arg(long)]
    pub force: bool,
}

/// The signing key argument shared by signing subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct KeyArgs {
    /// Hex seed file. Falls back to the CREDCHAIN_SIGNING_KEY variable.
    #[arg(long, value_name = "FILE")]
    pub key: Option<PathBuf>,
}

impl KeyArgs {
    /// Load the signing key from `--key` or the environment.
    pub fn load(&self, config: &CliConfig) -> Result<SigningKey> {
        match &self.key {
            Some(path) => {
                let path = config.key_path(path);
                seed::load_seed_file(&path)
                    .with_context(|| format!("failed to load key: {}", path.display()))
            }
            None => seed::from_env(SIGNING_KEY_ENV)?
                .ok_or_else(|| anyhow!("no signing key: pass --key or set {SIGNING_KEY_ENV}")),
        }
    }

    /// Load the signing key into a fresh keyring.
    pub fn keyring(&self, config: &CliConfig) -> Result<(Arc<Keyring>, PublicKey)> {
        let keyring = Arc::new(Keyring::new());
        let public_key = keyring.insert(self.load(config)?);
        Ok((keyring, public_key))
    }
}

/// Execute `credchain keygen`.
pub fn run_keygen(args: &KeygenArgs, config: &CliConfig) -> Result<u8> {
    let out = config.key_path(&args.out);
    let public_key = keygen(&out, args.force)?;
    println!("OK: generated Ed25519 key");
    println!("  Seed:       {}", out.display());
    println!("  Public key: {public_key}");
    Ok(0)
}

fn keygen(out: &Path, force: bool) -> Result<PublicKey> {
    if out.exists() && !force {
        bail!("{} already exists; pass --force to replace it", out.display());
    }
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    let signing_key = SigningKey::generate(&mut rand::rngs::OsRng);
    seed::write_seed_file(out, &signing_key)?;
    let public_key = public_key_of(&signing_key);
    tracing::info!(key = %public_key.truncate(), path = %out.display(), "generated signing key");
    Ok(public_key)
}

//! # Credential Subcommands
//!
//! `credchain issue` signs a credential with the loaded key. With `--chain`
//! the key is a device key and the issuer defaults to the chain's issuer;
//! without it the issuer is the key itself.
//!
//! `credchain verify` checks the credential signature and, for delegated
//! credentials, the whole chain.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use credchain_core::PublicKey;
use credchain_vc::{Assertion, Chain, Credential, CredentialFactory, CredentialParams};

use crate::config::CliConfig;
use crate::keys::KeyArgs;
use crate::{read_json, report, write_json, HexBytes};

/// Arguments for `credchain issue`.
#[derive(Args, Debug)]
pub struct IssueArgs {
    #[command(flatten)]
    pub key: KeyArgs,

    /// Subject public key (hex).
    #[arg(long)]
    pub subject: PublicKey,

    /// Assertion as JSON, including its "@type".
    #[arg(long, value_name = "JSON")]
    pub assertion: String,

    /// AuthorizedDevice credential that lets the key sign for the issuer.
    #[arg(long, value_name = "FILE")]
    pub chain: Option<PathBuf>,

    /// Issuer public key (hex). Defaults to the chain's issuer, or the key.
    #[arg(long)]
    pub issuer: Option<PublicKey>,

    /// Nonce to bind into the proof (hex).
    #[arg(long)]
    pub nonce: Option<HexBytes>,

    /// Id of a credential this one supersedes. Repeatable.
    #[arg(long = "parent", value_name = "ID")]
    pub parents: Vec<PublicKey>,

    /// Write the credential here instead of stdout.
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

/// Arguments for `credchain verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Credential JSON file.
    #[arg(value_name = "FILE")]
    pub credential: PathBuf,
}

/// Execute `credchain issue`.
pub async fn run_issue(args: &IssueArgs, config: &CliConfig) -> Result<u8> {
    let credential = issue(args, config).await?;
    write_json(&credential, args.out.as_deref())?;
    if let (Some(out), Some(id)) = (&args.out, credential.id) {
        println!("OK: issued credential {id}");
        println!("  Written to: {}", out.display());
    }
    Ok(0)
}

async fn issue(args: &IssueArgs, config: &CliConfig) -> Result<Credential> {
    let (keyring, key) = args.key.keyring(config)?;

    let value: serde_json::Value =
        serde_json::from_str(&args.assertion).context("--assertion is not valid JSON")?;
    let assertion = Assertion::from_json(&value)?;

    let chain = args
        .chain
        .as_ref()
        .map(|path| read_json::<Credential>(path).map(Chain::new))
        .transpose()?;

    let issuer = args
        .issuer
        .or_else(|| chain.as_ref().map(|c| c.credential.issuer))
        .unwrap_or(key);

    let mut params = CredentialParams::new(issuer, args.subject, assertion)
        .parent_credential_ids(args.parents.clone());
    if let Some(chain) = chain {
        params = params.signing_key(key, chain);
    }
    if let Some(nonce) = &args.nonce {
        params = params.nonce(nonce.0.clone());
    }

    let factory = CredentialFactory::new(keyring, config.credential_verifier());
    Ok(factory.create_credential(params).await?)
}

/// Execute `credchain verify`.
pub async fn run_verify(args: &VerifyArgs, config: &CliConfig) -> Result<u8> {
    let credential: Credential = read_json(&args.credential)?;
    let result = config.credential_verifier().verify_credential(&credential).await;
    Ok(report("credential", &result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{run_keygen, KeygenArgs};
    use crate::EXIT_VERIFICATION_FAILED;
    use credchain_crypto::ed25519::public_key_of;
    use credchain_crypto::seed::load_seed_file;
    use std::path::Path;

    fn keygen(dir: &Path, name: &str) -> (PathBuf, PublicKey) {
        let out = dir.join(name);
        let args = KeygenArgs {
            out: out.clone(),
            force: false,
        };
        run_keygen(&args, &CliConfig::default()).unwrap();
        let public_key = public_key_of(&load_seed_file(&out).unwrap());
        (out, public_key)
    }

    fn issue_args(key: &Path, subject: PublicKey, assertion: serde_json::Value, out: &Path) -> IssueArgs {
        IssueArgs {
            key: KeyArgs {
                key: Some(key.to_path_buf()),
            },
            subject,
            assertion: assertion.to_string(),
            chain: None,
            issuer: None,
            nonce: None,
            parents: Vec::new(),
            out: Some(out.to_path_buf()),
        }
    }

    fn verify(path: &Path) -> u8 {
        let args = VerifyArgs {
            credential: path.to_path_buf(),
        };
        tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(run_verify(&args, &CliConfig::default()))
            .unwrap()
    }

    #[tokio::test]
    async fn issue_then_verify() {
        let dir = tempfile::tempdir().unwrap();
        let (key, issuer) = keygen(dir.path(), "alice.seed");
        let out = dir.path().join("note.json");
        let mut args = issue_args(
            &key,
            PublicKey::random(),
            serde_json::json!({"@type": "example.Note", "text": "hello"}),
            &out,
        );
        args.nonce = Some(HexBytes(vec![1, 2, 3]));
        assert_eq!(run_issue(&args, &CliConfig::default()).await.unwrap(), 0);

        let credential: Credential = read_json(&out).unwrap();
        assert_eq!(credential.issuer, issuer);
        assert_eq!(credential.proof.nonce, Some(vec![1, 2, 3]));
        let result = CliConfig::default()
            .credential_verifier()
            .verify_credential(&credential)
            .await;
        assert!(result.is_pass());
    }

    #[test]
    fn tampered_credential_exits_with_failure() {
        let dir = tempfile::tempdir().unwrap();
        let (key, _) = keygen(dir.path(), "alice.seed");
        let out = dir.path().join("note.json");
        let args = issue_args(
            &key,
            PublicKey::random(),
            serde_json::json!({"@type": "example.Note", "text": "hello"}),
            &out,
        );
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(run_issue(&args, &CliConfig::default())).unwrap();
        drop(runtime);
        assert_eq!(verify(&out), 0);

        let mut credential: Credential = read_json(&out).unwrap();
        credential.subject.id = PublicKey::random();
        write_json(&credential, Some(&out)).unwrap();
        assert_eq!(verify(&out), EXIT_VERIFICATION_FAILED);
    }

    #[tokio::test]
    async fn delegated_issue_through_chain() {
        let dir = tempfile::tempdir().unwrap();
        let (identity_seed, identity) = keygen(dir.path(), "identity.seed");
        let (device_seed, device) = keygen(dir.path(), "device.seed");
        let config = CliConfig::default();

        let chain_file = dir.path().join("device.json");
        let authorize = issue_args(
            &identity_seed,
            device,
            serde_json::json!({
                "@type": "credchain.AuthorizedDevice",
                "identityKey": identity.to_hex(),
                "deviceKey": device.to_hex(),
            }),
            &chain_file,
        );
        run_issue(&authorize, &config).await.unwrap();

        let out = dir.path().join("note.json");
        let mut args = issue_args(
            &device_seed,
            PublicKey::random(),
            serde_json::json!({"@type": "example.Note", "text": "from my laptop"}),
            &out,
        );
        args.chain = Some(chain_file);
        run_issue(&args, &config).await.unwrap();

        let credential: Credential = read_json(&out).unwrap();
        assert_eq!(credential.issuer, identity);
        assert_eq!(credential.proof.signer_public_key, device);
        assert!(config.credential_verifier().verify_credential(&credential).await.is_pass());
    }

    #[tokio::test]
    async fn chain_for_another_device_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let (identity_seed, identity) = keygen(dir.path(), "identity.seed");
        let (device_seed, _) = keygen(dir.path(), "device.seed");
        let other_device = PublicKey::random();
        let config = CliConfig::default();

        let chain_file = dir.path().join("other.json");
        let authorize = issue_args(
            &identity_seed,
            other_device,
            serde_json::json!({
                "@type": "credchain.AuthorizedDevice",
                "identityKey": identity.to_hex(),
                "deviceKey": other_device.to_hex(),
            }),
            &chain_file,
        );
        run_issue(&authorize, &config).await.unwrap();

        let mut args = issue_args(
            &device_seed,
            PublicKey::random(),
            serde_json::json!({"@type": "example.Note"}),
            &dir.path().join("note.json"),
        );
        args.chain = Some(chain_file);
        let err = run_issue(&args, &config).await.unwrap_err();
        assert!(format!("{err:#}").contains("chain"));
    }

    #[tokio::test]
    async fn malformed_assertion_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let (key, _) = keygen(dir.path(), "alice.seed");
        let mut args = issue_args(
            &key,
            PublicKey::random(),
            serde_json::json!({"text": "no type"}),
            &dir.path().join("note.json"),
        );
        assert!(run_issue(&args, &CliConfig::default()).await.is_err());
        args.assertion = "{not json".to_string();
        assert!(run_issue(&args, &CliConfig::default()).await.is_err());
    }
}

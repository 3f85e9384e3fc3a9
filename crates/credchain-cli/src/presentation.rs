//! # Presentation Subcommands
//!
//! `credchain present` bundles credential files into a presentation and
//! appends a proof signed with the loaded key. Passing `--presentation`
//! instead co-signs an existing presentation. Every existing proof covers
//! the credential list, so credentials cannot be added to a presentation
//! that is already signed.
//!
//! `credchain verify-presentation` verifies every credential and proof, and
//! with `--nonce` also requires every proof to answer that challenge.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use credchain_vc::{Chain, Credential, Presentation, PresentationSigner, PresentationVerifier};

use crate::config::CliConfig;
use crate::keys::KeyArgs;
use crate::{read_json, report, write_json, HexBytes};

/// Arguments for `credchain present`.
#[derive(Args, Debug)]
pub struct PresentArgs {
    #[command(flatten)]
    pub key: KeyArgs,

    /// Challenge nonce to answer (hex).
    #[arg(long)]
    pub nonce: Option<HexBytes>,

    /// AuthorizedDevice credential linking the credentials' subject to the key.
    #[arg(long, value_name = "FILE")]
    pub chain: Option<PathBuf>,

    /// Existing presentation to add a proof to.
    #[arg(long, value_name = "FILE")]
    pub presentation: Option<PathBuf>,

    /// Write the presentation here instead of stdout.
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Credential JSON files to include.
    #[arg(value_name = "CREDENTIAL")]
    pub credentials: Vec<PathBuf>,
}

/// Arguments for `credchain verify-presentation`.
#[derive(Args, Debug)]
pub struct VerifyPresentationArgs {
    /// Presentation JSON file.
    #[arg(value_name = "FILE")]
    pub presentation: PathBuf,

    /// Challenge every proof must answer (hex).
    #[arg(long)]
    pub nonce: Option<HexBytes>,
}

/// Execute `credchain present`.
pub async fn run_present(args: &PresentArgs, config: &CliConfig) -> Result<u8> {
    let mut presentation = match &args.presentation {
        Some(path) => read_json::<Presentation>(path)?,
        None => Presentation::default(),
    };
    if !presentation.proofs.is_empty() && !args.credentials.is_empty() {
        bail!(
            "presentation already carries {} proof(s); adding credentials would invalidate them",
            presentation.proofs.len()
        );
    }
    for path in &args.credentials {
        presentation.credentials.push(read_json::<Credential>(path)?);
    }
    if presentation.credentials.is_empty() {
        bail!("nothing to present: pass credential files or --presentation");
    }

    let chain = args
        .chain
        .as_ref()
        .map(|path| read_json::<Credential>(path).map(Chain::new))
        .transpose()?;
    let (keyring, key) = args.key.keyring(config)?;
    let nonce = args.nonce.as_ref().map(|n| n.0.clone());

    let presentation = PresentationSigner::new(keyring)
        .sign_presentation(presentation, key, chain, nonce)
        .await?;
    write_json(&presentation, args.out.as_deref())?;
    if let Some(out) = &args.out {
        println!(
            "OK: presentation with {} credential(s) and {} proof(s)",
            presentation.credentials.len(),
            presentation.proofs.len()
        );
        println!("  Written to: {}", out.display());
    }
    Ok(0)
}

/// Execute `credchain verify-presentation`.
pub async fn run_verify_presentation(
    args: &VerifyPresentationArgs,
    config: &CliConfig,
) -> Result<u8> {
    let presentation: Presentation = read_json(&args.presentation)?;
    let verifier = PresentationVerifier::new(config.credential_verifier());
    let result = match &args.nonce {
        Some(nonce) => verifier.verify_presentation_with_nonce(&presentation, &nonce.0).await,
        None => verifier.verify_presentation(&presentation).await,
    };
    Ok(report("presentation", &result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::{run_issue, IssueArgs};
    use crate::keys::{run_keygen, KeygenArgs};
    use crate::EXIT_VERIFICATION_FAILED;
    use credchain_crypto::ed25519::public_key_of;
    use credchain_crypto::seed::load_seed_file;
    use std::path::Path;

    struct Fixture {
        _dir: tempfile::TempDir,
        root: PathBuf,
        seed: PathBuf,
        credential: PathBuf,
    }

    /// One key that issues a credential about itself.
    async fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        let seed = root.join("alice.seed");
        run_keygen(
            &KeygenArgs {
                out: seed.clone(),
                force: false,
            },
            &CliConfig::default(),
        )
        .unwrap();
        let alice = public_key_of(&load_seed_file(&seed).unwrap());

        let credential = root.join("note.json");
        let issue = IssueArgs {
            key: KeyArgs {
                key: Some(seed.clone()),
            },
            subject: alice,
            assertion: serde_json::json!({"@type": "example.Note", "text": "hi"}).to_string(),
            chain: None,
            issuer: None,
            nonce: None,
            parents: Vec::new(),
            out: Some(credential.clone()),
        };
        run_issue(&issue, &CliConfig::default()).await.unwrap();
        Fixture {
            _dir: dir,
            root,
            seed,
            credential,
        }
    }

    fn present_args(seed: &Path, credentials: Vec<PathBuf>, out: &Path) -> PresentArgs {
        PresentArgs {
            key: KeyArgs {
                key: Some(seed.to_path_buf()),
            },
            nonce: None,
            chain: None,
            presentation: None,
            out: Some(out.to_path_buf()),
            credentials,
        }
    }

    fn verify_args(path: &Path, nonce: Option<Vec<u8>>) -> VerifyPresentationArgs {
        VerifyPresentationArgs {
            presentation: path.to_path_buf(),
            nonce: nonce.map(HexBytes),
        }
    }

    #[tokio::test]
    async fn present_then_verify_with_nonce() {
        let f = fixture().await;
        let config = CliConfig::default();
        let out = f.root.join("presentation.json");
        let mut args = present_args(&f.seed, vec![f.credential.clone()], &out);
        args.nonce = Some(HexBytes(vec![0xca, 0xfe]));
        assert_eq!(run_present(&args, &config).await.unwrap(), 0);

        let ok = verify_args(&out, Some(vec![0xca, 0xfe]));
        assert_eq!(run_verify_presentation(&ok, &config).await.unwrap(), 0);

        let wrong = verify_args(&out, Some(vec![0x00]));
        assert_eq!(
            run_verify_presentation(&wrong, &config).await.unwrap(),
            EXIT_VERIFICATION_FAILED
        );
    }

    #[tokio::test]
    async fn stranger_without_chain_fails() {
        let f = fixture().await;
        let config = CliConfig::default();
        let stranger = f.root.join("mallory.seed");
        run_keygen(
            &KeygenArgs {
                out: stranger.clone(),
                force: false,
            },
            &config,
        )
        .unwrap();

        let out = f.root.join("presentation.json");
        run_present(&present_args(&stranger, vec![f.credential.clone()], &out), &config)
            .await
            .unwrap();
        assert_eq!(
            run_verify_presentation(&verify_args(&out, None), &config)
                .await
                .unwrap(),
            EXIT_VERIFICATION_FAILED
        );
    }

    #[tokio::test]
    async fn co_signing_appends_a_proof() {
        let f = fixture().await;
        let config = CliConfig::default();
        let first = f.root.join("first.json");
        run_present(&present_args(&f.seed, vec![f.credential.clone()], &first), &config)
            .await
            .unwrap();

        let second = f.root.join("second.json");
        let mut args = present_args(&f.seed, Vec::new(), &second);
        args.presentation = Some(first);
        run_present(&args, &config).await.unwrap();

        let presentation: Presentation = read_json(&second).unwrap();
        assert_eq!(presentation.credentials.len(), 1);
        assert_eq!(presentation.proofs.len(), 2);
        assert_eq!(
            run_verify_presentation(&verify_args(&second, None), &config)
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn signed_presentation_refuses_new_credentials() {
        let f = fixture().await;
        let config = CliConfig::default();
        let first = f.root.join("first.json");
        run_present(&present_args(&f.seed, vec![f.credential.clone()], &first), &config)
            .await
            .unwrap();

        let second = f.root.join("second.json");
        let mut args = present_args(&f.seed, vec![f.credential.clone()], &second);
        args.presentation = Some(first.clone());
        let err = run_present(&args, &config).await.unwrap_err();
        assert!(format!("{err:#}").contains("already carries 1 proof(s)"));
        assert!(!second.exists());

        assert_eq!(
            run_verify_presentation(&verify_args(&first, None), &config)
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn empty_presentation_is_an_error() {
        let f = fixture().await;
        let args = present_args(&f.seed, Vec::new(), &f.root.join("p.json"));
        assert!(run_present(&args, &CliConfig::default()).await.is_err());
    }
}

//! # Verification Result

use serde::{Deserialize, Serialize};

/// Outcome of a verification. There is no partial pass.
///
/// Serializes as `{"kind":"pass"}` or `{"kind":"fail","errors":[...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum VerificationResult {
    Pass,
    Fail {
        /// Human-readable reasons, in the order they were found.
        errors: Vec<String>,
    },
}

impl VerificationResult {
    /// A failure with a single reason.
    pub fn fail(reason: impl Into<String>) -> Self {
        Self::Fail {
            errors: vec![reason.into()],
        }
    }

    /// `Pass` when `errors` is empty, `Fail` otherwise.
    pub fn from_errors(errors: Vec<String>) -> Self {
        if errors.is_empty() {
            Self::Pass
        } else {
            Self::Fail { errors }
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// The failure reasons; empty on pass.
    pub fn errors(&self) -> &[String] {
        match self {
            Self::Pass => &[],
            Self::Fail { errors } => errors,
        }
    }

    /// Prefix every failure reason with `context`.
    pub fn context(self, context: &str) -> Self {
        match self {
            Self::Pass => Self::Pass,
            Self::Fail { errors } => Self::Fail {
                errors: errors
                    .into_iter()
                    .map(|e| format!("{context}: {e}"))
                    .collect(),
            },
        }
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

use certus_core::ClaimHash;
use certus_crypto::PublicKey;

/// Verification state of a single attestation signature.
///
/// `Pending` is the transient guard state while a verification is in
/// flight; `Verified` and `Unverified` are terminal for that run.
/// Re-verification re-enters `Pending` when explicitly requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationStatus {
    Pending,
    Verified,
    Unverified,
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Verified => write!(f, "verified"),
            Self::Unverified => write!(f, "unverified"),
        }
    }
}

/// An individual verification check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationCheck {
    /// Name of the check.
    pub name: String,
    /// Whether the check passed.
    pub passed: bool,
    /// Optional detail message.
    pub detail: Option<String>,
}

impl VerificationCheck {
    pub(crate) fn passed(name: &str) -> Self {
        Self {
            name: name.into(),
            passed: true,
            detail: None,
        }
    }

    pub(crate) fn failed(name: &str, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            detail: Some(detail.into()),
        }
    }
}

/// Per-node verification outcome, mirroring the legitimation tree.
///
/// The aggregate verdict is conjunctive: a node is `Verified` iff its own
/// checks pass and every legitimation report is `Verified`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Hash of the claim this report covers.
    pub claim_hash: ClaimHash,
    /// The attesting key.
    pub attester: PublicKey,
    /// Display name of the attester, when the contact directory knows
    /// the key. Annotation only; never influences the verdict.
    pub attester_name: Option<String>,
    /// Terminal status of this node.
    pub status: VerificationStatus,
    /// Individual checks run on this node, in execution order.
    pub checks: Vec<VerificationCheck>,
    /// Reports of the node's legitimations.
    pub legitimations: Vec<VerificationReport>,
}

impl VerificationReport {
    /// Whether this node and its whole subtree verified.
    pub fn verified(&self) -> bool {
        self.status == VerificationStatus::Verified
    }

    /// All claim hashes covered by this report's subtree, pre-order.
    pub fn claim_hashes(&self) -> Vec<ClaimHash> {
        let mut out = vec![self.claim_hash];
        for report in &self.legitimations {
            out.extend(report.claim_hashes());
        }
        out
    }

    /// Locate the first failing check in pre-order, root first.
    /// Pinpoints why a subtree failed.
    pub fn first_failure(&self) -> Option<(&ClaimHash, &VerificationCheck)> {
        if let Some(check) = self.checks.iter().find(|c| !c.passed) {
            return Some((&self.claim_hash, check));
        }
        self.legitimations
            .iter()
            .find_map(|report| report.first_failure())
    }
}

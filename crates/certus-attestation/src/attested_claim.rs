use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use certus_core::ClaimHash;

use crate::attestation::Attestation;
use crate::claim::Claim;
use crate::error::AttestationError;

/// A claim, its attestation, and the legitimations it was built upon.
///
/// Legitimations are owned deeply: the whole subtree used for
/// verification travels with the root. Schema and contact records are
/// referenced by hash/key and resolved through collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttestedClaim {
    pub claim: Claim,
    pub attestation: Attestation,
    pub legitimations: Vec<AttestedClaim>,
}

impl AttestedClaim {
    /// Compose an attested claim, checking that the attestation actually
    /// references the claim it is attached to.
    pub fn new(
        claim: Claim,
        attestation: Attestation,
        legitimations: Vec<AttestedClaim>,
    ) -> Result<Self, AttestationError> {
        if claim.hash()? != attestation.claim_hash {
            return Err(AttestationError::ClaimHashMismatch);
        }
        Ok(Self {
            claim,
            attestation,
            legitimations,
        })
    }

    /// Flatten the legitimation tree for iteration, pre-order with the
    /// root first.
    ///
    /// Fails with [`AttestationError::CyclicGraph`] when a claim hash
    /// recurs on the current root-to-leaf path. A claim appearing on two
    /// sibling branches is allowed (a diamond is not a cycle).
    pub fn collect_subgraph(&self) -> Result<Vec<&AttestedClaim>, AttestationError> {
        let mut out = Vec::new();
        let mut path = HashSet::new();
        self.walk(&mut path, &mut out)?;
        Ok(out)
    }

    fn walk<'a>(
        &'a self,
        path: &mut HashSet<ClaimHash>,
        out: &mut Vec<&'a AttestedClaim>,
    ) -> Result<(), AttestationError> {
        let hash = self.attestation.claim_hash;
        if !path.insert(hash) {
            return Err(AttestationError::CyclicGraph(hash));
        }
        out.push(self);
        for legitimation in &self.legitimations {
            legitimation.walk(path, out)?;
        }
        path.remove(&hash);
        Ok(())
    }
}

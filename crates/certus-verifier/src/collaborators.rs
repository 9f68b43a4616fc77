use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

use certus_attestation::Attestation;
use certus_core::ClaimHash;
use certus_crypto::PublicKey;

use crate::error::VerifierError;

/// Collaborator exposing the ledger's view of attestations.
///
/// The ledger is the source of truth for existence and revocation;
/// `Ok(None)` means not found, transport faults are
/// [`VerifierError::CollaboratorUnavailable`].
#[async_trait]
pub trait AttestationLedger: Send + Sync {
    /// Look up the on-chain attestation for a claim hash.
    async fn get_attestation(
        &self,
        claim_hash: &ClaimHash,
    ) -> Result<Option<Attestation>, VerifierError>;

    /// Fresh revocation status for a claim hash. Consulted at
    /// verification time; a locally cached `revoked` flag is never
    /// trusted for a `Verified` verdict.
    async fn is_revoked(&self, claim_hash: &ClaimHash) -> Result<bool, VerifierError>;
}

/// Human-readable identity resolved from a public key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayIdentity {
    pub name: String,
}

/// Collaborator annotating verification results with attester names.
/// Never influences the verdict.
#[async_trait]
pub trait ContactDirectory: Send + Sync {
    async fn resolve(&self, key: &PublicKey) -> Result<Option<DisplayIdentity>, VerifierError>;
}

/// In-memory attestation ledger for tests and local development.
///
/// Counts revocation lookups so tests can assert that pending
/// de-duplication avoids duplicate collaborator calls.
pub struct InMemoryLedger {
    attestations: DashMap<ClaimHash, Attestation>,
    revoked: DashMap<ClaimHash, bool>,
    revocation_lookups: AtomicUsize,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self {
            attestations: DashMap::new(),
            revoked: DashMap::new(),
            revocation_lookups: AtomicUsize::new(0),
        }
    }

    /// Record an attestation.
    pub fn submit(&self, attestation: Attestation) {
        self.attestations
            .insert(attestation.claim_hash, attestation);
    }

    /// Mark a claim's attestation revoked. Monotonic.
    pub fn revoke(&self, claim_hash: &ClaimHash) {
        self.revoked.insert(*claim_hash, true);
        if let Some(mut attestation) = self.attestations.get_mut(claim_hash) {
            attestation.revoke();
        }
    }

    /// Number of revocation lookups served so far.
    pub fn revocation_lookups(&self) -> usize {
        self.revocation_lookups.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AttestationLedger for InMemoryLedger {
    async fn get_attestation(
        &self,
        claim_hash: &ClaimHash,
    ) -> Result<Option<Attestation>, VerifierError> {
        Ok(self.attestations.get(claim_hash).map(|entry| entry.clone()))
    }

    async fn is_revoked(&self, claim_hash: &ClaimHash) -> Result<bool, VerifierError> {
        self.revocation_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .revoked
            .get(claim_hash)
            .map(|entry| *entry)
            .unwrap_or(false))
    }
}

/// In-memory contact directory keyed by public key.
pub struct InMemoryContactDirectory {
    contacts: DashMap<String, DisplayIdentity>,
}

impl InMemoryContactDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self {
            contacts: DashMap::new(),
        }
    }

    /// Register a display name for a key.
    pub fn add(&self, key: &PublicKey, name: impl Into<String>) {
        self.contacts
            .insert(key.to_hex(), DisplayIdentity { name: name.into() });
    }
}

impl Default for InMemoryContactDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContactDirectory for InMemoryContactDirectory {
    async fn resolve(&self, key: &PublicKey) -> Result<Option<DisplayIdentity>, VerifierError> {
        Ok(self.contacts.get(&key.to_hex()).map(|entry| entry.clone()))
    }
}

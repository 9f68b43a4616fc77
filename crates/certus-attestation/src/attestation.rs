use serde::{Deserialize, Serialize};

use certus_core::{ClaimHash, DelegationId};
use certus_crypto::{sign, verify, KeyPair, PublicKey, Signature};

/// A signed assertion by a third party that a specific claim is true,
/// optionally exercised under delegated authority.
///
/// Created once; the only mutation is the monotonic revocation flag,
/// which the engine treats as an observed fact sourced from the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attestation {
    /// Hash of the attested claim.
    pub claim_hash: ClaimHash,
    /// Public key of the attesting party.
    pub attester: PublicKey,
    /// Delegation granting the attester authority; absent when the
    /// attester acts as its own root authority.
    pub delegation_id: Option<DelegationId>,
    /// Signature binding `claim_hash` to `attester`.
    pub signature: Signature,
    /// Observed revocation state. Transitions false to true exactly once.
    pub revoked: bool,
}

impl Attestation {
    /// Attest a claim hash with the attester's keypair.
    pub fn new(
        claim_hash: ClaimHash,
        delegation_id: Option<DelegationId>,
        keypair: &KeyPair,
    ) -> Self {
        let signature = sign(claim_hash.as_bytes(), keypair);
        Self {
            claim_hash,
            attester: keypair.public_key(),
            delegation_id,
            signature,
            revoked: false,
        }
    }

    /// Check that the signature binds the claim hash to the attester key.
    pub fn verify_signature(&self) -> bool {
        verify(self.claim_hash.as_bytes(), &self.signature, &self.attester).is_ok()
    }

    /// Revoke the attestation. Monotonic: never undone.
    pub fn revoke(&mut self) {
        self.revoked = true;
    }
}

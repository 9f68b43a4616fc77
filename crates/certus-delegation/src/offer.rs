use serde::{Deserialize, Serialize};

use certus_core::DelegationId;
use certus_crypto::{sign, verify, KeyPair, PublicKey, Signature};

use crate::error::DelegationError;
use crate::node::PermissionSet;

/// Payload of a delegation offer, authored by the inviter and accepted by
/// the invitee. The inviter signs the canonical JSON serialization of
/// this payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelegationData {
    /// Identifier the new node will carry.
    pub id: DelegationId,
    /// The inviter's node (or the root itself, when the inviter is the
    /// root owner).
    pub parent_id: DelegationId,
    /// The invitee's account.
    pub account: PublicKey,
    /// Permissions offered to the invitee.
    pub permissions: PermissionSet,
}

impl DelegationData {
    fn canonical_payload(&self) -> Result<Vec<u8>, DelegationError> {
        serde_json::to_vec(self)
            .map_err(|e| DelegationError::Unavailable(format!("serialization failed: {}", e)))
    }
}

/// Sign a delegation offer as the inviter.
pub fn sign_offer(data: &DelegationData, keypair: &KeyPair) -> Result<Signature, DelegationError> {
    Ok(sign(&data.canonical_payload()?, keypair))
}

/// Check that `signature` is a valid signature by `inviter_key` over the
/// canonical serialization of `data`.
///
/// Pure and side-effect-free: the result is advisory to the caller, the
/// authoritative rejection happens at the ledger.
pub fn verify_offer(data: &DelegationData, signature: &Signature, inviter_key: &PublicKey) -> bool {
    match data.canonical_payload() {
        Ok(payload) => verify(&payload, signature, inviter_key).is_ok(),
        Err(_) => false,
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use certus_attestation::{Attestation, AttestedClaim, Claim};
use certus_crypto::{PublicKey, Signature};
use certus_delegation::{DelegationData, DelegationMetadata};

use crate::error::VerifierError;

/// Typed payload of a delegation/attestation protocol message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum MessageBody {
    /// Inviter offers a delegation; the signature covers the canonical
    /// serialization of `data`. The metadata carries the inviter's local
    /// alias for presentation.
    DelegationOffer {
        data: DelegationData,
        metadata: Option<DelegationMetadata>,
        inviter_signature: Signature,
    },
    /// Invitee accepts an offer, countersigning it.
    DelegationAccept {
        data: DelegationData,
        inviter_signature: Signature,
        invitee_signature: Signature,
    },
    /// Claimer asks an attester to attest a claim, with supporting
    /// legitimations.
    AttestationRequest {
        claim: Claim,
        legitimations: Vec<AttestedClaim>,
    },
    /// Attester hands the signed attestation back to the claimer.
    AttestationApproval { attestation: Attestation },
}

/// A protocol message addressed to a recipient key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender: PublicKey,
    pub recipient: PublicKey,
    pub created_at: DateTime<Utc>,
    pub body: MessageBody,
}

impl Message {
    /// Create a new message with a fresh id.
    pub fn new(sender: PublicKey, recipient: PublicKey, body: MessageBody) -> Self {
        Self {
            id: format!("urn:uuid:{}", Uuid::now_v7()),
            sender,
            recipient,
            created_at: Utc::now(),
            body,
        }
    }
}

/// Transport collaborator handing protocol payloads to their recipient.
///
/// Consumed, not implemented, by this engine; delivery guarantees are the
/// caller's responsibility.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn send(&self, message: Message) -> Result<(), VerifierError>;
}

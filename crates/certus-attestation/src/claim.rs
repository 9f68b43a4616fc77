use serde::{Deserialize, Serialize};

use certus_core::{ClaimHash, SchemaHash};
use certus_crypto::{hash_json, PublicKey};

use crate::error::AttestationError;

/// A set of field values asserted by its owner, conforming to a CType.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    /// Hash of the CType the claim conforms to (referenced, not owned).
    pub ctype_hash: SchemaHash,
    /// The claiming account.
    pub owner: PublicKey,
    /// Field values keyed by CType field key.
    pub contents: serde_json::Map<String, serde_json::Value>,
}

impl Claim {
    /// Create a new claim.
    pub fn new(
        ctype_hash: SchemaHash,
        owner: PublicKey,
        contents: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        Self {
            ctype_hash,
            owner,
            contents,
        }
    }

    /// Content hash over `(ctype_hash, owner, contents)` in canonical
    /// JSON form.
    pub fn hash(&self) -> Result<ClaimHash, AttestationError> {
        let canonical = serde_json::json!({
            "cType": self.ctype_hash,
            "owner": self.owner,
            "contents": self.contents,
        });
        Ok(ClaimHash::from_bytes(hash_json(&canonical)?))
    }
}

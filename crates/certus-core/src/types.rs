use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Content hash identifying a credential schema (CType).
///
/// Derived once over the canonical schema form; never recomputed from a
/// mutated schema because schemas are immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaHash(pub [u8; 32]);

/// Content hash identifying a claim: H(schema hash, owner, contents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClaimHash(pub [u8; 32]);

macro_rules! impl_hash_newtype {
    ($name:ident) => {
        impl $name {
            /// Wrap a raw 32-byte digest.
            pub fn from_bytes(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            /// Get the raw digest bytes.
            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            /// Encode as a lowercase hex string.
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }

            /// Decode from a 64-character hex string.
            pub fn from_hex(s: &str) -> Result<Self, CoreError> {
                let bytes = hex::decode(s)
                    .map_err(|e| CoreError::InvalidHash(format!("invalid hex: {}", e)))?;
                let arr: [u8; 32] = bytes.try_into().map_err(|_| {
                    CoreError::InvalidHash(format!("hash must be 32 bytes, got '{}'", s))
                })?;
                Ok(Self(arr))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.to_hex())
            }
        }
    };
}

impl_hash_newtype!(SchemaHash);
impl_hash_newtype!(ClaimHash);

/// Identifier of a delegation node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DelegationId(pub String);

impl DelegationId {
    /// Create a new delegation node identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DelegationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a delegation root registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RootId(pub String);

impl RootId {
    /// Create a new root identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RootId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

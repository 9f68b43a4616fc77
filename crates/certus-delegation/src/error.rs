/// Delegation subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum DelegationError {
    #[error("permission escalation: requested permissions exceed the parent's")]
    PermissionEscalation,

    #[error("root not found for delegation chain starting at: {0}")]
    RootNotFound(String),

    #[error("delegation node not found: {0}")]
    NodeNotFound(String),

    #[error("delegation store unavailable: {0}")]
    Unavailable(String),

    #[error("crypto error: {0}")]
    Crypto(#[from] certus_crypto::CryptoError),
}

use certus_core::ClaimHash;

/// Attestation subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum AttestationError {
    #[error("cyclic legitimation graph: claim {0} recurs on its own path")]
    CyclicGraph(ClaimHash),

    #[error("attestation does not reference the claim it is attached to")]
    ClaimHashMismatch,

    #[error("crypto error: {0}")]
    Crypto(#[from] certus_crypto::CryptoError),
}

use certus_core::ClaimHash;

/// Infrastructural verification failures.
///
/// Validation-semantic failures (bad claim shape, revoked attestation,
/// insufficient permission, bad signature) are not errors; they surface
/// as a terminal `Unverified` status in the report. Only faults where the
/// verdict is unknown, such as an unreachable collaborator or a malformed
/// cyclic graph, are reported here, so callers can retry instead of
/// mistaking "unknown" for "invalid".
#[derive(Debug, Clone, thiserror::Error)]
pub enum VerifierError {
    #[error("collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    #[error("cyclic legitimation graph: claim {0} recurs on its own path")]
    CyclicGraph(ClaimHash),
}

impl From<certus_schema::SchemaError> for VerifierError {
    fn from(e: certus_schema::SchemaError) -> Self {
        Self::CollaboratorUnavailable(e.to_string())
    }
}

impl From<certus_delegation::DelegationError> for VerifierError {
    fn from(e: certus_delegation::DelegationError) -> Self {
        Self::CollaboratorUnavailable(e.to_string())
    }
}

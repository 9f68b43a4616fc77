//! Certus Verifier — recursive trust verification of attested claims.
//!
//! The verifier orchestrates the schema, delegation, and attestation
//! subsystems: it validates claim shape, checks the attester's authority,
//! recurses into legitimations, and aggregates a conjunctive verdict. A
//! per-signature status cache guarantees at most one in-flight
//! verification per attestation signature; concurrent requests for the
//! same signature await the in-flight result.

pub mod collaborators;
pub mod error;
pub mod message;
pub mod status;
pub mod verifier;

pub use collaborators::{
    AttestationLedger, ContactDirectory, DisplayIdentity, InMemoryContactDirectory,
    InMemoryLedger,
};
pub use error::VerifierError;
pub use message::{Message, MessageBody, MessageTransport};
pub use status::{VerificationCheck, VerificationReport, VerificationStatus};
pub use verifier::TrustVerifier;

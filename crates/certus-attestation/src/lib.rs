//! Certus Attestation — claims, attestations, and the legitimation graph.
//!
//! A claim is a content-hashed set of field values conforming to a CType.
//! An attestation binds a claim hash to an attester's key with an Ed25519
//! signature. An attested claim owns the subtree of legitimations it was
//! built upon; the subtree is walked with an explicit cycle guard.

pub mod attestation;
pub mod attested_claim;
pub mod claim;
pub mod error;

pub use attestation::Attestation;
pub use attested_claim::AttestedClaim;
pub use claim::Claim;
pub use error::AttestationError;

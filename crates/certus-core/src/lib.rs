//! Certus Core — Fundamental types, errors, and configuration for the
//! Certus credential schema and trust-verification engine.

pub mod config;
pub mod error;
pub mod types;

pub use config::VerifierConfig;
pub use error::CoreError;
pub use types::{ClaimHash, DelegationId, RootId, SchemaHash};

//! Shared fixtures for the cross-crate integration tests in `tests/`.

use std::sync::Arc;

use certus_attestation::{Attestation, AttestedClaim, Claim};
use certus_core::DelegationId;
use certus_crypto::KeyPair;
use certus_schema::{
    CType, CTypeInputModel, InMemorySchemaDirectory, InputProperty, ValueType,
    CTYPE_INPUT_SCHEMA_TAG,
};
use certus_verifier::InMemoryLedger;

/// Install a test subscriber reading `RUST_LOG`. Safe to call from every
/// test; only the first call installs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A membership schema with one required string field and one optional
/// integer field.
pub fn membership_ctype() -> CType {
    CType::from_input_model(&CTypeInputModel {
        id: "http://example.com/membership".into(),
        schema_tag: CTYPE_INPUT_SCHEMA_TAG.into(),
        title: "Membership".into(),
        properties: vec![
            InputProperty {
                id: "member-name".into(),
                title: "Member Name".into(),
                value_type: ValueType::String,
            },
            InputProperty {
                id: "level".into(),
                title: "Level".into(),
                value_type: ValueType::Integer,
            },
        ],
        required: vec!["member-name".into()],
    })
    .expect("fixture schema is well-formed")
}

/// Register the membership schema into a fresh directory.
pub fn directory_with_membership() -> (Arc<InMemorySchemaDirectory>, CType) {
    let directory = Arc::new(InMemorySchemaDirectory::new());
    let ctype = membership_ctype();
    directory.register(ctype.clone());
    (directory, ctype)
}

/// Attest a claim over `contents` for a fresh owner and record it on the
/// ledger.
pub fn attest(
    ctype: &CType,
    ledger: &InMemoryLedger,
    attester: &KeyPair,
    delegation_id: Option<DelegationId>,
    contents: serde_json::Value,
    legitimations: Vec<AttestedClaim>,
) -> AttestedClaim {
    let owner = KeyPair::generate();
    let claim = Claim::new(
        *ctype.hash(),
        owner.public_key(),
        contents.as_object().expect("contents is an object").clone(),
    );
    let attestation = Attestation::new(
        claim.hash().expect("claim hashes"),
        delegation_id,
        attester,
    );
    ledger.submit(attestation.clone());
    AttestedClaim::new(claim, attestation, legitimations).expect("attestation matches claim")
}

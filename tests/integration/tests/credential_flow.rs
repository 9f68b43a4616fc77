//! Integration test: Full credential lifecycle across crates.
//!
//! Authors a schema through the input model, builds a conforming claim,
//! attests it, and verifies the result end-to-end using certus-schema,
//! certus-attestation, and certus-verifier together.

use std::sync::Arc;

use certus_core::VerifierConfig;
use certus_crypto::KeyPair;
use certus_delegation::InMemoryDelegationStore;
use certus_verifier::{InMemoryContactDirectory, InMemoryLedger, TrustVerifier, VerificationStatus};

use certus_integration_tests::{attest, directory_with_membership, membership_ctype};

// =========================================================================
// Schema authoring round trip
// =========================================================================

#[test]
fn test_schema_round_trip_through_canonical_form() {
    let ctype = membership_ctype();
    let input = ctype.to_input_model();
    let rebuilt = certus_schema::CType::from_input_model(&input).expect("round trip");
    assert_eq!(rebuilt.hash(), ctype.hash());
    assert_eq!(rebuilt.to_input_model(), input);
}

#[test]
fn test_claim_template_lists_fields_in_order() {
    let ctype = membership_ctype();
    let template = ctype.claim_input_model("en");
    let keys: Vec<&str> = template.properties.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(keys, vec!["member-name", "level"]);
    assert_eq!(template.required, vec!["member-name".to_string()]);
}

// =========================================================================
// Three-party flow: Claimer → Attester → Verifier
// =========================================================================

#[tokio::test]
async fn test_full_attestation_and_verification_flow() {
    certus_integration_tests::init_tracing();
    let (schemas, ctype) = directory_with_membership();
    let ledger = Arc::new(InMemoryLedger::new());
    let delegations = Arc::new(InMemoryDelegationStore::new());
    let attester = KeyPair::generate();

    let contacts = Arc::new(InMemoryContactDirectory::new());
    contacts.add(&attester.public_key(), "Registrar");

    let attested = attest(
        &ctype,
        &ledger,
        &attester,
        None,
        serde_json::json!({"member-name": "Alice Santos", "level": 3}),
        vec![],
    );

    let verifier = TrustVerifier::new(
        schemas,
        delegations,
        ledger.clone(),
        VerifierConfig::default(),
    )
    .with_contacts(contacts);

    let report = verifier.verify(&attested).await.expect("no infra fault");
    assert_eq!(report.status, VerificationStatus::Verified);
    assert_eq!(report.attester_name.as_deref(), Some("Registrar"));
    assert!(report.first_failure().is_none());

    // the terminal verdict is observable by signature
    assert_eq!(
        verifier.status(&attested.attestation.signature),
        Some(VerificationStatus::Verified)
    );
}

#[tokio::test]
async fn test_claim_missing_required_field_is_unverified() {
    let (schemas, ctype) = directory_with_membership();
    let ledger = Arc::new(InMemoryLedger::new());
    let attester = KeyPair::generate();

    // "member-name" is required by the schema
    let attested = attest(
        &ctype,
        &ledger,
        &attester,
        None,
        serde_json::json!({"level": 3}),
        vec![],
    );

    let verifier = TrustVerifier::new(
        schemas,
        Arc::new(InMemoryDelegationStore::new()),
        ledger,
        VerifierConfig::default(),
    );

    let report = verifier.verify(&attested).await.expect("no infra fault");
    assert_eq!(report.status, VerificationStatus::Unverified);
    let (_, check) = report.first_failure().expect("a check failed");
    assert_eq!(check.name, "claim_valid");
}

#[tokio::test]
async fn test_revocation_flips_verdict() {
    let (schemas, ctype) = directory_with_membership();
    let ledger = Arc::new(InMemoryLedger::new());
    let attester = KeyPair::generate();
    let attested = attest(
        &ctype,
        &ledger,
        &attester,
        None,
        serde_json::json!({"member-name": "Bob"}),
        vec![],
    );

    let verifier = TrustVerifier::new(
        schemas,
        Arc::new(InMemoryDelegationStore::new()),
        ledger.clone(),
        VerifierConfig::default(),
    );

    let report = verifier.verify(&attested).await.expect("no infra fault");
    assert_eq!(report.status, VerificationStatus::Verified);

    ledger.revoke(&attested.attestation.claim_hash);

    // a cached Verified verdict does not survive revocation
    let report = verifier.verify(&attested).await.expect("no infra fault");
    assert_eq!(report.status, VerificationStatus::Unverified);
    let (_, check) = report.first_failure().expect("a check failed");
    assert_eq!(check.name, "not_revoked");
}

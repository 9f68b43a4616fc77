//! Integration test: Recursive trust verification over legitimation
//! graphs, including the concurrent pending guard.

use std::sync::Arc;
use std::time::Duration;

use certus_core::{SchemaHash, VerifierConfig};
use certus_crypto::KeyPair;
use certus_delegation::InMemoryDelegationStore;
use certus_schema::{CType, InMemorySchemaDirectory, SchemaDirectory, SchemaError};
use certus_verifier::{InMemoryLedger, TrustVerifier, VerificationStatus, VerifierError};

use certus_integration_tests::{attest, directory_with_membership};

// =========================================================================
// Legitimation graphs
// =========================================================================

#[tokio::test]
async fn test_legitimation_chain_verifies_conjunctively() {
    let (schemas, ctype) = directory_with_membership();
    let ledger = Arc::new(InMemoryLedger::new());
    let attester = KeyPair::generate();

    let grandparent = attest(
        &ctype,
        &ledger,
        &attester,
        None,
        serde_json::json!({"member-name": "gp"}),
        vec![],
    );
    let parent = attest(
        &ctype,
        &ledger,
        &attester,
        None,
        serde_json::json!({"member-name": "p"}),
        vec![grandparent],
    );
    let leaf = attest(
        &ctype,
        &ledger,
        &attester,
        None,
        serde_json::json!({"member-name": "leaf"}),
        vec![parent.clone()],
    );

    let verifier = TrustVerifier::new(
        schemas,
        Arc::new(InMemoryDelegationStore::new()),
        ledger.clone(),
        VerifierConfig::default(),
    );

    let report = verifier.verify(&leaf).await.expect("no infra fault");
    assert_eq!(report.status, VerificationStatus::Verified);
    assert_eq!(report.legitimations.len(), 1);
    assert_eq!(report.legitimations[0].legitimations.len(), 1);

    // revoking a legitimation two levels down flips the whole chain
    let deep_hash = parent.legitimations[0].attestation.claim_hash;
    ledger.revoke(&deep_hash);
    let report = verifier.verify_fresh(&leaf).await.expect("no infra fault");
    assert_eq!(report.status, VerificationStatus::Unverified);
    let (failing, check) = report.first_failure().expect("a check failed");
    assert_eq!(*failing, deep_hash);
    assert_eq!(check.name, "not_revoked");
}

#[tokio::test]
async fn test_cyclic_legitimation_graph_is_rejected() {
    let (schemas, ctype) = directory_with_membership();
    let ledger = Arc::new(InMemoryLedger::new());
    let attester = KeyPair::generate();

    let mut root = attest(
        &ctype,
        &ledger,
        &attester,
        None,
        serde_json::json!({"member-name": "cyclic"}),
        vec![],
    );
    let copy = root.clone();
    root.legitimations.push(copy);

    let verifier = TrustVerifier::new(
        schemas,
        Arc::new(InMemoryDelegationStore::new()),
        ledger,
        VerifierConfig::default(),
    );

    // a cycle is an infrastructural fault, not an Unverified verdict
    let result = verifier.verify(&root).await;
    assert!(matches!(result, Err(VerifierError::CyclicGraph(_))));
}

#[tokio::test]
async fn test_bounded_fanout_matches_unbounded_verdict() {
    let (schemas, ctype) = directory_with_membership();
    let ledger = Arc::new(InMemoryLedger::new());
    let attester = KeyPair::generate();

    let legitimations: Vec<_> = (0..8)
        .map(|i| {
            attest(
                &ctype,
                &ledger,
                &attester,
                None,
                serde_json::json!({"member-name": format!("leg-{}", i)}),
                vec![],
            )
        })
        .collect();
    let root = attest(
        &ctype,
        &ledger,
        &attester,
        None,
        serde_json::json!({"member-name": "root"}),
        legitimations,
    );

    let bounded = TrustVerifier::new(
        Arc::clone(&schemas) as Arc<dyn SchemaDirectory>,
        Arc::new(InMemoryDelegationStore::new()),
        Arc::clone(&ledger) as Arc<dyn certus_verifier::AttestationLedger>,
        VerifierConfig {
            max_fanout: Some(3),
            cache_ttl: None,
        },
    );
    let report = bounded.verify(&root).await.expect("no infra fault");
    assert_eq!(report.status, VerificationStatus::Verified);
    assert_eq!(report.legitimations.len(), 8);
}

// =========================================================================
// Pending guard under concurrency
// =========================================================================

/// Directory that delays resolution so concurrent verifications overlap.
struct SlowDirectory(Arc<InMemorySchemaDirectory>);

#[async_trait::async_trait]
impl SchemaDirectory for SlowDirectory {
    async fn get_schema(&self, hash: &SchemaHash) -> Result<Option<CType>, SchemaError> {
        tokio::time::sleep(Duration::from_millis(40)).await;
        self.0.get_schema(hash).await
    }
}

#[tokio::test]
async fn test_concurrent_verification_is_deduplicated() {
    certus_integration_tests::init_tracing();
    let (schemas, ctype) = directory_with_membership();
    let ledger = Arc::new(InMemoryLedger::new());
    let attester = KeyPair::generate();
    let attested = attest(
        &ctype,
        &ledger,
        &attester,
        None,
        serde_json::json!({"member-name": "concurrent"}),
        vec![],
    );

    let verifier = Arc::new(TrustVerifier::new(
        Arc::new(SlowDirectory(schemas)),
        Arc::new(InMemoryDelegationStore::new()),
        Arc::clone(&ledger) as Arc<dyn certus_verifier::AttestationLedger>,
        VerifierConfig::default(),
    ));

    let mut handles = Vec::new();
    for _ in 0..4 {
        let verifier = Arc::clone(&verifier);
        let attested = attested.clone();
        handles.push(tokio::spawn(
            async move { verifier.verify(&attested).await },
        ));
    }
    for handle in handles {
        let report = handle.await.expect("task ran").expect("no infra fault");
        assert_eq!(report.status, VerificationStatus::Verified);
    }

    // one winner resolved; the other callers awaited its result
    assert_eq!(ledger.revocation_lookups(), 1);
}

//! Integration test: Delegation offer/accept flow and delegated
//! attestation authority.
//!
//! Exercises certus-delegation's signed offers and permission bounds
//! together with the verifier's authority checks.

use std::sync::Arc;

use certus_core::{DelegationId, RootId, VerifierConfig};
use certus_crypto::KeyPair;
use certus_delegation::{
    create_node, sign_offer, verify_offer, DelegationData, DelegationError, DelegationRootNode,
    InMemoryDelegationStore, Permission, PermissionSet,
};
use certus_verifier::{InMemoryLedger, TrustVerifier, VerificationStatus};

use certus_integration_tests::{attest, directory_with_membership};

// =========================================================================
// Offer / accept flow
// =========================================================================

#[test]
fn test_offer_signature_round_trip() {
    let inviter = KeyPair::generate();
    let invitee = KeyPair::generate();
    let data = DelegationData {
        id: DelegationId::new("node-1"),
        parent_id: DelegationId::new("root-1"),
        account: invitee.public_key(),
        permissions: PermissionSet::of(&[Permission::Attest]),
    };

    let signature = sign_offer(&data, &inviter).expect("offer signs");
    assert!(verify_offer(&data, &signature, &inviter.public_key()));

    // tampering with the payload invalidates the signature
    let mut tampered = data.clone();
    tampered.permissions = PermissionSet::all();
    assert!(!verify_offer(&tampered, &signature, &inviter.public_key()));
}

#[tokio::test]
async fn test_accepted_offer_creates_bounded_node() {
    let store = InMemoryDelegationStore::new();
    let root_owner = KeyPair::generate();
    let ctype_hash = *certus_integration_tests::membership_ctype().hash();
    store.insert_root(DelegationRootNode::new(
        RootId::new("root-1"),
        root_owner.public_key(),
        ctype_hash,
    ));

    let invitee = KeyPair::generate();
    let data = DelegationData {
        id: DelegationId::new("node-1"),
        parent_id: DelegationId::new("root-1"),
        account: invitee.public_key(),
        permissions: PermissionSet::of(&[Permission::Attest, Permission::Delegate]),
    };
    let node = create_node(&store, &data).await.expect("offer accepted");
    // the inviter is the root itself, so the parent pointer is dropped
    assert!(node.parent_id.is_none());
    store.insert_node(node.clone());

    // a grandchild cannot exceed its parent's permissions
    let grandchild = DelegationData {
        id: DelegationId::new("node-2"),
        parent_id: DelegationId::new("node-1"),
        account: KeyPair::generate().public_key(),
        permissions: PermissionSet::of(&[Permission::Attest]),
    };
    let child = create_node(&store, &grandchild).await.expect("subset ok");
    assert_eq!(child.parent_id, Some(DelegationId::new("node-1")));

    store.insert_node({
        let mut narrowed = node;
        narrowed.permissions = PermissionSet::of(&[Permission::Delegate]);
        narrowed
    });
    let escalating = DelegationData {
        id: DelegationId::new("node-3"),
        parent_id: DelegationId::new("node-1"),
        account: KeyPair::generate().public_key(),
        permissions: PermissionSet::of(&[Permission::Attest]),
    };
    let result = create_node(&store, &escalating).await;
    assert!(matches!(result, Err(DelegationError::PermissionEscalation)));
}

// =========================================================================
// Delegated verification
// =========================================================================

#[tokio::test]
async fn test_delegated_attestation_verifies_until_root_revoked() {
    let (schemas, ctype) = directory_with_membership();
    let ledger = Arc::new(InMemoryLedger::new());
    let delegations = Arc::new(InMemoryDelegationStore::new());

    let root_owner = KeyPair::generate();
    let delegate = KeyPair::generate();
    delegations.insert_root(DelegationRootNode::new(
        RootId::new("root-1"),
        root_owner.public_key(),
        *ctype.hash(),
    ));
    let data = DelegationData {
        id: DelegationId::new("delegate-1"),
        parent_id: DelegationId::new("root-1"),
        account: delegate.public_key(),
        permissions: PermissionSet::of(&[Permission::Attest]),
    };
    let node = create_node(delegations.as_ref(), &data)
        .await
        .expect("offer accepted");
    delegations.insert_node(node);

    let attested = attest(
        &ctype,
        &ledger,
        &delegate,
        Some(DelegationId::new("delegate-1")),
        serde_json::json!({"member-name": "Carol", "level": 1}),
        vec![],
    );

    let verifier = TrustVerifier::new(
        schemas,
        Arc::clone(&delegations) as Arc<dyn certus_delegation::DelegationStore>,
        ledger,
        VerifierConfig::default(),
    );

    let report = verifier.verify(&attested).await.expect("no infra fault");
    assert_eq!(report.status, VerificationStatus::Verified);

    // revoking the root invalidates the whole tree's authority
    delegations.revoke_root(&RootId::new("root-1"));
    let report = verifier
        .verify_fresh(&attested)
        .await
        .expect("no infra fault");
    assert_eq!(report.status, VerificationStatus::Unverified);
    let (_, check) = report.first_failure().expect("a check failed");
    assert_eq!(check.name, "delegation_authority");
}

#[tokio::test]
async fn test_attestation_by_wrong_delegate_account_rejected() {
    let (schemas, ctype) = directory_with_membership();
    let ledger = Arc::new(InMemoryLedger::new());
    let delegations = Arc::new(InMemoryDelegationStore::new());

    let root_owner = KeyPair::generate();
    let delegate = KeyPair::generate();
    let impostor = KeyPair::generate();
    delegations.insert_root(DelegationRootNode::new(
        RootId::new("root-1"),
        root_owner.public_key(),
        *ctype.hash(),
    ));
    delegations.insert_node(certus_delegation::DelegationNode {
        id: DelegationId::new("delegate-1"),
        root_id: RootId::new("root-1"),
        parent_id: None,
        account: delegate.public_key(),
        permissions: PermissionSet::of(&[Permission::Attest]),
        revoked: false,
    });

    // the impostor names the delegate's delegation but signs with its own key
    let attested = attest(
        &ctype,
        &ledger,
        &impostor,
        Some(DelegationId::new("delegate-1")),
        serde_json::json!({"member-name": "Mallory"}),
        vec![],
    );

    let verifier = TrustVerifier::new(schemas, delegations, ledger, VerifierConfig::default());
    let report = verifier.verify(&attested).await.expect("no infra fault");
    assert_eq!(report.status, VerificationStatus::Unverified);
    let (_, check) = report.first_failure().expect("a check failed");
    assert_eq!(check.name, "delegation_authority");
}

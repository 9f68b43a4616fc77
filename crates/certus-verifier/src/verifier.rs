use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::BoxFuture;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

use certus_attestation::{AttestationError, AttestedClaim};
use certus_core::{ClaimHash, DelegationId, VerifierConfig};
use certus_crypto::{PublicKey, Signature};
use certus_delegation::{find_root_node, DelegationError, DelegationStore, Permission};
use certus_schema::{SchemaDirectory, SchemaError};

use crate::collaborators::{AttestationLedger, ContactDirectory};
use crate::error::VerifierError;
use crate::status::{VerificationCheck, VerificationReport, VerificationStatus};

type Shared = Option<Result<Arc<VerificationReport>, VerifierError>>;

enum CacheSlot {
    /// A verification for this signature is in flight; the receiver
    /// resolves to its result.
    Pending(watch::Receiver<Shared>),
    /// Terminal result of the last verification run.
    Terminal {
        report: Arc<VerificationReport>,
        at: Instant,
    },
}

enum Claimed {
    Done(Arc<VerificationReport>),
    Waiter(watch::Receiver<Shared>),
    Winner(watch::Sender<Shared>),
}

/// Verifies attested claims against the schema directory, delegation
/// store, and attestation ledger.
///
/// The status cache is keyed by attestation signature. Only the task
/// that transitioned a key into `Pending` writes its terminal result;
/// every other concurrent request for the same signature awaits that
/// result instead of issuing duplicate collaborator calls.
pub struct TrustVerifier {
    schemas: Arc<dyn SchemaDirectory>,
    delegations: Arc<dyn DelegationStore>,
    ledger: Arc<dyn AttestationLedger>,
    contacts: Option<Arc<dyn ContactDirectory>>,
    config: VerifierConfig,
    cache: DashMap<String, CacheSlot>,
}

impl TrustVerifier {
    /// Create a verifier over the given collaborators.
    pub fn new(
        schemas: Arc<dyn SchemaDirectory>,
        delegations: Arc<dyn DelegationStore>,
        ledger: Arc<dyn AttestationLedger>,
        config: VerifierConfig,
    ) -> Self {
        Self {
            schemas,
            delegations,
            ledger,
            contacts: None,
            config,
            cache: DashMap::new(),
        }
    }

    /// Attach a contact directory used to annotate reports with attester
    /// display names.
    pub fn with_contacts(mut self, contacts: Arc<dyn ContactDirectory>) -> Self {
        self.contacts = Some(contacts);
        self
    }

    /// Verify an attested claim and everything it transitively depends
    /// on.
    ///
    /// Validation failures produce an `Unverified` report; only
    /// infrastructural faults (unreachable collaborator, cyclic graph)
    /// are returned as errors.
    pub async fn verify(
        &self,
        attested: &AttestedClaim,
    ) -> Result<Arc<VerificationReport>, VerifierError> {
        // reject malformed graphs before any collaborator work
        attested.collect_subgraph().map_err(map_graph_error)?;
        self.verify_node(attested, HashSet::new()).await
    }

    /// Drop cached terminal results for the whole subgraph, then verify.
    pub async fn verify_fresh(
        &self,
        attested: &AttestedClaim,
    ) -> Result<Arc<VerificationReport>, VerifierError> {
        for node in attested.collect_subgraph().map_err(map_graph_error)? {
            let key = node.attestation.signature.to_hex();
            if let Some(slot) = self.cache.get(&key) {
                // an in-flight run is left alone; its result will be fresh
                if matches!(*slot, CacheSlot::Terminal { .. }) {
                    drop(slot);
                    self.cache.remove(&key);
                }
            }
        }
        self.verify_node(attested, HashSet::new()).await
    }

    /// Observe the cached status for an attestation signature.
    pub fn status(&self, signature: &Signature) -> Option<VerificationStatus> {
        self.cache
            .get(&signature.to_hex())
            .map(|slot| match &*slot {
                CacheSlot::Pending(_) => VerificationStatus::Pending,
                CacheSlot::Terminal { report, .. } => report.status,
            })
    }

    fn verify_node<'a>(
        &'a self,
        node: &'a AttestedClaim,
        path: HashSet<ClaimHash>,
    ) -> BoxFuture<'a, Result<Arc<VerificationReport>, VerifierError>> {
        Box::pin(async move {
            let hash = node.attestation.claim_hash;
            if path.contains(&hash) {
                return Err(VerifierError::CyclicGraph(hash));
            }
            let key = node.attestation.signature.to_hex();

            match self.claim_slot(&key) {
                Claimed::Done(report) => {
                    // a cached Verified verdict never outlives a revocation
                    // anywhere in its subtree
                    if report.verified() && self.subtree_revoked(&report).await? {
                        tracing::debug!(claim = %hash, "cached verdict invalidated by revocation");
                        self.cache.remove(&key);
                        return self.verify_node(node, path).await;
                    }
                    Ok(report)
                }
                Claimed::Waiter(mut rx) => {
                    tracing::debug!(claim = %hash, "verification in flight, awaiting result");
                    loop {
                        let ready = rx.borrow().clone();
                        if let Some(result) = ready {
                            return result;
                        }
                        rx.changed().await.map_err(|_| {
                            VerifierError::CollaboratorUnavailable(
                                "in-flight verification dropped".into(),
                            )
                        })?;
                    }
                }
                Claimed::Winner(tx) => {
                    let mut child_path = path;
                    child_path.insert(hash);

                    match self.compute(node, child_path).await {
                        Ok(report) => {
                            self.cache.insert(
                                key,
                                CacheSlot::Terminal {
                                    report: Arc::clone(&report),
                                    at: Instant::now(),
                                },
                            );
                            let _ = tx.send(Some(Ok(Arc::clone(&report))));
                            tracing::info!(claim = %hash, status = %report.status, "verification finished");
                            Ok(report)
                        }
                        Err(e) => {
                            // leave no terminal entry so callers can retry
                            self.cache.remove(&key);
                            let _ = tx.send(Some(Err(e.clone())));
                            Err(e)
                        }
                    }
                }
            }
        })
    }

    /// Whether any claim in the cached report's subtree has been revoked
    /// on the ledger since the report was produced.
    async fn subtree_revoked(&self, report: &VerificationReport) -> Result<bool, VerifierError> {
        for claim_hash in report.claim_hashes() {
            if self.ledger.is_revoked(&claim_hash).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Atomic check-and-set on the cache entry for `key`. Exactly one
    /// caller becomes the winner for a pending key.
    fn claim_slot(&self, key: &str) -> Claimed {
        match self.cache.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => match occupied.get() {
                CacheSlot::Pending(rx) => Claimed::Waiter(rx.clone()),
                CacheSlot::Terminal { report, at } => {
                    let expired = self
                        .config
                        .cache_ttl
                        .map(|ttl| at.elapsed() > ttl)
                        .unwrap_or(false);
                    if expired {
                        let (tx, rx) = watch::channel(None);
                        occupied.insert(CacheSlot::Pending(rx));
                        Claimed::Winner(tx)
                    } else {
                        Claimed::Done(Arc::clone(report))
                    }
                }
            },
            Entry::Vacant(vacant) => {
                let (tx, rx) = watch::channel(None);
                vacant.insert(CacheSlot::Pending(rx));
                Claimed::Winner(tx)
            }
        }
    }

    /// Run the per-node checks and recurse into legitimations. `path`
    /// already contains this node's claim hash.
    async fn compute(
        &self,
        node: &AttestedClaim,
        path: HashSet<ClaimHash>,
    ) -> Result<Arc<VerificationReport>, VerifierError> {
        let claim = &node.claim;
        let attestation = &node.attestation;
        let attester_name = self.resolve_attester(&attestation.attester).await;
        let mut checks = Vec::new();

        // claim shape against the schema
        match self.schemas.get_schema(&claim.ctype_hash).await {
            Err(SchemaError::Unavailable(detail)) => {
                return Err(VerifierError::CollaboratorUnavailable(detail));
            }
            Err(e) => return Err(e.into()),
            Ok(None) => {
                checks.push(VerificationCheck::failed(
                    "schema_resolved",
                    format!("schema {} not found", claim.ctype_hash),
                ));
                return Ok(finish(node, attester_name, checks, vec![]));
            }
            Ok(Some(ctype)) => {
                checks.push(VerificationCheck::passed("schema_resolved"));
                if !ctype.validate_claim(&claim.contents) {
                    checks.push(VerificationCheck::failed(
                        "claim_valid",
                        "claim contents do not conform to the schema",
                    ));
                    return Ok(finish(node, attester_name, checks, vec![]));
                }
                checks.push(VerificationCheck::passed("claim_valid"));
            }
        }

        // revocation: the locally observed flag plus a fresh ledger check
        let revoked = attestation.revoked || self.ledger.is_revoked(&attestation.claim_hash).await?;
        if revoked {
            checks.push(VerificationCheck::failed(
                "not_revoked",
                "attestation has been revoked",
            ));
            return Ok(finish(node, attester_name, checks, vec![]));
        }
        checks.push(VerificationCheck::passed("not_revoked"));

        // delegated authority
        if let Some(delegation_id) = &attestation.delegation_id {
            match self.check_delegation(delegation_id, &attestation.attester).await? {
                Ok(()) => checks.push(VerificationCheck::passed("delegation_authority")),
                Err(reason) => {
                    checks.push(VerificationCheck::failed("delegation_authority", reason));
                    return Ok(finish(node, attester_name, checks, vec![]));
                }
            }
        }

        // signature binding
        let hash_consistent = match claim.hash() {
            Ok(computed) => computed == attestation.claim_hash,
            Err(e) => return Err(VerifierError::CollaboratorUnavailable(e.to_string())),
        };
        if !hash_consistent {
            checks.push(VerificationCheck::failed(
                "signature_valid",
                "attestation does not reference this claim",
            ));
            return Ok(finish(node, attester_name, checks, vec![]));
        }
        if !attestation.verify_signature() {
            checks.push(VerificationCheck::failed(
                "signature_valid",
                "signature does not bind the claim hash to the attester key",
            ));
            return Ok(finish(node, attester_name, checks, vec![]));
        }
        checks.push(VerificationCheck::passed("signature_valid"));

        // conjunctive recursion into legitimations; sibling order carries
        // no meaning and the conjunction is commutative
        let mut child_futures = Vec::with_capacity(node.legitimations.len());
        for legitimation in &node.legitimations {
            child_futures.push(self.verify_node(legitimation, path.clone()));
        }
        let results: Vec<Result<Arc<VerificationReport>, VerifierError>> =
            match self.config.max_fanout {
                Some(limit) => stream::iter(child_futures).buffered(limit.max(1)).collect().await,
                None => futures::future::join_all(child_futures).await,
            };
        let mut legitimations = Vec::with_capacity(results.len());
        for result in results {
            legitimations.push(result?);
        }

        Ok(finish(node, attester_name, checks, legitimations))
    }

    /// Resolve whether a delegation grants the attester authority to
    /// attest. Inner `Err` is a validation failure; outer `Err` is
    /// infrastructural.
    async fn check_delegation(
        &self,
        id: &DelegationId,
        attester: &PublicKey,
    ) -> Result<Result<(), String>, VerifierError> {
        let node = match self.delegations.get_node(id).await {
            Ok(Some(node)) => node,
            Ok(None) => return Ok(Err(format!("delegation node {} not found", id))),
            Err(DelegationError::Unavailable(detail)) => {
                return Err(VerifierError::CollaboratorUnavailable(detail));
            }
            Err(e) => return Err(e.into()),
        };
        if node.account != *attester {
            return Ok(Err("delegation was issued to a different account".into()));
        }
        if node.revoked {
            return Ok(Err("delegation node is revoked".into()));
        }
        if !node.permissions.contains(Permission::Attest) {
            return Ok(Err("delegation does not carry the ATTEST permission".into()));
        }

        let root = match find_root_node(self.delegations.as_ref(), id).await {
            Ok(root) => root,
            Err(DelegationError::RootNotFound(detail)) => {
                return Ok(Err(format!("delegation root not found: {}", detail)));
            }
            Err(DelegationError::Unavailable(detail)) => {
                return Err(VerifierError::CollaboratorUnavailable(detail));
            }
            Err(e) => return Err(e.into()),
        };
        if root.revoked {
            return Ok(Err("delegation root is revoked".into()));
        }
        Ok(Ok(()))
    }

    async fn resolve_attester(&self, key: &PublicKey) -> Option<String> {
        let contacts = self.contacts.as_ref()?;
        match contacts.resolve(key).await {
            Ok(identity) => identity.map(|i| i.name),
            Err(e) => {
                tracing::debug!(error = %e, "contact resolution failed, leaving report unannotated");
                None
            }
        }
    }
}

fn finish(
    node: &AttestedClaim,
    attester_name: Option<String>,
    checks: Vec<VerificationCheck>,
    legitimations: Vec<Arc<VerificationReport>>,
) -> Arc<VerificationReport> {
    let passed = checks.iter().all(|c| c.passed)
        && legitimations.iter().all(|report| report.verified());
    Arc::new(VerificationReport {
        claim_hash: node.attestation.claim_hash,
        attester: node.attestation.attester,
        attester_name,
        status: if passed {
            VerificationStatus::Verified
        } else {
            VerificationStatus::Unverified
        },
        checks,
        legitimations: legitimations
            .into_iter()
            .map(|report| (*report).clone())
            .collect(),
    })
}

fn map_graph_error(e: AttestationError) -> VerifierError {
    match e {
        AttestationError::CyclicGraph(hash) => VerifierError::CyclicGraph(hash),
        other => VerifierError::CollaboratorUnavailable(other.to_string()),
    }
}

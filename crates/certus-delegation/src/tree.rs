use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashSet;

use certus_core::{DelegationId, RootId};

use crate::error::DelegationError;
use crate::node::{DelegationNode, DelegationRootNode};
use crate::offer::DelegationData;

/// Collaborator resolving delegation records, typically backed by the
/// ledger. `Ok(None)` means not found; transport failures are
/// [`DelegationError::Unavailable`].
#[async_trait]
pub trait DelegationStore: Send + Sync {
    /// Resolve a delegation node by id.
    async fn get_node(&self, id: &DelegationId)
        -> Result<Option<DelegationNode>, DelegationError>;

    /// Resolve a delegation root by id.
    async fn get_root(&self, id: &RootId)
        -> Result<Option<DelegationRootNode>, DelegationError>;
}

/// Walk `parent_id` links upward from `start` and resolve the root record
/// anchoring the chain.
///
/// `start` is resolved as a node first; an id with no node record is
/// treated as naming the root itself (an inviter who is the root owner),
/// so a node is always reachable even when its id collides with a root
/// id. Fails with [`DelegationError::RootNotFound`] when any link in the
/// chain is missing, or when the chain's parent links loop.
pub async fn find_root_node(
    store: &dyn DelegationStore,
    start: &DelegationId,
) -> Result<DelegationRootNode, DelegationError> {
    let mut current = match store.get_node(start).await? {
        Some(node) => node,
        None => {
            return store
                .get_root(&RootId::new(start.as_str()))
                .await?
                .ok_or_else(|| DelegationError::RootNotFound(start.to_string()));
        }
    };

    let mut visited: HashSet<String> = HashSet::new();
    visited.insert(current.id.as_str().to_string());

    while let Some(parent_id) = current.parent_id.clone() {
        if !visited.insert(parent_id.as_str().to_string()) {
            return Err(DelegationError::RootNotFound(format!(
                "parent links loop at {}",
                parent_id
            )));
        }
        current = store
            .get_node(&parent_id)
            .await?
            .ok_or_else(|| DelegationError::RootNotFound(parent_id.to_string()))?;
    }

    store
        .get_root(&current.root_id)
        .await?
        .ok_or_else(|| DelegationError::RootNotFound(current.root_id.to_string()))
}

/// Construct a delegation node from an accepted offer.
///
/// Resolves the inviter's authority and enforces the permission bound:
/// the new node's permissions must be a subset of the parent's (the root
/// grants the full set). When the inviter is the root itself, the node is
/// normalized to carry no `parent_id`. The caller is responsible for
/// submitting the node externally.
pub async fn create_node(
    store: &dyn DelegationStore,
    data: &DelegationData,
) -> Result<DelegationNode, DelegationError> {
    let root = find_root_node(store, &data.parent_id).await?;
    let parent = if root.root_id.as_str() == data.parent_id.as_str() {
        None
    } else {
        Some(
            store
                .get_node(&data.parent_id)
                .await?
                .ok_or_else(|| DelegationError::NodeNotFound(data.parent_id.to_string()))?,
        )
    };

    let node = DelegationNode::new(
        data.id.clone(),
        root.root_id.clone(),
        data.account,
        data.permissions.clone(),
        parent.as_ref(),
    )?;
    tracing::info!(node = %node.id, root = %node.root_id, "delegation node created");
    Ok(node)
}

/// In-memory delegation store for tests and local caching.
pub struct InMemoryDelegationStore {
    nodes: DashMap<String, DelegationNode>,
    roots: DashMap<String, DelegationRootNode>,
}

impl InMemoryDelegationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            nodes: DashMap::new(),
            roots: DashMap::new(),
        }
    }

    /// Insert or replace a root record.
    pub fn insert_root(&self, root: DelegationRootNode) {
        self.roots.insert(root.root_id.as_str().to_string(), root);
    }

    /// Insert or replace a node record.
    pub fn insert_node(&self, node: DelegationNode) {
        self.nodes.insert(node.id.as_str().to_string(), node);
    }

    /// Mark a root revoked. Returns false if the root is unknown.
    pub fn revoke_root(&self, id: &RootId) -> bool {
        match self.roots.get_mut(id.as_str()) {
            Some(mut root) => {
                root.revoke();
                true
            }
            None => false,
        }
    }

    /// Mark a node revoked. Returns false if the node is unknown.
    pub fn revoke_node(&self, id: &DelegationId) -> bool {
        match self.nodes.get_mut(id.as_str()) {
            Some(mut node) => {
                node.revoke();
                true
            }
            None => false,
        }
    }
}

impl Default for InMemoryDelegationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DelegationStore for InMemoryDelegationStore {
    async fn get_node(
        &self,
        id: &DelegationId,
    ) -> Result<Option<DelegationNode>, DelegationError> {
        Ok(self.nodes.get(id.as_str()).map(|entry| entry.clone()))
    }

    async fn get_root(
        &self,
        id: &RootId,
    ) -> Result<Option<DelegationRootNode>, DelegationError> {
        Ok(self.roots.get(id.as_str()).map(|entry| entry.clone()))
    }
}

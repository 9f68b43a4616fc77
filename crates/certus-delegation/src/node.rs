use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use certus_core::{DelegationId, RootId, SchemaHash};
use certus_crypto::PublicKey;

use crate::error::DelegationError;

/// A single delegation permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Permission {
    /// May attest claims under this tree.
    Attest,
    /// May invite further delegates under this node.
    Delegate,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attest => write!(f, "ATTEST"),
            Self::Delegate => write!(f, "DELEGATE"),
        }
    }
}

/// Set of permissions carried by a delegation node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    /// Empty set: the node may neither attest nor delegate.
    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    /// The full permission set. This is the implicit authority of a
    /// delegation root.
    pub fn all() -> Self {
        Self::of(&[Permission::Attest, Permission::Delegate])
    }

    /// Build a set from a slice of permissions.
    pub fn of(permissions: &[Permission]) -> Self {
        Self(permissions.iter().copied().collect())
    }

    /// Check membership.
    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    /// Subset test: a delegate can never hold more authority than its
    /// parent grants.
    pub fn is_subset(&self, other: &PermissionSet) -> bool {
        self.0.is_subset(&other.0)
    }

    /// Number of permissions in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Anchor of a delegation tree, registered once on the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelegationRootNode {
    /// Unique root identifier.
    pub root_id: RootId,
    /// The account that registered the root; ultimate authority of the tree.
    pub owner: PublicKey,
    /// CType this tree attests for.
    pub ctype_hash: SchemaHash,
    /// Revoking the root invalidates the entire subtree.
    pub revoked: bool,
}

impl DelegationRootNode {
    /// Create a new, unrevoked root record.
    pub fn new(root_id: RootId, owner: PublicKey, ctype_hash: SchemaHash) -> Self {
        Self {
            root_id,
            owner,
            ctype_hash,
            revoked: false,
        }
    }

    /// Revoke the root. Monotonic: revocation is never undone.
    pub fn revoke(&mut self) {
        self.revoked = true;
    }
}

/// A delegation created by accepting a signed offer.
///
/// Immutable after creation except for the monotonic revocation flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelegationNode {
    /// Node identifier.
    pub id: DelegationId,
    /// Root this node traces to; always resolves to exactly one root.
    pub root_id: RootId,
    /// Parent node; `None` for nodes directly under the root.
    pub parent_id: Option<DelegationId>,
    /// The delegate's account.
    pub account: PublicKey,
    /// Permissions granted to the delegate.
    pub permissions: PermissionSet,
    /// Observed revocation state.
    pub revoked: bool,
}

impl DelegationNode {
    /// Construct a node under an already-resolved parent authority,
    /// enforcing the permission bound. `parent` is `None` when the
    /// inviter is the root itself, whose implicit authority is the full
    /// set; the new node then carries no `parent_id`.
    pub fn new(
        id: DelegationId,
        root_id: RootId,
        account: PublicKey,
        permissions: PermissionSet,
        parent: Option<&DelegationNode>,
    ) -> Result<Self, DelegationError> {
        let parent_permissions = parent
            .map(|node| node.permissions.clone())
            .unwrap_or_else(PermissionSet::all);
        if !permissions.is_subset(&parent_permissions) {
            return Err(DelegationError::PermissionEscalation);
        }
        Ok(Self {
            id,
            root_id,
            parent_id: parent.map(|node| node.id.clone()),
            account,
            permissions,
            revoked: false,
        })
    }

    /// Revoke the node. Monotonic: revocation is never undone.
    pub fn revoke(&mut self) {
        self.revoked = true;
    }
}

/// Locally-known alias for a delegation, used when presenting an offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelegationMetadata {
    /// Delegation node the alias belongs to.
    pub id: DelegationId,
    /// Human-chosen alias.
    pub alias: String,
}

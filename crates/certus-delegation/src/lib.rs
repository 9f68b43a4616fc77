//! Certus Delegation — hierarchical attestation authority.
//!
//! A delegation tree anchors at an on-chain root registration and grows
//! by signed, accepted offers. Every node carries a permission set
//! bounded by its parent's; revocation of the root invalidates the whole
//! subtree.

pub mod error;
pub mod node;
pub mod offer;
pub mod tree;

pub use error::DelegationError;
pub use node::{
    DelegationMetadata, DelegationNode, DelegationRootNode, Permission, PermissionSet,
};
pub use offer::{sign_offer, verify_offer, DelegationData};
pub use tree::{create_node, find_root_node, DelegationStore, InMemoryDelegationStore};

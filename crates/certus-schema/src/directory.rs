use async_trait::async_trait;
use dashmap::DashMap;

use certus_core::SchemaHash;

use crate::ctype::CType;
use crate::error::SchemaError;

/// Collaborator resolving schema hashes to registered CTypes.
///
/// `Ok(None)` means the schema is not registered; transport failures are
/// reported as [`SchemaError::Unavailable`] and are distinct from
/// not-found.
#[async_trait]
pub trait SchemaDirectory: Send + Sync {
    /// Resolve a CType by its content hash.
    async fn get_schema(&self, hash: &SchemaHash) -> Result<Option<CType>, SchemaError>;
}

/// In-memory schema directory backed by a concurrent map.
pub struct InMemorySchemaDirectory {
    schemas: DashMap<SchemaHash, CType>,
}

impl InMemorySchemaDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self {
            schemas: DashMap::new(),
        }
    }

    /// Register a CType under its content hash.
    pub fn register(&self, ctype: CType) {
        tracing::debug!(schema = %ctype.hash(), "schema registered");
        self.schemas.insert(*ctype.hash(), ctype);
    }

    /// Number of registered schemas.
    pub fn count(&self) -> usize {
        self.schemas.len()
    }
}

impl Default for InMemorySchemaDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SchemaDirectory for InMemorySchemaDirectory {
    async fn get_schema(&self, hash: &SchemaHash) -> Result<Option<CType>, SchemaError> {
        Ok(self.schemas.get(hash).map(|entry| entry.clone()))
    }
}

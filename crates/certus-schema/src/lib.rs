//! Certus Schema — CType claim schemas.
//!
//! A CType is the canonical, content-hashed definition of a claim's shape:
//! ordered fields with declared value types, locale-keyed titles, and a
//! schema-declared required list. CTypes are authored through an ordered
//! input model and the transform is reversible without loss.

pub mod ctype;
pub mod directory;
pub mod error;
pub mod input_model;

pub use ctype::{CType, CTypeField, CTypeMetadata, ValueType};
pub use directory::{InMemorySchemaDirectory, SchemaDirectory};
pub use error::SchemaError;
pub use input_model::{
    ClaimInputModel, ClaimInputProperty, CTypeInputModel, InputProperty, CTYPE_INPUT_SCHEMA_TAG,
    CTYPE_SCHEMA_TAG,
};

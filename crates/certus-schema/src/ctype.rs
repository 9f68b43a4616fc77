use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use certus_core::SchemaHash;
use certus_crypto::hash_json;

use crate::error::SchemaError;

/// Locale-keyed strings. The `"default"` key is the fallback.
pub type LocalizedString = BTreeMap<String, String>;

/// Declared value type of a CType field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Integer,
    String,
    Boolean,
    Object,
}

impl ValueType {
    /// Check whether a JSON value's runtime type matches this declared
    /// type. No coercion: a numeric field fed a string fails, a boolean
    /// is not an integer.
    pub fn matches(&self, value: &serde_json::Value) -> bool {
        match self {
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::String => value.is_string(),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => write!(f, "integer"),
            Self::String => write!(f, "string"),
            Self::Boolean => write!(f, "boolean"),
            Self::Object => write!(f, "object"),
        }
    }
}

/// A single field of a CType.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CTypeField {
    /// Field key, unique within the CType.
    pub key: String,
    /// Declared value type.
    pub value_type: ValueType,
    /// Locale-keyed field title.
    pub title: LocalizedString,
}

/// Locale-keyed CType metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CTypeMetadata {
    pub title: LocalizedString,
    pub description: LocalizedString,
}

/// Canonical representation of a claim type.
///
/// Field order is authoring order and is preserved; the content hash is
/// computed once at construction and the CType is immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CType {
    id: String,
    metadata: CTypeMetadata,
    fields: Vec<CTypeField>,
    required: Vec<String>,
    hash: SchemaHash,
}

impl CType {
    pub(crate) fn build(
        id: String,
        metadata: CTypeMetadata,
        fields: Vec<CTypeField>,
        required: Vec<String>,
    ) -> Result<Self, SchemaError> {
        let hash = Self::compute_hash(&id, &fields, &required)?;
        Ok(Self {
            id,
            metadata,
            fields,
            required,
            hash,
        })
    }

    /// Content hash over the canonical schema: id, field keys and types,
    /// and the required list. Titles are presentation metadata and do not
    /// affect identity.
    fn compute_hash(
        id: &str,
        fields: &[CTypeField],
        required: &[String],
    ) -> Result<SchemaHash, SchemaError> {
        let canonical = serde_json::json!({
            "$id": id,
            "properties": fields
                .iter()
                .map(|f| serde_json::json!({ "key": f.key, "type": f.value_type }))
                .collect::<Vec<_>>(),
            "required": required,
        });
        Ok(SchemaHash::from_bytes(hash_json(&canonical)?))
    }

    /// The schema identifier given at authoring time.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The content-derived schema hash.
    pub fn hash(&self) -> &SchemaHash {
        &self.hash
    }

    /// Fields in authoring order.
    pub fn fields(&self) -> &[CTypeField] {
        &self.fields
    }

    /// Keys of fields that must be present in a conforming claim.
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Schema metadata (titles, description).
    pub fn metadata(&self) -> &CTypeMetadata {
        &self.metadata
    }

    /// Look up a field by key.
    pub fn field(&self, key: &str) -> Option<&CTypeField> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Structural validation of claim contents against this CType.
    ///
    /// Valid iff every contents key is a declared field with a matching
    /// runtime type, and every key in the schema-declared required list
    /// is present. An empty required list means typed-if-present.
    pub fn validate_claim(&self, contents: &serde_json::Map<String, serde_json::Value>) -> bool {
        for (key, value) in contents {
            match self.field(key) {
                Some(field) if field.value_type.matches(value) => {}
                _ => return false,
            }
        }
        self.required.iter().all(|key| contents.contains_key(key))
    }
}

/// Resolve a locale-keyed string, falling back to the default.
pub(crate) fn localized<'a>(strings: &'a LocalizedString, locale: &str) -> Option<&'a str> {
    strings
        .get(locale)
        .or_else(|| strings.get("default"))
        .map(String::as_str)
}

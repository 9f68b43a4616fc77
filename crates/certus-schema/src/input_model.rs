//! Ordered input-model representation used for authoring CTypes.
//!
//! The transform to canonical form is lossless: `to_input_model` is the
//! exact inverse of `from_input_model` (field order, titles, and the
//! required list are preserved).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::ctype::{localized, CType, CTypeField, CTypeMetadata, LocalizedString, ValueType};
use crate::error::SchemaError;

/// Meta-schema tag an authoring input model must carry.
pub const CTYPE_INPUT_SCHEMA_TAG: &str = "certus:draft-01/ctype-input";

/// Meta-schema tag of canonical CTypes, carried by derived claim templates.
pub const CTYPE_SCHEMA_TAG: &str = "certus:draft-01/ctype";

/// A single ordered field descriptor in a CType input model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputProperty {
    /// Field key.
    #[serde(rename = "$id")]
    pub id: String,
    /// Human-readable field title.
    pub title: String,
    /// Declared value type.
    #[serde(rename = "type")]
    pub value_type: ValueType,
}

/// Ordered authoring representation of a CType.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CTypeInputModel {
    /// Schema identifier.
    #[serde(rename = "$id")]
    pub id: String,
    /// Meta-schema tag; must equal [`CTYPE_INPUT_SCHEMA_TAG`].
    #[serde(rename = "$schema")]
    pub schema_tag: String,
    /// Free-text schema title.
    pub title: String,
    /// Ordered field descriptors.
    pub properties: Vec<InputProperty>,
    /// Keys of fields a conforming claim must contain.
    pub required: Vec<String>,
}

/// A locale-resolved, per-field labeled template for authoring a claim
/// that conforms to a CType. Purely an authoring aid; never consulted
/// during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimInputProperty {
    #[serde(rename = "$id")]
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
}

/// Locale-resolved claim authoring template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimInputModel {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$schema")]
    pub schema_tag: String,
    pub title: String,
    pub properties: Vec<ClaimInputProperty>,
    pub required: Vec<String>,
}

impl CType {
    /// Build a canonical CType from an ordered input model.
    ///
    /// Fails with [`SchemaError::Format`] when the input model does not
    /// satisfy the fixed meta-schema: wrong `$schema` tag, empty or
    /// duplicate field keys, or required entries that name no declared
    /// field.
    pub fn from_input_model(input: &CTypeInputModel) -> Result<Self, SchemaError> {
        if input.schema_tag != CTYPE_INPUT_SCHEMA_TAG {
            return Err(SchemaError::Format(format!(
                "input model does not correspond to the input meta-schema: got '{}'",
                input.schema_tag
            )));
        }

        let mut seen = HashSet::new();
        for property in &input.properties {
            if property.id.is_empty() {
                return Err(SchemaError::Format("field key must not be empty".into()));
            }
            if !seen.insert(property.id.as_str()) {
                return Err(SchemaError::Format(format!(
                    "duplicate field key: {}",
                    property.id
                )));
            }
        }
        for key in &input.required {
            if !seen.contains(key.as_str()) {
                return Err(SchemaError::Format(format!(
                    "required entry references unknown field: {}",
                    key
                )));
            }
        }

        let fields = input
            .properties
            .iter()
            .map(|property| CTypeField {
                key: property.id.clone(),
                value_type: property.value_type,
                title: default_localized(&property.title),
            })
            .collect();

        let metadata = CTypeMetadata {
            title: default_localized(&input.title),
            description: LocalizedString::new(),
        };

        Self::build(
            input.id.clone(),
            metadata,
            fields,
            input.required.clone(),
        )
    }

    /// Convert back to the ordered input-model form; the exact inverse of
    /// [`CType::from_input_model`].
    pub fn to_input_model(&self) -> CTypeInputModel {
        CTypeInputModel {
            id: self.id().to_string(),
            schema_tag: CTYPE_INPUT_SCHEMA_TAG.to_string(),
            title: localized(&self.metadata().title, "default")
                .unwrap_or_default()
                .to_string(),
            properties: self
                .fields()
                .iter()
                .map(|field| InputProperty {
                    id: field.key.clone(),
                    title: localized(&field.title, "default")
                        .unwrap_or_default()
                        .to_string(),
                    value_type: field.value_type,
                })
                .collect(),
            required: self.required().to_vec(),
        }
    }

    /// Derive a locale-resolved claim authoring template. Falls back to
    /// each field's default title when the locale has no entry.
    pub fn claim_input_model(&self, locale: &str) -> ClaimInputModel {
        ClaimInputModel {
            id: self.id().to_string(),
            schema_tag: CTYPE_SCHEMA_TAG.to_string(),
            title: localized(&self.metadata().title, locale)
                .unwrap_or_default()
                .to_string(),
            properties: self
                .fields()
                .iter()
                .map(|field| ClaimInputProperty {
                    id: field.key.clone(),
                    title: localized(&field.title, locale).unwrap_or_default().to_string(),
                    value_type: field.value_type,
                })
                .collect(),
            required: self.required().to_vec(),
        }
    }
}

fn default_localized(value: &str) -> LocalizedString {
    let mut strings = LocalizedString::new();
    strings.insert("default".to_string(), value.to_string());
    strings
}

//! FieldSchema — the per-RFP extraction contract produced by stage 1.
//!
//! A schema is generated once when the RFP is created and is never edited afterwards.
//! Every extraction against that RFP is conformed to it via [`FieldSchema::conform`].

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::pipeline::values::{normalize_number, FieldValue};

/// Declared type of a schema field. Deserialization is lenient about spelling
/// because the model picks the type names; anything unrecognised becomes `Any`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum FieldType {
    Number,
    Integer,
    String,
    Boolean,
    Array,
    Object,
    Any,
}

impl From<String> for FieldType {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "number" | "float" | "double" | "decimal" | "currency" | "numeric" => Self::Number,
            "integer" | "int" => Self::Integer,
            "string" | "str" | "text" | "date" | "datetime" => Self::String,
            "boolean" | "bool" => Self::Boolean,
            "array" | "list" => Self::Array,
            "object" | "map" => Self::Object,
            _ => Self::Any,
        }
    }
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Integer => "integer",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Any => "any",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub key: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub description: String,
}

impl Field {
    pub fn new(key: &str, field_type: FieldType, description: &str) -> Self {
        Self {
            key: key.to_string(),
            field_type,
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub fields: Vec<Field>,
}

#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("schema has no fields")]
    Empty,

    #[error("schema contains a blank field key")]
    BlankKey,

    #[error("duplicate field key '{0}'")]
    DuplicateKey(String),

    #[error("field '{key}' expected {expected}, got {found}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: String,
    },
}

impl FieldSchema {
    /// Generic two-field schema used whenever synthesis cannot produce a usable one.
    pub fn fallback() -> Self {
        Self {
            fields: vec![
                Field::new("price", FieldType::Number, "Total Price"),
                Field::new("summary", FieldType::String, "Proposal Summary"),
            ],
        }
    }

    /// Shape check: at least one field, no blank keys, keys unique.
    pub fn check(&self) -> Result<(), SchemaError> {
        if self.fields.is_empty() {
            return Err(SchemaError::Empty);
        }
        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.key.trim().is_empty() {
                return Err(SchemaError::BlankKey);
            }
            if !seen.insert(field.key.as_str()) {
                return Err(SchemaError::DuplicateKey(field.key.clone()));
            }
        }
        Ok(())
    }

    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Conforms a raw model object to this schema.
    ///
    /// Keys the schema does not declare are dropped. Numeric strings are normalized
    /// for number/integer fields. Any value that still disagrees with its declared
    /// type is reported as a `TypeMismatch`.
    pub fn conform(
        &self,
        raw: Map<String, Value>,
    ) -> Result<BTreeMap<String, FieldValue>, SchemaError> {
        let mut out = BTreeMap::new();
        for (key, value) in raw {
            let Some(field) = self.field(&key) else {
                debug!("Dropping undeclared key '{key}' from extraction");
                continue;
            };
            let conformed = conform_value(field, value)?;
            out.insert(key, conformed);
        }
        Ok(out)
    }
}

fn conform_value(field: &Field, value: Value) -> Result<FieldValue, SchemaError> {
    if value.is_null() {
        return Ok(FieldValue::Null);
    }

    let mismatch = |found: &Value| SchemaError::TypeMismatch {
        key: field.key.clone(),
        expected: field.field_type.as_str(),
        found: json_kind(found).to_string(),
    };

    match field.field_type {
        FieldType::Any => Ok(FieldValue::from(value)),
        FieldType::Number => match &value {
            Value::Number(n) => Ok(FieldValue::Number(n.clone())),
            Value::String(s) => normalize_number(s)
                .map(FieldValue::Number)
                .ok_or_else(|| mismatch(&value)),
            _ => Err(mismatch(&value)),
        },
        FieldType::Integer => {
            let number = match &value {
                Value::Number(n) => Some(n.clone()),
                Value::String(s) => normalize_number(s),
                _ => None,
            };
            number
                .and_then(|n| integral(&n))
                .map(|i| FieldValue::Number(i.into()))
                .ok_or_else(|| mismatch(&value))
        }
        FieldType::String => match value {
            Value::String(s) => Ok(FieldValue::Text(s)),
            Value::Number(n) => Ok(FieldValue::Text(n.to_string())),
            Value::Bool(b) => Ok(FieldValue::Text(b.to_string())),
            other => Err(mismatch(&other)),
        },
        FieldType::Boolean => match &value {
            Value::Bool(b) => Ok(FieldValue::Boolean(*b)),
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" | "y" => Ok(FieldValue::Boolean(true)),
                "false" | "no" | "n" => Ok(FieldValue::Boolean(false)),
                _ => Err(mismatch(&value)),
            },
            _ => Err(mismatch(&value)),
        },
        FieldType::Array => match value {
            Value::Array(items) => Ok(FieldValue::List(items)),
            other => Err(mismatch(&other)),
        },
        FieldType::Object => match value {
            Value::Object(map) => Ok(FieldValue::Object(map)),
            other => Err(mismatch(&other)),
        },
    }
}

fn integral(n: &serde_json::Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    let f = n.as_f64()?;
    (f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

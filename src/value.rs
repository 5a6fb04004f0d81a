//! Tagged values exchanged between templates, the merger and lookup services.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::Error;

/// String-keyed map of values. Keys are kept sorted, so equality does not
/// depend on insertion order.
pub type Mapping = BTreeMap<String, Value>;

/// A value as seen by a template author.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// The undef marker.
    #[default]
    Null,
    Scalar(Scalar),
    Sequence(Vec<Value>),
    Mapping(Mapping),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Value {
    /// Short name of the value's type, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Scalar(Scalar::Boolean(_)) => "boolean",
            Value::Scalar(Scalar::Integer(_)) => "integer",
            Value::Scalar(Scalar::Float(_)) => "float",
            Value::Scalar(Scalar::String(_)) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(Scalar::String(s))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Scalar(Scalar::Integer(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Scalar(Scalar::Float(x))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(Scalar::Boolean(b))
    }
}

impl From<Mapping> for Value {
    fn from(m: Mapping) -> Self {
        Value::Mapping(m)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<toml::Value> for Value {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => s.into(),
            toml::Value::Integer(i) => i.into(),
            toml::Value::Float(x) => x.into(),
            toml::Value::Boolean(b) => b.into(),
            // No datetime scalar in templates; keep the RFC 3339 text.
            toml::Value::Datetime(dt) => dt.to_string().into(),
            toml::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            toml::Value::Table(table) => Value::Mapping(mapping_from_table(table)),
        }
    }
}

/// Converts a TOML table into a [`Mapping`].
pub fn mapping_from_table(table: toml::Table) -> Mapping {
    table.into_iter().map(|(k, v)| (k, Value::from(v))).collect()
}

/// Decodes a mapping into a typed structure.
///
/// Fails with [`Error::Encode`] when the mapping holds values TOML cannot
/// represent, such as `Null`.
pub fn from_mapping<T: DeserializeOwned>(mapping: &Mapping) -> Result<T, Error> {
    let encoded = toml::Value::try_from(mapping)?;
    Ok(encoded.try_into()?)
}

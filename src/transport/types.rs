use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Value of a structured form field.
///
/// Deserialized values keep the shape they had in the JSON: strings stay
/// `Text` even when they look like dates. `Date` only comes from a
/// `DateTime<Utc>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Integer(i64),
    /// Unsigned values above `i64::MAX`
    UInt(u64),
    Float(f64),
    Date(DateTime<Utc>),
    Text(String),
    Object(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Form-encoded representation: scalars as text, dates as RFC 3339,
    /// objects as compact JSON
    pub fn to_wire(&self) -> String {
        match self {
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::UInt(u) => u.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Date(d) => d.to_rfc3339_opts(SecondsFormat::Millis, true),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Object(_) => serde_json::to_string(self).unwrap_or_default(),
        }
    }
}

impl TryFrom<Value> for FieldValue {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(b) => Ok(FieldValue::Bool(b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(FieldValue::Integer(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(FieldValue::UInt(u))
                } else {
                    n.as_f64()
                        .map(FieldValue::Float)
                        .ok_or_else(|| format!("unrepresentable number {n}"))
                }
            }
            Value::String(s) => Ok(FieldValue::Text(s)),
            Value::Object(map) => map
                .into_iter()
                .map(|(key, value)| Ok((key, FieldValue::try_from(value)?)))
                .collect::<Result<BTreeMap<_, _>, String>>()
                .map(FieldValue::Object),
            Value::Null => Err("null is not a valid field value".to_string()),
            Value::Array(_) => Err("arrays are not valid field values".to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        FieldValue::try_from(value).map_err(D::Error::custom)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        i64::try_from(value)
            .map(FieldValue::Integer)
            .unwrap_or(FieldValue::UInt(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Date(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<BTreeMap<String, FieldValue>> for FieldValue {
    fn from(value: BTreeMap<String, FieldValue>) -> Self {
        FieldValue::Object(value)
    }
}

/// Structured fields sent alongside a payload. Key order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormFields(BTreeMap<String, FieldValue>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    /// Copy of `self` overlaid with `other`; keys in `other` win
    pub fn merged(&self, other: &FormFields) -> FormFields {
        let mut merged = self.clone();
        for (key, value) in &other.0 {
            merged.0.insert(key.clone(), value.clone());
        }
        merged
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FormFields
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = FormFields::new();
        for (key, value) in iter {
            fields.insert(key, value);
        }
        fields
    }
}

/// One binary attachment: a whole file or one chunk of it
#[derive(Debug, Clone)]
pub struct FilePayload {
    pub file_name: String,
    pub mime_type: String,
    pub data: Bytes,
}

/// Everything the transport needs for a single request
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub endpoint: String,
    pub fields: FormFields,
    pub payload: FilePayload,
    /// Form key the payload is attached under
    pub file_field_name: String,
}

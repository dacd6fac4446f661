/// Value types exchanged with the data structure facade
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

/// Maximum number of matches returned by a geo radius query.
pub const GEO_RADIUS_LIMIT: usize = 10;

/// A hash field value.
///
/// Redis stores every field as a string. Values are written in their JSON
/// form, so text is stored quoted and `"007"` reads back as text while `7`
/// reads back as an integer. Raw values written by other clients that are
/// not valid JSON read back as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Structured(serde_json::Value),
}

impl FieldValue {
    pub fn encode(&self) -> String {
        match self {
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(|n| n.to_string())
                .unwrap_or_else(|| f.to_string()),
            FieldValue::Text(s) => serde_json::Value::String(s.clone()).to_string(),
            FieldValue::Structured(v) => v.to_string(),
        }
    }

    pub fn decode(raw: String) -> Self {
        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(value) => FieldValue::from_json(value),
            Err(_) => FieldValue::Text(raw),
        }
    }

    fn from_json(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Bool(b) => FieldValue::Bool(b),
            Value::String(s) => FieldValue::Text(s),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => FieldValue::Integer(i),
                (None, Some(f)) => FieldValue::Float(f),
                (None, None) => FieldValue::Structured(Value::Number(n)),
            },
            other => FieldValue::Structured(other),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

/// Remaining lifetime of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTtl {
    /// The key does not exist.
    Absent,
    /// The key exists and never expires.
    Persistent,
    /// Seconds until the key expires.
    Expiring(u64),
}

impl KeyTtl {
    pub const ABSENT_SENTINEL: i64 = -2;
    pub const PERSISTENT_SENTINEL: i64 = -1;

    /// Interpret the integer reply of `TTL`.
    pub fn from_redis(raw: i64) -> Self {
        match raw {
            Self::PERSISTENT_SENTINEL => KeyTtl::Persistent,
            n if n >= 0 => KeyTtl::Expiring(n as u64),
            _ => KeyTtl::Absent,
        }
    }

    /// Seconds remaining, or the negative Redis sentinel.
    pub fn as_seconds(&self) -> i64 {
        match self {
            KeyTtl::Absent => Self::ABSENT_SENTINEL,
            KeyTtl::Persistent => Self::PERSISTENT_SENTINEL,
            KeyTtl::Expiring(secs) => i64::try_from(*secs).unwrap_or(i64::MAX),
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            KeyTtl::Absent => "absent",
            KeyTtl::Persistent => "persistent",
            KeyTtl::Expiring(_) => "expiring",
        }
    }

    pub fn describe(&self) -> String {
        match self {
            KeyTtl::Absent => "key does not exist".to_string(),
            KeyTtl::Persistent => "key has no expiry".to_string(),
            KeyTtl::Expiring(secs) => format!("key expires in {secs} seconds"),
        }
    }
}

/// Iteration order for sorted set range queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOrder {
    Ascending,
    Descending,
}

/// One hit of a geo radius query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoMatch {
    pub name: String,
    /// Distance from the query centre in kilometres
    #[serde(rename = "distance")]
    pub distance_km: f64,
    pub longitude: f64,
    pub latitude: f64,
}

/// A named point for the spatial index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Location {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub longitude: f64,
    pub latitude: f64,
}

/// User profile stored as a hash, one field per attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct UserProfile {
    #[validate(length(min = 1, max = 64))]
    pub id: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(range(max = 150))]
    pub age: Option<u32>,
}

impl UserProfile {
    pub fn to_fields(&self) -> BTreeMap<String, FieldValue> {
        let mut fields = BTreeMap::new();
        fields.insert("id".to_string(), FieldValue::Text(self.id.clone()));
        fields.insert("name".to_string(), FieldValue::Text(self.name.clone()));
        fields.insert("email".to_string(), FieldValue::Text(self.email.clone()));
        if let Some(age) = self.age {
            fields.insert("age".to_string(), FieldValue::Integer(i64::from(age)));
        }
        fields
    }
}

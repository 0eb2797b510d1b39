//! Generic list records.
//!
//! Every list screen (vehicles, transactions, lost-and-found reports, wishlist
//! entries) works on the same shape: a JSON object with an identifier plus
//! whatever attributes the collaborator API returns. Attributes are addressed
//! with dotted paths such as `user.fname` or `Booking.User.email`. Missing
//! associations simply read as absent.

use std::fmt;

use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{RentalError, Result};

/// Attribute holding the record identifier.
pub const ID_FIELD: &str = "id";

/// Normalized record identifier.
///
/// The API returns numeric ids for most tables; they are kept as strings so
/// that lookups do not care whether the id arrived as `5` or `"5"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

/// A single list item.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: RecordId,
    fields: Map<String, Value>,
}

impl Record {
    /// Build a record from a JSON object, reading its identifier.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Self::from_map(fields),
            other => Err(RentalError::Envelope(format!(
                "expected a record object, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn from_map(fields: Map<String, Value>) -> Result<Self> {
        let id = match fields.get(ID_FIELD) {
            Some(Value::String(s)) if !s.trim().is_empty() => RecordId::new(s.trim()),
            Some(Value::Number(n)) => RecordId::new(n.to_string()),
            _ => {
                return Err(RentalError::Envelope(
                    "record is missing an 'id' attribute".to_string(),
                ));
            }
        };
        Ok(Self { id, fields })
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    /// Look up a dotted path, e.g. `Booking.User.fname`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let first = parts.next()?;
        let mut current = self.fields.get(first)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        match current {
            Value::Null => None,
            v => Some(v),
        }
    }

    /// Read an attribute as display text. Scalars only; objects and arrays
    /// are opaque and read as absent.
    pub fn text(&self, path: &str) -> Option<String> {
        match self.get(path)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Read an attribute as a number. Numeric strings such as `"4500.00"` count.
    pub fn number(&self, path: &str) -> Option<f64> {
        match self.get(path)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Read an attribute as an instant.
    ///
    /// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates (midnight UTC).
    pub fn timestamp(&self, path: &str) -> Option<Timestamp> {
        match self.get(path)? {
            Value::String(s) => parse_instant(s),
            Value::Number(n) => n
                .as_i64()
                .and_then(|ms| Timestamp::from_millisecond(ms).ok()),
            _ => None,
        }
    }

    /// Merge top-level attributes into this record. The identifier never changes.
    pub fn merge(&mut self, patch: &Map<String, Value>) {
        for (key, value) in patch {
            if key == ID_FIELD {
                continue;
            }
            self.fields.insert(key.clone(), value.clone());
        }
    }

    pub fn set(&mut self, key: &str, value: Value) {
        if key != ID_FIELD {
            self.fields.insert(key.to_string(), value);
        }
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.fields.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Record::from_value(value).map_err(serde::de::Error::custom)
    }
}

/// Parse an RFC 3339 instant or a civil date.
pub fn parse_instant(s: &str) -> Option<Timestamp> {
    let s = s.trim();
    if let Ok(ts) = s.parse::<Timestamp>() {
        return Some(ts);
    }
    s.parse::<Date>()
        .ok()
        .and_then(|d| d.to_zoned(jiff::tz::TimeZone::UTC).ok())
        .map(|z| z.timestamp())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

//! Response envelopes of the marketplace API.
//!
//! List endpoints answer `{ "data": [...] }`, `{ "success": true, "msg": [...] }`
//! or a bare array. Write endpoints answer the mutated record (bare, or under
//! `data`/`item`) or a `{ "success", "message" }` acknowledgement.

use serde_json::{Map, Value};

use crate::error::{RentalError, Result};
use crate::record::{ID_FIELD, Record};

use super::WriteOutcome;

const LIST_KEYS: &[&str] = &["data", "msg", "items"];
const RECORD_KEYS: &[&str] = &["data", "item"];
const MESSAGE_KEYS: &[&str] = &["message", "error", "msg"];

/// Human-readable message carried by a response body, if any.
pub fn error_message(body: &Value) -> Option<String> {
    let map = body.as_object()?;
    MESSAGE_KEYS.iter().find_map(|key| match map.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(inner) => inner
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    })
}

fn is_failure(map: &Map<String, Value>) -> bool {
    let unsuccessful = map.get("success").and_then(Value::as_bool) == Some(false);
    let has_error = map.get("error").is_some_and(|e| !e.is_null());
    unsuccessful || has_error
}

fn failure(body: &Value) -> RentalError {
    RentalError::Api(
        error_message(body).unwrap_or_else(|| "request was not successful".to_string()),
    )
}

fn records(items: Vec<Value>) -> Result<Vec<Record>> {
    items.into_iter().map(Record::from_value).collect()
}

/// Unwrap a list response into records.
pub fn parse_list_response(body: Value) -> Result<Vec<Record>> {
    match body {
        Value::Array(items) => records(items),
        Value::Object(mut map) => {
            if map.get("success").and_then(Value::as_bool) == Some(false) {
                return Err(failure(&Value::Object(map)));
            }
            for key in LIST_KEYS {
                match map.remove(*key) {
                    Some(Value::Array(items)) => return records(items),
                    Some(Value::Null) => return Ok(Vec::new()),
                    _ => {}
                }
            }
            Err(RentalError::Envelope(
                "expected a list under 'data' or 'msg'".to_string(),
            ))
        }
        Value::Null => Ok(Vec::new()),
        _ => Err(RentalError::Envelope(
            "expected a JSON list or object".to_string(),
        )),
    }
}

/// Interpret a write response.
pub fn parse_write_response(body: Value) -> Result<WriteOutcome> {
    match body {
        Value::Null => Ok(WriteOutcome::Ack { message: None }),
        Value::String(s) => Ok(WriteOutcome::Ack {
            message: Some(s).filter(|s| !s.trim().is_empty()),
        }),
        Value::Object(map) => {
            if is_failure(&map) {
                return Err(failure(&Value::Object(map)));
            }
            for key in RECORD_KEYS {
                if let Some(Value::Object(inner)) = map.get(*key)
                    && inner.contains_key(ID_FIELD)
                {
                    return Record::from_map(inner.clone()).map(WriteOutcome::Record);
                }
            }
            if map.contains_key(ID_FIELD) {
                return Record::from_map(map).map(WriteOutcome::Record);
            }
            Ok(WriteOutcome::Ack {
                message: error_message(&Value::Object(map)),
            })
        }
        _ => Err(RentalError::Envelope(
            "expected a record or an acknowledgement".to_string(),
        )),
    }
}

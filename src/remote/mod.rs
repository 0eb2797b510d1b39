//! Collaborator API access.
//!
//! The list views never talk HTTP directly; they go through [`Collaborator`],
//! which has a reqwest-backed implementation for the real marketplace API and an
//! in-memory one for tests and offline use.

pub mod envelope;
pub mod http;
pub mod memory;

use std::fmt;

use serde_json::Value;

use crate::error::{RentalError, Result};
use crate::record::{Record, RecordId};
use crate::session::Session;

pub use envelope::{error_message, parse_list_response, parse_write_response};
pub use http::HttpCollaborator;
pub use memory::MemoryCollaborator;

/// HTTP verb of a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMethod {
    Post,
    Put,
    Delete,
}

impl fmt::Display for WriteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteMethod::Post => write!(f, "POST"),
            WriteMethod::Put => write!(f, "PUT"),
            WriteMethod::Delete => write!(f, "DELETE"),
        }
    }
}

/// What a successful write returned.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome {
    /// The mutated record as stored by the API.
    Record(Record),
    /// A bare acknowledgement.
    Ack { message: Option<String> },
}

/// Read/write access to the marketplace API
pub trait Collaborator: Send + Sync {
    /// Fetch the records behind `path`.
    fn fetch_list(
        &self,
        path: &str,
        query: &[(String, String)],
        session: &Session,
    ) -> impl std::future::Future<Output = Result<Vec<Record>>> + Send;

    /// Send a write to `path`.
    fn write(
        &self,
        method: WriteMethod,
        path: &str,
        body: Option<&Value>,
        session: &Session,
    ) -> impl std::future::Future<Output = Result<WriteOutcome>> + Send;
}

/// Fill `{id}` and `{user_id}` placeholders of an endpoint template.
///
/// A user-scoped template with a guest session fails before any request is made.
pub fn resolve_path(template: &str, id: Option<&RecordId>, session: &Session) -> Result<String> {
    let mut path = template.trim_start_matches('/').to_string();

    if path.contains("{user_id}") {
        let user_id = session.require_user_id()?;
        path = path.replace("{user_id}", user_id);
    }

    if path.contains("{id}") {
        let id = id.ok_or_else(|| {
            RentalError::Validation(format!("endpoint '{template}' needs a record id"))
        })?;
        path = path.replace("{id}", id.as_str());
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_user_scoped_path() {
        let session = Session::user("7", "Ram");
        assert_eq!(
            resolve_path("wishlist/{user_id}", None, &session).unwrap(),
            "wishlist/7"
        );
    }

    #[test]
    fn test_resolve_guest_rejected() {
        let err = resolve_path("wishlist/{user_id}", None, &Session::guest()).unwrap_err();
        assert!(matches!(err, RentalError::Validation(_)));
        assert_eq!(err.to_string(), "sign in required");
    }

    #[test]
    fn test_resolve_record_id() {
        let id = RecordId::from(5u64);
        assert_eq!(
            resolve_path("/api/vehicles/{id}", Some(&id), &Session::guest()).unwrap(),
            "api/vehicles/5"
        );
        assert!(resolve_path("api/vehicles/{id}", None, &Session::guest()).is_err());
    }

    #[test]
    fn test_write_method_display() {
        assert_eq!(WriteMethod::Delete.to_string(), "DELETE");
    }
}

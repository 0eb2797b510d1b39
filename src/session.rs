//! The current user, passed explicitly into fetches and permission checks.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::{RentalError, Result};

/// Role of the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Customer,
}

enum_display_fromstr!(Role, RentalError::invalid_role, {
    Admin => "admin",
    Customer => "customer",
});

/// Who is looking at a list view.
#[derive(Clone, Default)]
pub struct Session {
    user_id: Option<String>,
    name: Option<String>,
    role: Role,
    token: Option<SecretString>,
}

impl Session {
    /// A signed-out visitor.
    pub fn guest() -> Self {
        Self::default()
    }

    pub fn user(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            name: Some(name.into()),
            role: Role::Customer,
            token: None,
        }
    }

    pub fn admin(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            role: Role::Admin,
            ..Self::user(user_id, name)
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_ref().map(|t| t.expose_secret())
    }

    /// The user id, or a validation error for guests.
    pub fn require_user_id(&self) -> Result<&str> {
        self.user_id
            .as_deref()
            .ok_or_else(|| RentalError::Validation("sign in required".to_string()))
    }

    /// Gate a write on a view that only admins may modify.
    pub fn check_write(&self, admin_only: bool, view: &str) -> Result<()> {
        if admin_only && !self.is_admin() {
            return Err(RentalError::PermissionDenied(format!(
                "only admins can modify {view}"
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("name", &self.name)
            .field("role", &self.role)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

//! User: an account that owns plants.

use serde::{Deserialize, Serialize};

use crate::credentials::{PlainSecret, SecretHash};
use crate::error::ValidationError;
use crate::id::UserId;

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub email: String,
    #[serde(default)]
    pub username: String,
}

/// An account row including its password hash, for login checks.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: SecretHash,
}

/// Validated registration input.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: PlainSecret,
    pub username: Option<String>,
}

impl Registration {
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] when email or password is
    /// empty. An empty username is stored as absent.
    pub fn new(
        email: impl Into<String>,
        password: PlainSecret,
        username: Option<String>,
    ) -> Result<Self, ValidationError> {
        let email = email.into();
        if email.trim().is_empty() {
            return Err(ValidationError::MissingField("email"));
        }
        if password.is_empty() {
            return Err(ValidationError::MissingField("password"));
        }
        Ok(Self {
            email,
            password,
            username: username.filter(|u| !u.is_empty()),
        })
    }
}

/// A new account ready to be persisted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: Option<String>,
    pub password_hash: SecretHash,
}

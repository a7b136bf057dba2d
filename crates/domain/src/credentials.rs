//! Device and account credentials.
//!
//! Plaintext secrets never implement `Display` or `Serialize` and redact
//! themselves in `Debug` output.

use std::fmt;

use crate::id::PlantId;

/// Length of the shared secret issued to a freshly provisioned plant.
pub const PLANT_SECRET_LENGTH: usize = 16;

/// A secret presented in plaintext by a device or a user (password).
#[derive(Clone, PartialEq, Eq)]
pub struct PlainSecret(String);

impl PlainSecret {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw secret. Only hashing code should call this.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for PlainSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlainSecret(<redacted>)")
    }
}

/// Salted one-way hash of a secret as persisted in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretHash(String);

impl SecretHash {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The identity a device presents on every request.
#[derive(Debug, Clone)]
pub struct DeviceCredentials {
    pub plant_id: PlantId,
    pub secret: PlainSecret,
}

/// Credentials handed out once when a plant is provisioned.
#[derive(Debug, Clone)]
pub struct IssuedCredentials {
    pub plant_id: PlantId,
    pub secret: PlainSecret,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_redact_plain_secret_in_debug_output() {
        let secret = PlainSecret::new("hunter2hunter2xx");
        let rendered = format!("{secret:?}");
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn should_redact_secret_inside_device_credentials() {
        let creds = DeviceCredentials {
            plant_id: PlantId::from_serial(1),
            secret: PlainSecret::new("abcdefgh12345678"),
        };
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("plant_00001"));
        assert!(!rendered.contains("abcdefgh"));
    }
}

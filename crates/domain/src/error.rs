//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`PotbotError`]
//! via `From`.

/// Top-level error shared by every layer.
#[derive(Debug, thiserror::Error)]
pub enum PotbotError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// Credentials were missing, wrong, or belong to nobody.
    ///
    /// Carries no detail so callers cannot tell an unknown identity from a
    /// wrong secret.
    #[error("unauthorized")]
    Unauthorized,

    /// The caller is authenticated but does not own the resource.
    #[error("forbidden")]
    Forbidden,

    #[error("conflict")]
    Conflict(#[from] ConflictError),

    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("internal error")]
    Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A domain invariant was violated by caller-supplied data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid plant ID")]
    UnknownPlant,

    #[error("invalid log type: {0}")]
    InvalidLogType(String),

    #[error("invalid time range")]
    InvalidRange,

    #[error("plant has no associated user")]
    UnclaimedPlant,

    #[error("count must be between 1 and {max}")]
    InvalidBatchSize { max: usize },
}

/// A requested record does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// The write would break a uniqueness or ownership rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConflictError {
    #[error("plant ID already associated with a user")]
    PlantAlreadyClaimed,

    #[error("account already exists")]
    AccountExists,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_validation_error_with_from() {
        let err: PotbotError = ValidationError::MissingField("plantId").into();
        assert!(matches!(
            err,
            PotbotError::Validation(ValidationError::MissingField("plantId"))
        ));
    }

    #[test]
    fn should_format_missing_field_message() {
        let err = ValidationError::MissingField("email");
        assert_eq!(err.to_string(), "email is required");
    }

    #[test]
    fn should_format_not_found_message() {
        let err = NotFoundError {
            entity: "Plant",
            id: "plant_00001".to_string(),
        };
        assert_eq!(err.to_string(), "Plant not found: plant_00001");
    }

    #[test]
    fn should_not_leak_detail_in_unauthorized_message() {
        assert_eq!(PotbotError::Unauthorized.to_string(), "unauthorized");
    }
}

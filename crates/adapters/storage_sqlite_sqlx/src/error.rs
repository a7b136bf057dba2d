//! Storage-specific error type wrapping sqlx errors.

use potbot_domain::error::{ConflictError, PotbotError};

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StorageError {
    fn is_unique_violation(&self) -> bool {
        match self {
            Self::Database(sqlx::Error::Database(err)) => err.is_unique_violation(),
            _ => false,
        }
    }

    /// Convert a failed account insert, reporting duplicates as a conflict.
    pub(crate) fn into_account_error(self) -> PotbotError {
        if self.is_unique_violation() {
            ConflictError::AccountExists.into()
        } else {
            self.into()
        }
    }
}

impl From<StorageError> for PotbotError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}

/// Wrap a column value that does not parse into its domain type.
pub(crate) fn decode_error<E>(err: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::Decode(Box::new(err))
}

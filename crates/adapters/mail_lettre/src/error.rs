//! Mail-specific error type wrapping lettre errors.

use potbot_domain::error::PotbotError;

/// Errors originating from building or delivering an email.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// A required relay setting is absent or empty.
    #[error("mail setting `{0}` is not configured")]
    MissingSetting(&'static str),

    /// The sender or recipient is not a valid mailbox.
    #[error("invalid email address")]
    Address(#[from] lettre::address::AddressError),

    /// The message could not be assembled.
    #[error("failed to build email")]
    Message(#[from] lettre::error::Error),

    /// Connecting, authenticating or sending failed.
    #[error("smtp delivery failed")]
    Transport(#[from] lettre::transport::smtp::Error),
}

impl From<MailError> for PotbotError {
    fn from(err: MailError) -> Self {
        Self::Internal(Box::new(err))
    }
}

//! Notifications a plant sends to its owner.

use std::fmt;

use crate::error::ValidationError;
use crate::id::PlantId;

/// What the device is reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationKind {
    /// The pot tipped over.
    Fallen,
    /// Any other device-defined notification, forwarded verbatim.
    Other(String),
}

impl NotificationKind {
    /// Parse the wire value sent by a device.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] when `value` is empty.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "" => Err(ValidationError::MissingField("notificationType")),
            "FALLEN" => Ok(Self::Fallen),
            other => Ok(Self::Other(other.to_string())),
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fallen => f.write_str("FALLEN"),
            Self::Other(value) => f.write_str(value),
        }
    }
}

/// A plain-text email ready to hand to a mail transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Email {
    /// Render the message sent to `owner_email` for a device notification.
    #[must_use]
    pub fn plant_notification(owner_email: &str, plant_id: &PlantId, kind: &NotificationKind) -> Self {
        let (subject, body) = match kind {
            NotificationKind::Fallen => (
                "Your plant has fallen over".to_string(),
                format!(
                    "Hi, your plant (ID: {plant_id}) appears to have fallen over. Please check on it."
                ),
            ),
            NotificationKind::Other(value) => (
                format!("Potbot notification for {plant_id}"),
                format!("Your plant (ID: {plant_id}) sent notification: {value}"),
            ),
        };
        Self {
            to: owner_email.to_string(),
            subject,
            body,
        }
    }
}

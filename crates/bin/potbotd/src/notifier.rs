//! Owner notification delivery selected from the `[mail]` configuration.
//!
//! SMTP is the default. Logging the message instead is an explicit opt-in
//! (`log_only`). When the relay is only partly configured the daemon still
//! starts, but every notification fails with an internal error.

use potbot_adapter_mail_lettre::{Config as SmtpConfig, MailError, SmtpNotifier};
use potbot_app::ports::Notifier;
use potbot_domain::error::PotbotError;
use potbot_domain::notification::Email;

use crate::config::MailConfig;

pub enum OwnerNotifier {
    Smtp(Box<SmtpNotifier>),
    Log(TracingNotifier),
    /// Names the first missing relay setting.
    Unconfigured(&'static str),
}

impl OwnerNotifier {
    /// # Errors
    ///
    /// Returns [`MailError::Address`] when the sender address is invalid.
    /// Missing settings are not an error here; see [`Self::Unconfigured`].
    pub fn from_config(mail: &MailConfig) -> Result<Self, MailError> {
        if mail.log_only {
            tracing::info!("owner notifications are logged, not sent");
            return Ok(Self::Log(TracingNotifier::new(mail.from.clone())));
        }
        let smtp = SmtpConfig {
            from: mail.from.clone(),
            password: mail.password.clone(),
            server: mail.server.clone(),
            port: mail.port,
        };
        match smtp.build() {
            Ok(notifier) => Ok(Self::Smtp(Box::new(notifier))),
            Err(MailError::MissingSetting(setting)) => {
                tracing::warn!(setting, "mail relay not configured, owner notifications will fail");
                Ok(Self::Unconfigured(setting))
            }
            Err(err) => Err(err),
        }
    }
}

impl Notifier for OwnerNotifier {
    async fn send(&self, email: Email) -> Result<(), PotbotError> {
        match self {
            Self::Smtp(notifier) => notifier.send(email).await,
            Self::Log(notifier) => notifier.send(email).await,
            Self::Unconfigured(setting) => Err(MailError::MissingSetting(*setting).into()),
        }
    }
}

/// Records outbound email in the log instead of delivering it.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier {
    from: Option<String>,
}

impl TracingNotifier {
    #[must_use]
    pub fn new(from: Option<String>) -> Self {
        Self { from }
    }
}

impl Notifier for TracingNotifier {
    async fn send(&self, email: Email) -> Result<(), PotbotError> {
        tracing::info!(
            from = self.from.as_deref().unwrap_or("-"),
            to = %email.to,
            subject = %email.subject,
            "owner notification"
        );
        tracing::debug!(body = %email.body, "owner notification body");
        Ok(())
    }
}

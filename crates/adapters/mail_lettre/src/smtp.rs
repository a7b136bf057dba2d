//! Authenticated SMTP relay behind the [`Notifier`] port.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use potbot_app::ports::Notifier;
use potbot_domain::error::PotbotError;
use potbot_domain::notification::Email;

use crate::error::MailError;

/// Relay settings. Every field is required; empty values count as unset.
#[derive(Default)]
pub struct Config {
    /// Sender address, also used as the SMTP login.
    pub from: Option<String>,
    pub password: Option<String>,
    /// Relay host name.
    pub server: Option<String>,
    /// Submission port, usually 587.
    pub port: Option<u16>,
}

impl Config {
    /// Build an [`SmtpNotifier`] from this configuration.
    ///
    /// No connection is opened until the first email is sent.
    ///
    /// # Errors
    ///
    /// Returns [`MailError::MissingSetting`] naming the first absent setting,
    /// or [`MailError::Address`] when `from` is not a valid mailbox.
    pub fn build(self) -> Result<SmtpNotifier, MailError> {
        let from = required(self.from, "from")?;
        let password = required(self.password, "password")?;
        let server = required(self.server, "server")?;
        let port = self
            .port
            .filter(|port| *port != 0)
            .ok_or(MailError::MissingSetting("port"))?;

        let sender: Mailbox = from.parse()?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&server)?
            .port(port)
            .credentials(Credentials::new(from, password))
            .build();

        tracing::debug!(%server, port, "smtp relay configured");
        Ok(SmtpNotifier { sender, transport })
    }
}

fn required(value: Option<String>, name: &'static str) -> Result<String, MailError> {
    value
        .filter(|value| !value.is_empty())
        .ok_or(MailError::MissingSetting(name))
}

/// Delivers owner notifications through an SMTP relay.
pub struct SmtpNotifier {
    sender: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpNotifier {
    fn message(&self, email: Email) -> Result<Message, MailError> {
        let message = Message::builder()
            .from(self.sender.clone())
            .to(email.to.parse()?)
            .subject(email.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(email.body)?;
        Ok(message)
    }
}

impl Notifier for SmtpNotifier {
    #[tracing::instrument(skip_all, fields(to = %email.to))]
    async fn send(&self, email: Email) -> Result<(), PotbotError> {
        let message = self.message(email)?;
        self.transport.send(message).await.map_err(MailError::from)?;
        tracing::info!("owner notification sent");
        Ok(())
    }
}

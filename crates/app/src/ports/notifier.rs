//! Notifier port: outbound email to plant owners.

use std::future::Future;

use potbot_domain::error::PotbotError;
use potbot_domain::notification::Email;

/// Delivers rendered emails.
pub trait Notifier {
    fn send(&self, email: Email) -> impl Future<Output = Result<(), PotbotError>> + Send;
}

impl<T: Notifier + Send + Sync> Notifier for std::sync::Arc<T> {
    fn send(&self, email: Email) -> impl Future<Output = Result<(), PotbotError>> + Send {
        (**self).send(email)
    }
}

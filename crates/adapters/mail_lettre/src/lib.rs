//! # potbot-adapter-mail-lettre
//!
//! SMTP delivery of owner notifications using [lettre](https://docs.rs/lettre).
//!
//! ## Responsibilities
//! - Implement the `Notifier` port defined in `potbot-app::ports`
//! - Authenticate against the relay and upgrade the connection with STARTTLS
//! - Render domain [`Email`](potbot_domain::notification::Email) values as
//!   plain-text UTF-8 messages
//!
//! ## Dependency rule
//! Depends on `potbot-app` (for port traits) and `potbot-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod smtp;

pub use error::MailError;
pub use smtp::{Config, SmtpNotifier};

//! # potbot-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `PlantIdentityStore`: fetch a device's secret hash
//!   - `PlantRepository`: provision, claim and list plants
//!   - `UserRepository`: accounts
//!   - `ReadingRepository`: append & query sensor readings
//!   - `Notifier`: deliver emails to plant owners
//!   - `CommandMailbox`: per-device pending command queue
//! - Define **driving/inbound ports** as use-case structs:
//!   - `CredentialVerifier`: authenticate a device
//!   - `CommandService`: ownership-gated enqueue, verified drain
//!   - `PlantService`, `ReadingService`, `NotificationService`, `UserService`
//! - Provide **in-process infrastructure** that doesn't need IO: the command
//!   queue, the session store and the secret hasher
//!
//! ## Dependency rule
//! Depends on `potbot-domain` only (plus `tokio` for the blocking pool and
//! `bcrypt` for hashing). Never imports adapter crates. Adapters depend on
//! *this* crate, not the reverse.

pub mod command_queue;
pub mod ports;
pub mod secret;
pub mod services;
pub mod session;

//! # potbot-domain
//!
//! Pure domain model for the potbot plant-monitoring backend.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Plants** (physical devices a user can claim by id)
//! - Define **Commands** (opaque instructions queued for a device)
//! - Define **Credentials** (device secrets and their stored hashes)
//! - Define **Readings** (sensor values a device reports)
//! - Define **Notifications** (emails sent to a plant's owner)
//! - Define **Users** (accounts that own plants)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod command;
pub mod credentials;
pub mod notification;
pub mod plant;
pub mod reading;
pub mod user;

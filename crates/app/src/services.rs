//! Application services: use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod command_service;
pub mod credential_verifier;
pub mod notification_service;
pub mod plant_service;
pub mod reading_service;
pub mod user_service;

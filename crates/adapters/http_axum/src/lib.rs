//! # potbot-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **JSON API** used by the web frontend (accounts, plant
//!   claiming, command issuing, reading history)
//! - Serve the **device API** polled by plant firmware; every device route
//!   authenticates through the credential verifier first
//! - Keep browser sessions in a cookie and resolve them per request
//! - Serve the built frontend as static files for every other path
//! - Map application results into HTTP responses
//!
//! ## Dependency rule
//! Depends on `potbot-app` (for port traits and services) and `potbot-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod extract;
pub mod router;
pub mod state;

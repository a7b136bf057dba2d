//! # potbot-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `potbot-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `potbot-app` (for port traits) and `potbot-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod plant_repo;
pub mod pool;
pub mod reading_repo;
pub mod user_repo;

pub use plant_repo::SqlitePlantRepository;
pub use pool::{Config, Database};
pub use reading_repo::SqliteReadingRepository;
pub use user_repo::SqliteUserRepository;

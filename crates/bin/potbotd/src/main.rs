//! # potbotd: potbot daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars) and initialize logging
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations (adapters)
//! - Construct application services, injecting repositories via port traits
//! - Pick the owner notifier (SMTP relay, or the log when opted in)
//! - Build the axum router and serve it
//! - Purge expired sessions in the background
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod config;
mod notifier;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use potbot_adapter_http_axum::router::{self, HttpSettings};
use potbot_adapter_http_axum::state::{AppState, CookieSettings};
use potbot_adapter_storage_sqlite_sqlx::{
    Config as DatabaseConfig, SqlitePlantRepository, SqliteReadingRepository,
    SqliteUserRepository,
};
use potbot_app::command_queue::InMemoryCommandQueue;
use potbot_app::secret::SecretHasher;
use potbot_app::session::SessionStore;

use crate::config::Config;
use crate::notifier::OwnerNotifier;

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Database
    let db = DatabaseConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let pool = db.pool().clone();

    // Repositories
    let plant_repo = SqlitePlantRepository::new(pool.clone());
    let user_repo = SqliteUserRepository::new(pool.clone());
    let reading_repo = SqliteReadingRepository::new(pool);

    // In-process infrastructure
    let queue = match config.max_pending() {
        Some(max) => InMemoryCommandQueue::with_max_pending(max),
        None => InMemoryCommandQueue::new(),
    };
    let sessions = Arc::new(SessionStore::new(config.session_ttl()));
    let hasher = SecretHasher::new(config.auth.bcrypt_cost)?;
    let notifier = OwnerNotifier::from_config(&config.mail)?;

    // HTTP
    let state = AppState::new(plant_repo, user_repo, reading_repo, notifier, queue, hasher)
        .with_sessions(Arc::clone(&sessions))
        .with_cookie_settings(CookieSettings {
            secure: config.auth.secure_cookies,
        });
    state.warm().await?;
    let app = router::build(
        state,
        HttpSettings {
            allowed_origin: config.cors_origin(),
            static_dir: Some(config.frontend.static_dir.clone()),
        },
    );

    let purge = tokio::spawn(purge_sessions(sessions));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(address = %bind_addr, "potbotd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    purge.abort();
    db.close().await;
    tracing::info!("potbotd stopped");

    Ok(())
}

async fn purge_sessions(sessions: Arc<SessionStore>) {
    let mut ticker = tokio::time::interval(SESSION_PURGE_INTERVAL);
    loop {
        ticker.tick().await;
        let purged = sessions.purge_expired();
        if purged > 0 {
            tracing::debug!(purged, "expired sessions removed");
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}

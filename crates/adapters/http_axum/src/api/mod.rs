//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod commands;
#[allow(clippy::missing_errors_doc)]
pub mod device;
#[allow(clippy::missing_errors_doc)]
pub mod plants;
#[allow(clippy::missing_errors_doc)]
pub mod readings;
#[allow(clippy::missing_errors_doc)]
pub mod users;

use axum::Router;
use axum::routing::{get, post};
use serde::Serialize;

use potbot_app::ports::{
    CommandMailbox, Notifier, PlantIdentityStore, PlantRepository, ReadingRepository,
    UserRepository,
};

use crate::state::AppState;

/// `{"status": "..."}` acknowledgement body.
#[derive(Debug, Serialize)]
pub struct Status {
    pub status: &'static str,
}

impl Status {
    #[must_use]
    pub fn new(status: &'static str) -> Self {
        Self { status }
    }
}

/// Build the `/api` sub-router.
pub fn routes<PR, UR, LR, N, Q>() -> Router<AppState<PR, UR, LR, N, Q>>
where
    PR: PlantRepository + PlantIdentityStore + Clone + Send + Sync + 'static,
    UR: UserRepository + Send + Sync + 'static,
    LR: ReadingRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    Q: CommandMailbox + Send + Sync + 'static,
{
    Router::new()
        .route("/ping", get(ping))
        // Accounts
        .route("/register", post(users::register::<PR, UR, LR, N, Q>))
        .route("/login", post(users::login::<PR, UR, LR, N, Q>))
        .route("/logout", post(users::logout::<PR, UR, LR, N, Q>))
        .route("/me", get(users::me::<PR, UR, LR, N, Q>))
        // Plants
        .route("/add_plant", post(plants::add::<PR, UR, LR, N, Q>))
        .route(
            "/get_all_my_plants",
            get(plants::list::<PR, UR, LR, N, Q>),
        )
        .route(
            "/generate_plants",
            post(plants::generate::<PR, UR, LR, N, Q>),
        )
        .route("/issue_command", post(commands::issue::<PR, UR, LR, N, Q>))
        .route(
            "/get_plant_logs",
            post(readings::history::<PR, UR, LR, N, Q>),
        )
        // Devices
        .route(
            "/verify_plant_creds",
            get(device::verify::<PR, UR, LR, N, Q>),
        )
        .route(
            "/fetch_commands",
            get(device::fetch_commands::<PR, UR, LR, N, Q>),
        )
        .route("/plant_log", post(device::log_reading::<PR, UR, LR, N, Q>))
        .route("/plant_notify", post(device::notify::<PR, UR, LR, N, Q>))
}

async fn ping() -> &'static str {
    "pong"
}

//! Axum router assembly.

use std::path::PathBuf;

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use potbot_app::ports::{
    CommandMailbox, Notifier, PlantIdentityStore, PlantRepository, ReadingRepository,
    UserRepository,
};

use crate::state::AppState;

/// Outer HTTP concerns that do not belong to any service.
#[derive(Debug, Clone, Default)]
pub struct HttpSettings {
    /// Browser origin allowed to call the API with credentials.
    /// No CORS layer is installed when unset.
    pub allowed_origin: Option<HeaderValue>,
    /// Directory of the built frontend, served for every unmatched path.
    pub static_dir: Option<PathBuf>,
}

/// Build the top-level axum [`Router`].
///
/// Nests the JSON API under `/api` and falls back to the static frontend.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<PR, UR, LR, N, Q>(state: AppState<PR, UR, LR, N, Q>, settings: HttpSettings) -> Router
where
    PR: PlantRepository + PlantIdentityStore + Clone + Send + Sync + 'static,
    UR: UserRepository + Send + Sync + 'static,
    LR: ReadingRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    Q: CommandMailbox + Send + Sync + 'static,
{
    let mut router = Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes());

    if let Some(dir) = settings.static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    let router = router.layer(TraceLayer::new_for_http());
    let router = match settings.allowed_origin {
        Some(origin) => router.layer(cors(origin)),
        None => router,
    };

    router.with_state(state)
}

fn cors(origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_headers([CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
}

async fn health_check() -> &'static str {
    "OK"
}

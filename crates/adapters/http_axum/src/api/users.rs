//! JSON handlers for accounts and browser sessions.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use potbot_app::ports::{
    CommandMailbox, Notifier, PlantIdentityStore, PlantRepository, ReadingRepository,
    UserRepository,
};
use potbot_domain::credentials::PlainSecret;
use potbot_domain::error::PotbotError;
use potbot_domain::user::{Registration, User};

use crate::error::ApiError;
use crate::extract::{CurrentUser, session_cookie, session_cookie_removal, session_token};
use crate::state::AppState;

/// Request body for creating an account.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub username: Option<String>,
}

/// Request body for logging in.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Responses that open a session: register and login.
pub enum SessionResponse {
    Ok(CookieJar, Json<User>),
}

impl IntoResponse for SessionResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(jar, json) => (jar, json).into_response(),
        }
    }
}

pub enum LogoutResponse {
    NoContent(CookieJar),
}

impl IntoResponse for LogoutResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent(jar) => (jar, StatusCode::NO_CONTENT).into_response(),
        }
    }
}

pub enum MeResponse {
    Ok(Json<User>),
}

impl IntoResponse for MeResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

fn open_session<PR, UR, LR, N, Q>(
    state: &AppState<PR, UR, LR, N, Q>,
    jar: CookieJar,
    user: User,
) -> SessionResponse {
    let token = state.sessions.create(user.user_id);
    let cookie = session_cookie(token, state.sessions.ttl(), state.cookies.secure);
    SessionResponse::Ok(jar.add(cookie), Json(user))
}

/// `POST /api/register`
pub async fn register<PR, UR, LR, N, Q>(
    State(state): State<AppState<PR, UR, LR, N, Q>>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<SessionResponse, ApiError>
where
    PR: PlantRepository + PlantIdentityStore + Clone + Send + Sync + 'static,
    UR: UserRepository + Send + Sync + 'static,
    LR: ReadingRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    Q: CommandMailbox + Send + Sync + 'static,
{
    let registration = Registration::new(req.email, PlainSecret::new(req.password), req.username)
        .map_err(PotbotError::from)?;
    let user = state.user_service.register(registration).await?;
    Ok(open_session(&state, jar, user))
}

/// `POST /api/login`
pub async fn login<PR, UR, LR, N, Q>(
    State(state): State<AppState<PR, UR, LR, N, Q>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<SessionResponse, ApiError>
where
    PR: PlantRepository + PlantIdentityStore + Clone + Send + Sync + 'static,
    UR: UserRepository + Send + Sync + 'static,
    LR: ReadingRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    Q: CommandMailbox + Send + Sync + 'static,
{
    let user = state
        .user_service
        .login(&req.username, PlainSecret::new(req.password))
        .await?;
    Ok(open_session(&state, jar, user))
}

/// `POST /api/logout`
///
/// Succeeds whether or not a session was open.
pub async fn logout<PR, UR, LR, N, Q>(
    State(state): State<AppState<PR, UR, LR, N, Q>>,
    jar: CookieJar,
) -> LogoutResponse
where
    PR: PlantRepository + PlantIdentityStore + Clone + Send + Sync + 'static,
    UR: UserRepository + Send + Sync + 'static,
    LR: ReadingRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    Q: CommandMailbox + Send + Sync + 'static,
{
    if let Some(token) = session_token(&jar) {
        state.sessions.revoke(&token);
    }
    LogoutResponse::NoContent(jar.remove(session_cookie_removal()))
}

/// `GET /api/me`
pub async fn me<PR, UR, LR, N, Q>(
    State(state): State<AppState<PR, UR, LR, N, Q>>,
    current: CurrentUser,
) -> Result<MeResponse, ApiError>
where
    PR: PlantRepository + PlantIdentityStore + Clone + Send + Sync + 'static,
    UR: UserRepository + Send + Sync + 'static,
    LR: ReadingRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    Q: CommandMailbox + Send + Sync + 'static,
{
    // A session can outlive its account; treat that as logged out.
    let user = match state.user_service.get(current.user_id).await {
        Ok(user) => user,
        Err(PotbotError::NotFound(_)) => {
            state.sessions.revoke(&current.token);
            return Err(PotbotError::Unauthorized.into());
        }
        Err(err) => return Err(err.into()),
    };
    Ok(MeResponse::Ok(Json(user)))
}

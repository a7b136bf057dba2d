//! Request extractors for the two kinds of callers: browser sessions and
//! plant devices.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use potbot_app::ports::{
    CommandMailbox, Notifier, PlantIdentityStore, PlantRepository, ReadingRepository,
    UserRepository,
};
use potbot_app::services::credential_verifier::VerifiedPlant;
use potbot_app::session::SessionToken;
use potbot_domain::credentials::{DeviceCredentials, PlainSecret};
use potbot_domain::error::PotbotError;
use potbot_domain::id::{PlantId, UserId};

use crate::error::ApiError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "potbot_session";
pub const PLANT_ID_COOKIE: &str = "plant_id";
pub const PLANT_SECRET_COOKIE: &str = "plant_secret";

/// The user behind a valid session cookie.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub token: SessionToken,
}

/// Read the session token from the cookie jar, ignoring malformed values.
pub(crate) fn session_token(jar: &CookieJar) -> Option<SessionToken> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| cookie.value().parse().ok())
}

/// Build the cookie carrying a freshly opened session.
pub(crate) fn session_cookie(
    token: SessionToken,
    ttl: chrono::Duration,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::seconds(ttl.num_seconds()))
        .build()
}

/// A cookie matching the session cookie's path, for removal.
pub(crate) fn session_cookie_removal() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

impl<PR, UR, LR, N, Q> FromRequestParts<AppState<PR, UR, LR, N, Q>> for CurrentUser
where
    PR: PlantRepository + PlantIdentityStore + Clone + Send + Sync + 'static,
    UR: UserRepository + Send + Sync + 'static,
    LR: ReadingRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    Q: CommandMailbox + Send + Sync + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<PR, UR, LR, N, Q>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = session_token(&jar).ok_or(PotbotError::Unauthorized)?;
        let user_id = state
            .sessions
            .resolve(&token)
            .ok_or(PotbotError::Unauthorized)?;
        Ok(Self { user_id, token })
    }
}

/// A plant device whose `plant_id` / `plant_secret` cookies were verified.
#[derive(Debug, Clone)]
pub struct PlantDevice(pub VerifiedPlant);

fn device_credentials(parts: &Parts) -> Option<DeviceCredentials> {
    let jar = CookieJar::from_headers(&parts.headers);
    let plant_id = PlantId::new(jar.get(PLANT_ID_COOKIE)?.value()).ok()?;
    let secret = PlainSecret::new(jar.get(PLANT_SECRET_COOKIE)?.value());
    Some(DeviceCredentials { plant_id, secret })
}

impl<PR, UR, LR, N, Q> FromRequestParts<AppState<PR, UR, LR, N, Q>> for PlantDevice
where
    PR: PlantRepository + PlantIdentityStore + Clone + Send + Sync + 'static,
    UR: UserRepository + Send + Sync + 'static,
    LR: ReadingRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    Q: CommandMailbox + Send + Sync + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<PR, UR, LR, N, Q>,
    ) -> Result<Self, Self::Rejection> {
        let credentials = device_credentials(parts).ok_or(PotbotError::Unauthorized)?;
        let verified = state.credential_verifier.verify(credentials).await?;
        Ok(Self(verified))
    }
}

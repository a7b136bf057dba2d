//! Handlers polled by plant firmware.
//!
//! Each one takes a [`PlantDevice`], so a request only reaches the body once
//! the `plant_id` / `plant_secret` cookies have been verified.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use potbot_app::ports::{
    CommandMailbox, Notifier, PlantIdentityStore, PlantRepository, ReadingRepository,
    UserRepository,
};
use potbot_domain::command::Command;
use potbot_domain::error::PotbotError;
use potbot_domain::notification::NotificationKind;
use potbot_domain::reading::LogType;

use crate::api::Status;
use crate::error::ApiError;
use crate::extract::PlantDevice;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantLogRequest {
    pub log_type: String,
    pub log_value: f64,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct PlantNotifyRequest {
    pub notification_type: String,
}

pub enum DeviceResponse {
    Ok(Json<Status>),
    Created(Json<Status>),
}

impl IntoResponse for DeviceResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

pub enum FetchResponse {
    Ok(Json<Vec<Command>>),
}

impl IntoResponse for FetchResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/verify_plant_creds`
pub async fn verify<PR, UR, LR, N, Q>(
    State(_state): State<AppState<PR, UR, LR, N, Q>>,
    PlantDevice(_plant): PlantDevice,
) -> DeviceResponse
where
    PR: PlantRepository + PlantIdentityStore + Clone + Send + Sync + 'static,
    UR: UserRepository + Send + Sync + 'static,
    LR: ReadingRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    Q: CommandMailbox + Send + Sync + 'static,
{
    DeviceResponse::Ok(Json(Status::new("valid")))
}

/// `GET /api/fetch_commands`
///
/// Returns `[]` when nothing is pending, never `null`.
pub async fn fetch_commands<PR, UR, LR, N, Q>(
    State(state): State<AppState<PR, UR, LR, N, Q>>,
    PlantDevice(plant): PlantDevice,
) -> FetchResponse
where
    PR: PlantRepository + PlantIdentityStore + Clone + Send + Sync + 'static,
    UR: UserRepository + Send + Sync + 'static,
    LR: ReadingRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    Q: CommandMailbox + Send + Sync + 'static,
{
    FetchResponse::Ok(Json(state.command_service.fetch(&plant)))
}

/// `POST /api/plant_log`
pub async fn log_reading<PR, UR, LR, N, Q>(
    State(state): State<AppState<PR, UR, LR, N, Q>>,
    PlantDevice(plant): PlantDevice,
    Json(req): Json<PlantLogRequest>,
) -> Result<DeviceResponse, ApiError>
where
    PR: PlantRepository + PlantIdentityStore + Clone + Send + Sync + 'static,
    UR: UserRepository + Send + Sync + 'static,
    LR: ReadingRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    Q: CommandMailbox + Send + Sync + 'static,
{
    let log_type: LogType = req.log_type.parse().map_err(PotbotError::from)?;
    state
        .reading_service
        .record(&plant, log_type, req.log_value)
        .await?;
    Ok(DeviceResponse::Created(Json(Status::new("ok"))))
}

/// `POST /api/plant_notify`
pub async fn notify<PR, UR, LR, N, Q>(
    State(state): State<AppState<PR, UR, LR, N, Q>>,
    PlantDevice(plant): PlantDevice,
    Json(req): Json<PlantNotifyRequest>,
) -> Result<DeviceResponse, ApiError>
where
    PR: PlantRepository + PlantIdentityStore + Clone + Send + Sync + 'static,
    UR: UserRepository + Send + Sync + 'static,
    LR: ReadingRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    Q: CommandMailbox + Send + Sync + 'static,
{
    let kind = NotificationKind::parse(&req.notification_type).map_err(PotbotError::from)?;
    state.notification_service.notify(&plant, kind).await?;
    Ok(DeviceResponse::Ok(Json(Status::new("notified"))))
}

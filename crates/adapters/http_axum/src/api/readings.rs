//! JSON handler for an owner's reading history.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use potbot_app::ports::{
    CommandMailbox, Notifier, PlantIdentityStore, PlantRepository, ReadingRepository,
    UserRepository,
};
use potbot_domain::error::PotbotError;
use potbot_domain::id::PlantId;
use potbot_domain::reading::{ReadingRange, ReadingsByType};
use potbot_domain::time::Timestamp;

use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;

/// Request body for a history query. Dates are RFC 3339.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantLogsRequest {
    #[serde(rename = "plantID", default)]
    pub plant_id: String,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
}

pub enum LogsResponse {
    Ok(Json<ReadingsByType>),
}

impl IntoResponse for LogsResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /api/get_plant_logs`
pub async fn history<PR, UR, LR, N, Q>(
    State(state): State<AppState<PR, UR, LR, N, Q>>,
    current: CurrentUser,
    Json(req): Json<PlantLogsRequest>,
) -> Result<LogsResponse, ApiError>
where
    PR: PlantRepository + PlantIdentityStore + Clone + Send + Sync + 'static,
    UR: UserRepository + Send + Sync + 'static,
    LR: ReadingRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    Q: CommandMailbox + Send + Sync + 'static,
{
    let plant_id = PlantId::new(req.plant_id).map_err(PotbotError::from)?;
    let range = ReadingRange::new(req.start_date, req.end_date).map_err(PotbotError::from)?;
    let readings = state
        .reading_service
        .history(current.user_id, &plant_id, range)
        .await?;
    Ok(LogsResponse::Ok(Json(readings)))
}

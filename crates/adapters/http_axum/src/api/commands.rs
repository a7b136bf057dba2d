//! JSON handler for issuing commands to an owned plant.

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
use potbot_domain::id::PlantId;

use crate::api::Status;
use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct IssueCommandRequest {
    pub plant_id: String,
    pub command: String,
}

pub enum IssueResponse {
    Created(Json<Status>),
}

impl IntoResponse for IssueResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// `POST /api/issue_command`
pub async fn issue<PR, UR, LR, N, Q>(
    State(state): State<AppState<PR, UR, LR, N, Q>>,
    current: CurrentUser,
    Json(req): Json<IssueCommandRequest>,
) -> Result<IssueResponse, ApiError>
where
    PR: PlantRepository + PlantIdentityStore + Clone + Send + Sync + 'static,
    UR: UserRepository + Send + Sync + 'static,
    LR: ReadingRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    Q: CommandMailbox + Send + Sync + 'static,
{
    let plant_id = PlantId::new(req.plant_id).map_err(PotbotError::from)?;
    state
        .command_service
        .issue(current.user_id, plant_id, Command::new(req.command))
        .await?;
    Ok(IssueResponse::Created(Json(Status::new("queued"))))
}

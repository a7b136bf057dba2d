//! JSON handlers for provisioning, claiming and listing plants.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use potbot_app::ports::{
    CommandMailbox, Notifier, PlantIdentityStore, PlantRepository, ReadingRepository,
    UserRepository,
};
use potbot_app::services::plant_service::DEFAULT_PROVISION_BATCH;
use potbot_domain::credentials::IssuedCredentials;
use potbot_domain::error::PotbotError;
use potbot_domain::plant::{PlantClaim, PlantSummary};

use crate::api::Status;
use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;

/// Request body for claiming a provisioned plant.
#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct AddPlantRequest {
    pub plant_id: String,
    pub plant_name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Query string of the provisioning endpoint.
#[derive(Deserialize)]
pub struct GenerateParams {
    pub count: Option<usize>,
}

/// Freshly provisioned ids and their one-time plaintext secrets, index-aligned.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPlants {
    pub plant_ids: Vec<String>,
    pub plant_secrets: Vec<String>,
}

impl From<Vec<IssuedCredentials>> for GeneratedPlants {
    fn from(issued: Vec<IssuedCredentials>) -> Self {
        let (plant_ids, plant_secrets) = issued
            .into_iter()
            .map(|creds| {
                (
                    String::from(creds.plant_id),
                    creds.secret.expose().to_string(),
                )
            })
            .unzip();
        Self {
            plant_ids,
            plant_secrets,
        }
    }
}

pub enum AddResponse {
    Created(Json<Status>),
}

impl IntoResponse for AddResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

pub enum ListResponse {
    Ok(Json<Vec<PlantSummary>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

pub enum GenerateResponse {
    Ok(Json<GeneratedPlants>),
}

impl IntoResponse for GenerateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /api/add_plant`
pub async fn add<PR, UR, LR, N, Q>(
    State(state): State<AppState<PR, UR, LR, N, Q>>,
    current: CurrentUser,
    Json(req): Json<AddPlantRequest>,
) -> Result<AddResponse, ApiError>
where
    PR: PlantRepository + PlantIdentityStore + Clone + Send + Sync + 'static,
    UR: UserRepository + Send + Sync + 'static,
    LR: ReadingRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    Q: CommandMailbox + Send + Sync + 'static,
{
    let claim =
        PlantClaim::new(&req.plant_id, req.plant_name, req.kind).map_err(PotbotError::from)?;
    state.plant_service.claim(current.user_id, claim).await?;
    Ok(AddResponse::Created(Json(Status::new("success"))))
}

/// `GET /api/get_all_my_plants`
pub async fn list<PR, UR, LR, N, Q>(
    State(state): State<AppState<PR, UR, LR, N, Q>>,
    current: CurrentUser,
) -> Result<ListResponse, ApiError>
where
    PR: PlantRepository + PlantIdentityStore + Clone + Send + Sync + 'static,
    UR: UserRepository + Send + Sync + 'static,
    LR: ReadingRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    Q: CommandMailbox + Send + Sync + 'static,
{
    let plants = state.plant_service.list_for_owner(current.user_id).await?;
    Ok(ListResponse::Ok(Json(plants)))
}

/// `POST /api/generate_plants[?count=N]`
pub async fn generate<PR, UR, LR, N, Q>(
    State(state): State<AppState<PR, UR, LR, N, Q>>,
    Query(params): Query<GenerateParams>,
) -> Result<GenerateResponse, ApiError>
where
    PR: PlantRepository + PlantIdentityStore + Clone + Send + Sync + 'static,
    UR: UserRepository + Send + Sync + 'static,
    LR: ReadingRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    Q: CommandMailbox + Send + Sync + 'static,
{
    let count = params.count.unwrap_or(DEFAULT_PROVISION_BATCH);
    let issued = state.plant_service.provision(count).await?;
    Ok(GenerateResponse::Ok(Json(issued.into())))
}

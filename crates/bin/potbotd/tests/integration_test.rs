//! End-to-end tests for the full potbotd stack.
//!
//! Each test spins up the complete application (in-memory `SQLite`, real repos,
//! real services, real axum router) and exercises the HTTP layer via
//! `tower::ServiceExt::oneshot`: no TCP port is bound.

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use potbot_adapter_http_axum::router::{self, HttpSettings};
use potbot_adapter_http_axum::state::AppState;
use potbot_adapter_storage_sqlite_sqlx::{
    Config, SqlitePlantRepository, SqliteReadingRepository, SqliteUserRepository,
};
use potbot_app::command_queue::InMemoryCommandQueue;
use potbot_app::ports::Notifier;
use potbot_app::secret::{MIN_COST, SecretHasher};
use potbot_domain::error::PotbotError;
use potbot_domain::notification::Email;
use serde_json::{Value, json};
use tower::ServiceExt;

#[derive(Clone, Default)]
struct Outbox(Arc<Mutex<Vec<Email>>>);

impl Outbox {
    fn sent(&self) -> Vec<Email> {
        self.0.lock().unwrap().clone()
    }
}

impl Notifier for Outbox {
    async fn send(&self, email: Email) -> Result<(), PotbotError> {
        self.0.lock().unwrap().push(email);
        Ok(())
    }
}

/// Relay that refuses every message.
struct DownRelay;

impl Notifier for DownRelay {
    async fn send(&self, _email: Email) -> Result<(), PotbotError> {
        Err(PotbotError::Internal("relay unavailable".into()))
    }
}

/// Build a fully-wired router backed by an in-memory `SQLite` database.
async fn app() -> (axum::Router, Outbox) {
    let outbox = Outbox::default();
    (app_with(outbox.clone()).await, outbox)
}

async fn app_with<N>(notifier: N) -> axum::Router
where
    N: Notifier + Send + Sync + 'static,
{
    let db = Config {
        database_url: "sqlite::memory:".to_string(),
    }
    .build()
    .await
    .expect("in-memory database should initialise");

    let pool = db.pool().clone();

    let state = AppState::new(
        SqlitePlantRepository::new(pool.clone()),
        SqliteUserRepository::new(pool.clone()),
        SqliteReadingRepository::new(pool),
        notifier,
        InMemoryCommandQueue::new(),
        SecretHasher::new(MIN_COST).unwrap(),
    );
    state.warm().await.unwrap();

    router::build(state, HttpSettings::default())
}

struct Reply {
    status: StatusCode,
    cookie: Option<String>,
    body: Vec<u8>,
}

impl Reply {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

async fn call(app: &axum::Router, request: Request<Body>) -> Reply {
    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let cookie = resp
        .headers()
        .get(SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::to_string);
    let body = resp.into_body().collect().await.unwrap().to_bytes().to_vec();
    Reply {
        status,
        cookie,
        body,
    }
}

fn post_json(uri: &str, cookie: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(COOKIE, cookie)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

/// Register an account and return its session cookie.
async fn register(app: &axum::Router, email: &str, username: &str) -> String {
    let reply = call(
        app,
        post_json(
            "/api/register",
            "",
            &json!({"email": email, "password": "hunter2", "username": username}),
        ),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    reply.cookie.expect("register should open a session")
}

/// Provision one plant and return `(plant_id, device_cookie)`.
async fn provision(app: &axum::Router) -> (String, String) {
    let reply = call(
        app,
        Request::builder()
            .method("POST")
            .uri("/api/generate_plants?count=1")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    let body = reply.json();
    let plant_id = body["plantIds"][0].as_str().unwrap().to_string();
    let secret = body["plantSecrets"][0].as_str().unwrap().to_string();
    let device = format!("plant_id={plant_id}; plant_secret={secret}");
    (plant_id, device)
}

async fn claim(app: &axum::Router, session: &str, plant_id: &str) -> StatusCode {
    call(
        app,
        post_json(
            "/api/add_plant",
            session,
            &json!({"plantId": plant_id, "plantName": "Fern", "type": "fern"}),
        ),
    )
    .await
    .status
}

async fn issue(app: &axum::Router, session: &str, plant_id: &str, command: &str) -> StatusCode {
    call(
        app,
        post_json(
            "/api/issue_command",
            session,
            &json!({"plantId": plant_id, "command": command}),
        ),
    )
    .await
    .status
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let (app, _) = app().await;

    let reply = call(&app, get("/health", "")).await;

    assert_eq!(reply.status, StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Command queue
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_deliver_commands_in_order_once_when_device_polls() {
    let (app, _) = app().await;
    let session = register(&app, "ada@example.com", "ada").await;
    let (plant_id, device) = provision(&app).await;
    assert_eq!(claim(&app, &session, &plant_id).await, StatusCode::CREATED);

    assert_eq!(issue(&app, &session, &plant_id, "WATER_NOW").await, StatusCode::CREATED);
    assert_eq!(issue(&app, &session, &plant_id, "PHOTO").await, StatusCode::CREATED);

    let first = call(&app, get("/api/fetch_commands", &device)).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.json(), json!(["WATER_NOW", "PHOTO"]));

    let second = call(&app, get("/api/fetch_commands", &device)).await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.json(), json!([]));
}

#[tokio::test]
async fn should_reject_device_when_secret_wrong() {
    let (app, _) = app().await;
    let (plant_id, _) = provision(&app).await;

    let reply = call(
        &app,
        get(
            "/api/fetch_commands",
            &format!("plant_id={plant_id}; plant_secret=wrong"),
        ),
    )
    .await;

    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_answer_unknown_plant_like_wrong_secret() {
    let (app, _) = app().await;
    let (plant_id, _) = provision(&app).await;
    let unknown_id = if plant_id == "plant_99999" {
        "plant_99998"
    } else {
        "plant_99999"
    };

    let wrong_secret = call(
        &app,
        get(
            "/api/fetch_commands",
            &format!("plant_id={plant_id}; plant_secret=wrong"),
        ),
    )
    .await;
    let unknown_plant = call(
        &app,
        get(
            "/api/fetch_commands",
            &format!("plant_id={unknown_id}; plant_secret=wrong"),
        ),
    )
    .await;

    assert_eq!(wrong_secret.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_plant.status, wrong_secret.status);
    assert_eq!(unknown_plant.json(), wrong_secret.json());
    assert_eq!(unknown_plant.body, wrong_secret.body);
}

#[tokio::test]
async fn should_not_drain_queue_when_credentials_rejected() {
    let (app, _) = app().await;
    let session = register(&app, "ada@example.com", "ada").await;
    let (plant_id, device) = provision(&app).await;
    claim(&app, &session, &plant_id).await;
    issue(&app, &session, &plant_id, "WATER_NOW").await;

    let rejected = call(
        &app,
        get(
            "/api/fetch_commands",
            &format!("plant_id={plant_id}; plant_secret=wrong"),
        ),
    )
    .await;
    assert_eq!(rejected.status, StatusCode::UNAUTHORIZED);

    let reply = call(&app, get("/api/fetch_commands", &device)).await;
    assert_eq!(reply.json(), json!(["WATER_NOW"]));
}

#[tokio::test]
async fn should_return_forbidden_when_issuing_to_someone_elses_plant() {
    let (app, _) = app().await;
    let owner = register(&app, "ada@example.com", "ada").await;
    let other = register(&app, "bob@example.com", "bob").await;
    let (plant_id, device) = provision(&app).await;
    claim(&app, &owner, &plant_id).await;

    assert_eq!(issue(&app, &other, &plant_id, "WATER_NOW").await, StatusCode::FORBIDDEN);

    let reply = call(&app, get("/api/fetch_commands", &device)).await;
    assert_eq!(reply.json(), json!([]));
}

#[tokio::test]
async fn should_return_not_found_when_issuing_to_unknown_plant() {
    let (app, _) = app().await;
    let session = register(&app, "ada@example.com", "ada").await;

    assert_eq!(
        issue(&app, &session, "plant_99999", "WATER_NOW").await,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn should_return_unauthorized_when_issuing_without_session() {
    let (app, _) = app().await;
    let (plant_id, _) = provision(&app).await;

    assert_eq!(issue(&app, "", &plant_id, "WATER_NOW").await, StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Accounts and plants
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_resolve_session_and_forget_it_after_logout() {
    let (app, _) = app().await;
    let session = register(&app, "ada@example.com", "ada").await;

    let me = call(&app, get("/api/me", &session)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.json()["email"], "ada@example.com");

    let logout = call(&app, post_json("/api/logout", &session, &json!({}))).await;
    assert_eq!(logout.status, StatusCode::NO_CONTENT);

    let me = call(&app, get("/api/me", &session)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_login_with_username_and_password() {
    let (app, _) = app().await;
    register(&app, "ada@example.com", "ada").await;

    let ok = call(
        &app,
        post_json("/api/login", "", &json!({"username": "ada", "password": "hunter2"})),
    )
    .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert!(ok.cookie.is_some());

    let bad = call(
        &app,
        post_json("/api/login", "", &json!({"username": "ada", "password": "nope"})),
    )
    .await;
    assert_eq!(bad.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_return_conflict_when_registering_same_email_twice() {
    let (app, _) = app().await;
    register(&app, "ada@example.com", "ada").await;

    let reply = call(
        &app,
        post_json(
            "/api/register",
            "",
            &json!({"email": "ada@example.com", "password": "x", "username": "ada2"}),
        ),
    )
    .await;

    assert_eq!(reply.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn should_list_claimed_plants_and_refuse_second_claim() {
    let (app, _) = app().await;
    let owner = register(&app, "ada@example.com", "ada").await;
    let other = register(&app, "bob@example.com", "bob").await;
    let (plant_id, _) = provision(&app).await;

    assert_eq!(claim(&app, &owner, &plant_id).await, StatusCode::CREATED);
    assert_eq!(claim(&app, &other, &plant_id).await, StatusCode::CONFLICT);
    assert_eq!(claim(&app, &owner, "plant_99999").await, StatusCode::BAD_REQUEST);

    let mine = call(&app, get("/api/get_all_my_plants", &owner)).await;
    assert_eq!(
        mine.json(),
        json!([{"plantName": "Fern", "plantID": plant_id, "type": "fern"}])
    );

    let theirs = call(&app, get("/api/get_all_my_plants", &other)).await;
    assert_eq!(theirs.json(), json!([]));
}

// ---------------------------------------------------------------------------
// Device reports
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_record_reading_and_return_it_in_history() {
    let (app, _) = app().await;
    let session = register(&app, "ada@example.com", "ada").await;
    let (plant_id, device) = provision(&app).await;
    claim(&app, &session, &plant_id).await;

    let logged = call(
        &app,
        post_json("/api/plant_log", &device, &json!({"logType": "light", "logValue": 42.5})),
    )
    .await;
    assert_eq!(logged.status, StatusCode::CREATED);

    let bad = call(
        &app,
        post_json("/api/plant_log", &device, &json!({"logType": "humidity", "logValue": 1.0})),
    )
    .await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);

    let history = call(
        &app,
        post_json(
            "/api/get_plant_logs",
            &session,
            &json!({
                "plantID": plant_id,
                "startDate": "2000-01-01T00:00:00Z",
                "endDate": "2100-01-01T00:00:00Z",
            }),
        ),
    )
    .await;
    assert_eq!(history.status, StatusCode::OK);
    let body = history.json();
    assert_eq!(body["light"].as_array().unwrap().len(), 1);
    assert_eq!(body["light"][0]["val"], 42.5);
    assert_eq!(body["temp"], json!([]));
    assert_eq!(body["moisture"], json!([]));
}

#[tokio::test]
async fn should_email_owner_when_plant_falls() {
    let (app, outbox) = app().await;
    let session = register(&app, "ada@example.com", "ada").await;
    let (plant_id, device) = provision(&app).await;
    claim(&app, &session, &plant_id).await;

    let reply = call(
        &app,
        post_json("/api/plant_notify", &device, &json!({"notificationType": "FALLEN"})),
    )
    .await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json(), json!({"status": "notified"}));
    let sent = outbox.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "ada@example.com");
}

#[tokio::test]
async fn should_report_internal_error_when_relay_fails() {
    let app = app_with(DownRelay).await;
    let session = register(&app, "ada@example.com", "ada").await;
    let (plant_id, device) = provision(&app).await;
    claim(&app, &session, &plant_id).await;

    let reply = call(
        &app,
        post_json("/api/plant_notify", &device, &json!({"notificationType": "FALLEN"})),
    )
    .await;

    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn should_reject_notification_when_plant_unclaimed() {
    let (app, outbox) = app().await;
    let (_, device) = provision(&app).await;

    let reply = call(
        &app,
        post_json("/api/plant_notify", &device, &json!({"notificationType": "FALLEN"})),
    )
    .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(outbox.sent().is_empty());
}

#[tokio::test]
async fn should_confirm_valid_device_credentials() {
    let (app, _) = app().await;
    let (_, device) = provision(&app).await;

    let reply = call(&app, get("/api/verify_plant_creds", &device)).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json(), json!({"status": "valid"}));
}

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

/// First id handed out by `statuses/update`. Larger than 2^53 so clients
/// that round through `f64` get caught.
pub const FIRST_STATUS_ID: u64 = 1_600_000_000_000_000_001;

pub const REQUEST_TOKEN: &str = "Z6eEdO8MOmk394WozF5oKyuAv855l4Mlqo7hhlSLik";
pub const REQUEST_TOKEN_SECRET: &str = "Kd75W4OQfb2oJTV0vzGzeXftVAwgMnEK9MumzYcM";
pub const ACCESS_TOKEN: &str = "6253282-eWudHldSbIaelX7swmsiHImEL4KinwaGloHANdrY";
pub const ACCESS_TOKEN_SECRET: &str = "2EEfA6BG5ly3sR3XjE0IBSnlQu4ZrUzPiYTmrkVU";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Status {
    pub id: u64,
    pub id_str: String,
    pub text: String,
    pub user: StatusUser,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatusUser {
    pub id_str: String,
    pub screen_name: String,
}

#[derive(Deserialize)]
pub struct ShowParams {
    pub id: u64,
}

#[derive(Deserialize)]
pub struct UpdateParams {
    pub status: String,
}

pub type Db = Arc<RwLock<Vec<Status>>>;

/// The REST API host.
pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/1.1/statuses/show.json", get(show_status))
        .route("/1.1/statuses/home_timeline.json", get(home_timeline))
        .route("/1.1/statuses/update.json", post(update_status))
        .route("/1.1/statuses/destroy/{file}", post(destroy_status))
        .route("/1.1/echo.json", get(echo_get).post(echo_post))
        .route("/1.1/unavailable.json", get(unavailable))
        .route("/oauth/request_token", get(request_token))
        .route("/oauth/access_token", get(access_token))
        .with_state(db)
}

/// The media upload host. Only serves multipart uploads.
pub fn upload_app() -> Router {
    Router::new().route("/1.1/media/upload.json", post(upload_media))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_upload(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, upload_app()).await
}

fn api_error(status: StatusCode, code: u32, message: &str) -> Response {
    let body = json!({ "errors": [{ "code": code, "message": message }] });
    (status, Json(body)).into_response()
}

async fn show_status(State(db): State<Db>, Query(params): Query<ShowParams>) -> Response {
    let statuses = db.read().await;
    match statuses.iter().find(|s| s.id == params.id) {
        Some(status) => Json(status.clone()).into_response(),
        None => api_error(StatusCode::NOT_FOUND, 144, "No status found with that ID."),
    }
}

async fn home_timeline(State(db): State<Db>) -> Json<Vec<Status>> {
    let statuses = db.read().await;
    Json(statuses.iter().rev().cloned().collect())
}

async fn update_status(State(db): State<Db>, Form(params): Form<UpdateParams>) -> Response {
    if params.status.chars().count() > 280 {
        return api_error(StatusCode::FORBIDDEN, 186, "Status is over 280 characters.");
    }
    let mut statuses = db.write().await;
    let id = FIRST_STATUS_ID + statuses.len() as u64;
    let status = Status {
        id,
        id_str: id.to_string(),
        text: params.status,
        user: StatusUser {
            id_str: "6253282".to_string(),
            screen_name: "twitterapi".to_string(),
        },
    };
    tracing::debug!(id, "status created");
    statuses.push(status.clone());
    Json(status).into_response()
}

async fn destroy_status(State(db): State<Db>, Path(file): Path<String>) -> Response {
    let Some(id) = file.strip_suffix(".json").and_then(|id| id.parse::<u64>().ok()) else {
        return api_error(StatusCode::NOT_FOUND, 34, "Sorry, that page does not exist.");
    };
    let mut statuses = db.write().await;
    match statuses.iter().position(|s| s.id == id) {
        Some(idx) => Json(statuses.remove(idx)).into_response(),
        None => api_error(StatusCode::NOT_FOUND, 144, "No status found with that ID."),
    }
}

/// Echo where each parameter arrived, so clients can check placement.
async fn echo_get(Query(query): Query<Vec<(String, String)>>) -> Json<Value> {
    Json(json!({ "method": "GET", "query": query, "form": [] }))
}

async fn echo_post(
    Query(query): Query<Vec<(String, String)>>,
    Form(form): Form<Vec<(String, String)>>,
) -> Json<Value> {
    Json(json!({ "method": "POST", "query": query, "form": form }))
}

async fn unavailable() -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, "Over capacity").into_response()
}

async fn upload_media(mut multipart: Multipart) -> Response {
    let mut fields = Vec::new();
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let name = field.name().unwrap_or_default().to_string();
                match field.text().await {
                    Ok(text) => fields.push((name, text)),
                    Err(_) => return StatusCode::BAD_REQUEST.into_response(),
                }
            }
            Ok(None) => break,
            Err(_) => return StatusCode::BAD_REQUEST.into_response(),
        }
    }
    if !fields.iter().any(|(name, _)| name == "media_data") {
        return api_error(StatusCode::BAD_REQUEST, 38, "media parameter is missing.");
    }
    Json(json!({
        "media_id": 710511363345354753u64,
        "media_id_string": "710511363345354753",
        "size": 11065,
        "fields": fields,
    }))
    .into_response()
}

fn form_encoded(body: String) -> Response {
    (
        [(header::CONTENT_TYPE, "application/x-www-form-urlencoded")],
        body,
    )
        .into_response()
}

#[derive(Deserialize)]
pub struct RequestTokenParams {
    pub oauth_callback: Option<String>,
}

async fn request_token(Query(params): Query<RequestTokenParams>) -> Response {
    let confirmed = params.oauth_callback.is_some();
    form_encoded(format!(
        "oauth_token={REQUEST_TOKEN}&oauth_token_secret={REQUEST_TOKEN_SECRET}&oauth_callback_confirmed={confirmed}"
    ))
}

#[derive(Deserialize)]
pub struct AccessTokenParams {
    pub oauth_verifier: Option<String>,
}

async fn access_token(Query(params): Query<AccessTokenParams>) -> Response {
    if params.oauth_verifier.is_none() {
        return (StatusCode::UNAUTHORIZED, "Request token missing").into_response();
    }
    form_encoded(format!(
        "oauth_token={ACCESS_TOKEN}&oauth_token_secret={ACCESS_TOKEN_SECRET}&user_id=6253282&screen_name=twitterapi"
    ))
}

//! Route table and handlers

use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::{debug, error};

use crate::collectors::vnstat::CollectionError;
use crate::server::AppState;
use crate::translator::{self, SerializationError};

/// Landing page served at `/stat.html`
pub const LANDING_PAGE: &str = include_str!("../../static/stat.html");

const JSON_CONTENT_TYPE: &str = "application/json";

/// Error payload: `{"error": <kind>, "message": <text>}` with status 500
#[derive(Debug)]
pub enum ApiError {
    Collection(CollectionError),
    Serialization(SerializationError),
}

impl From<CollectionError> for ApiError {
    fn from(err: CollectionError) -> Self {
        ApiError::Collection(err)
    }
}

impl From<SerializationError> for ApiError {
    fn from(err: SerializationError) -> Self {
        ApiError::Serialization(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (kind, message) = match &self {
            ApiError::Collection(e) => (e.kind(), e.to_string()),
            ApiError::Serialization(e) => ("serialization_error", e.to_string()),
        };
        error!("Request failed ({}): {}", kind, message);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": kind, "message": message })),
        )
            .into_response()
    }
}

fn json_response(body: String) -> Response {
    ([(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], body).into_response()
}

/// Builds the router once at startup
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/stat.html", get(landing_page))
        .route("/vnstat/{iface}/{debug}", get(vnstat_report))
        .route("/dashboard/{iface}", get(dashboard))
        .route("/list", get(list_interfaces))
        .with_state(state)
}

// GET /vnstat/{iface}/{debug}
pub async fn vnstat_report(
    State(app): State<AppState>,
    Path((iface, debug)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    debug!("Report requested for {} (mode '{}')", iface, debug);
    let record = app.provider.fetch_report(&iface).await?;
    let body = translator::serialize(&record, debug == "debug")?;
    Ok(json_response(body))
}

// GET /dashboard/{iface}
pub async fn dashboard(
    State(app): State<AppState>,
    Path(iface): Path<String>,
) -> Result<String, ApiError> {
    Ok(app.provider.fetch_dashboard(&iface).await?)
}

// GET /list
pub async fn list_interfaces(State(app): State<AppState>) -> Result<Response, ApiError> {
    let names = app.provider.list_interfaces().await?;
    Ok(json_response(translator::to_json(&names, false)?))
}

// GET /
pub async fn home() -> impl IntoResponse {
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, "/stat.html")])
}

// GET /stat.html
pub async fn landing_page() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

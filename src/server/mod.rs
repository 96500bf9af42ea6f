//! HTTP surface consumed by the web frontend.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::assets::AssetResolver;
use crate::error::AppError;
use crate::profile::ProfileService;
use crate::riot::RiotClient;

pub mod routes;

/// Shared state behind every handler. One client (and one concurrency cap)
/// for the whole process.
pub struct AppState {
    pub service: ProfileService<RiotClient>,
    pub assets: AssetResolver,
}

impl AppState {
    pub fn new(service: ProfileService<RiotClient>, assets: AssetResolver) -> Self {
        Self { service, assets }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::profile_routes())
        .merge(routes::asset_routes())
        .merge(routes::health_routes())
        .with_state(state)
}

pub async fn run(state: AppState, addr: SocketAddr) -> Result<(), AppError> {
    let app = router(Arc::new(state)).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::InvalidParam(msg) => {
                (StatusCode::BAD_REQUEST, json!({ "error": msg }))
            }
            AppError::InvalidPlatform(_) => {
                (StatusCode::BAD_REQUEST, json!({ "error": self.to_string() }))
            }
            AppError::PlayerNotFound { .. } | AppError::NotFound => {
                (StatusCode::NOT_FOUND, json!({ "error": "Summoner not found" }))
            }
            AppError::Config(_) | AppError::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Internal server error" }),
            ),
            AppError::RiotApi { .. } | AppError::Http(_) => (
                StatusCode::BAD_GATEWAY,
                json!({ "error": "Failed to fetch upstream data", "message": self.to_string() }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

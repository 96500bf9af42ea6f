//! API routes: profile, match window, mastery, asset proxy and health.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::header::{HeaderName, CACHE_CONTROL, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::assets::{placeholder_bytes, AssetKind, ResolvedAsset, PLACEHOLDER_CACHE_CONTROL};
use crate::error::AppError;
use crate::riot::Platform;
use crate::server::AppState;

type AppStateArc = Arc<AppState>;

const DEFAULT_TAG_LINE: &str = "NA1";
const DEFAULT_MASTERY_COUNT: u32 = 5;

pub fn profile_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/profile", get(get_profile))
        .route("/api/matches", get(get_matches))
        .route("/api/mastery", get(get_mastery))
}

pub fn asset_routes() -> Router<AppStateArc> {
    Router::new().route("/api/assets/:kind/:id", get(get_asset))
}

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/api/health", get(health))
}

fn parse_platform(raw: Option<&str>) -> Result<Platform, AppError> {
    raw.unwrap_or("na1").parse()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileQuery {
    game_name: Option<String>,
    tag_line: Option<String>,
    platform: Option<String>,
}

async fn get_profile(
    State(state): State<AppStateArc>,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let game_name = query
        .game_name
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::InvalidParam("gameName parameter is required".into()))?;
    let tag_line = query.tag_line.as_deref().unwrap_or(DEFAULT_TAG_LINE);
    let platform = parse_platform(query.platform.as_deref())?;

    let profile = state
        .service
        .fetch_profile(platform, &game_name, tag_line)
        .await?;

    Ok(Json(json!({ "success": true, "data": profile })))
}

#[derive(Deserialize)]
struct MatchesQuery {
    puuid: Option<String>,
    start: Option<u32>,
    count: Option<u32>,
    platform: Option<String>,
}

async fn get_matches(
    State(state): State<AppStateArc>,
    Query(query): Query<MatchesQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let puuid = query
        .puuid
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::InvalidParam("puuid parameter is required".into()))?;
    let start = query.start.unwrap_or(crate::profile::FIRST_WINDOW);
    let count = query.count.unwrap_or(crate::profile::FIRST_WINDOW);
    let platform = parse_platform(query.platform.as_deref())?;

    let window = state
        .service
        .fetch_window(platform, &puuid, start, count)
        .await?;

    Ok(Json(json!({ "success": true, "data": window })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MasteryQuery {
    summoner_id: Option<String>,
    puuid: Option<String>,
    count: Option<u32>,
    platform: Option<String>,
}

async fn get_mastery(
    State(state): State<AppStateArc>,
    Query(query): Query<MasteryQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let platform = parse_platform(query.platform.as_deref())?;
    let count = query.count.unwrap_or(DEFAULT_MASTERY_COUNT);

    let mastery = state
        .service
        .lookup_mastery(
            platform,
            query.puuid.as_deref(),
            query.summoner_id.as_deref(),
            count,
        )
        .await?;

    Ok(Json(json!({ "success": true, "mastery": mastery })))
}

async fn get_asset(
    State(state): State<AppStateArc>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let kind: AssetKind = kind.parse()?;
    info!(%kind, id, "asset lookup");

    let response = match state.assets.resolve(kind, &id).await {
        ResolvedAsset::Resolved {
            bytes,
            content_type,
            source_url,
        } => (
            [
                (CONTENT_TYPE, content_type),
                (CACHE_CONTROL, kind.cache_control().to_string()),
                (HeaderName::from_static("x-upstream-url"), source_url),
            ],
            bytes,
        )
            .into_response(),
        ResolvedAsset::Degraded => (
            [
                (CONTENT_TYPE, "image/png".to_string()),
                (CACHE_CONTROL, PLACEHOLDER_CACHE_CONTROL.to_string()),
                (HeaderName::from_static("x-placeholder"), "true".to_string()),
            ],
            placeholder_bytes(),
        )
            .into_response(),
    };

    Ok(response)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

//! HTTP route handlers for the content server.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;

use super::error::ApiError;
use super::metrics::{CollectionName, Metrics};
use super::request::{StrategyRequest, UploadForm, VideoLinkRequest, from_json_body};
use crate::error::Error;
use crate::model::{CheatSheetRecord, StrategyRecord, VideoRecord};
use crate::uploads::{MediaKind, UPLOADS_ROUTE_PREFIX};
use crate::ContentDb;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<ContentDb>,
    pub metrics: Arc<Metrics>,
}

/// Handle GET /api/videos
pub async fn handle_list_videos(
    State(state): State<AppState>,
) -> Result<Json<Vec<VideoRecord>>, ApiError> {
    Ok(Json(state.db.list_videos().await?))
}

/// Handle POST /api/videos/link
pub async fn handle_add_video_link(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<VideoRecord>, ApiError> {
    let request: VideoLinkRequest = from_json_body(body)?;
    let record = state.db.add_video_link(request.into_new()?).await?;

    state.metrics.record_created(CollectionName::Videos);
    tracing::info!(id = %record.id, title = %record.title, "video link added");
    Ok(Json(record))
}

/// Handle POST /api/videos/upload
///
/// Expects a multipart form with a `video` file, a `title` and an optional
/// `category`.
pub async fn handle_add_video_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<VideoRecord>, ApiError> {
    let form = UploadForm::read(multipart, "video", MediaKind::Video, &state.db).await?;
    let upload = form.into_video()?;
    let size = upload.file.bytes.len();

    let record = state.db.add_video_upload(upload).await?;

    state.metrics.record_created(CollectionName::Videos);
    state.metrics.content_upload_bytes_total.inc_by(size as u64);
    tracing::info!(id = %record.id, title = %record.title, bytes = size, "video uploaded");
    Ok(Json(record))
}

/// Handle GET /api/strategies
pub async fn handle_list_strategies(
    State(state): State<AppState>,
) -> Result<Json<Vec<StrategyRecord>>, ApiError> {
    Ok(Json(state.db.list_strategies().await?))
}

/// Handle POST /api/strategies
pub async fn handle_add_strategy(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<StrategyRecord>, ApiError> {
    let request: StrategyRequest = from_json_body(body)?;
    let record = state.db.add_strategy(request.into_new()?).await?;

    state.metrics.record_created(CollectionName::Strategies);
    tracing::info!(id = %record.id, title = %record.title, "strategy added");
    Ok(Json(record))
}

/// Handle GET /api/cheatsheets
pub async fn handle_list_cheat_sheets(
    State(state): State<AppState>,
) -> Result<Json<Vec<CheatSheetRecord>>, ApiError> {
    Ok(Json(state.db.list_cheat_sheets().await?))
}

/// Handle POST /api/cheatsheets/upload
///
/// Expects a multipart form with a `file` and a `title`.
pub async fn handle_add_cheat_sheet(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<CheatSheetRecord>, ApiError> {
    let form = UploadForm::read(multipart, "file", MediaKind::CheatSheet, &state.db).await?;
    let upload = form.into_cheat_sheet()?;
    let size = upload.file.bytes.len();

    let record = state.db.add_cheat_sheet(upload).await?;

    state.metrics.record_created(CollectionName::Cheatsheets);
    state.metrics.content_upload_bytes_total.inc_by(size as u64);
    tracing::info!(id = %record.id, title = %record.title, bytes = size, "cheat sheet uploaded");
    Ok(Json(record))
}

/// Handle GET /uploads/{*path}
///
/// Serves an uploaded file with a content type guessed from its extension.
/// Paths that cannot name a stored file are reported as not found.
pub async fn handle_upload_file(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = state.db.read_upload(&path).await.map_err(|e| match e {
        Error::InvalidInput(_) => Error::NotFound(format!("{}/{}", UPLOADS_ROUTE_PREFIX, path)),
        other => other,
    })?;
    let mime = mime_guess::from_path(&path).first_or_octet_stream();

    Ok(([(header::CONTENT_TYPE, mime.to_string())], bytes))
}

/// Handle GET /metrics
pub async fn handle_metrics(State(state): State<AppState>) -> String {
    state.metrics.encode()
}

/// Handle GET /-/healthy
///
/// Returns 200 OK if the service is running.
pub async fn handle_healthy() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

/// Handle GET /-/ready
///
/// Returns 200 OK once every collection and the upload store can be read.
pub async fn handle_ready(State(state): State<AppState>) -> (StatusCode, &'static str) {
    match state.db.check_storage().await {
        Ok(_) => (StatusCode::OK, "OK"),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "Not Ready")
        }
    }
}

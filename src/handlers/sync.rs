//! Sync endpoint handlers: preflight, full read, full-table replace, and the 405 fallback.

use crate::error::AppError;
use crate::extractors::CallerIdentity;
use crate::model::Dataset;
use crate::response;
use crate::service::{SyncService, WritePlan};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

pub async fn handle_preflight() -> Response {
    response::preflight()
}

/// Every row of every portal table, or the empty dataset in offline mode.
pub async fn handle_read(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<Dataset>, AppError> {
    let Some(pool) = state.pool.as_ref() else {
        return Ok(Json(Dataset::default()));
    };
    tracing::debug!(user_id = ?caller.user_id, session_id = ?caller.session_id, "read dataset");
    let mut conn = pool.acquire().await?;
    let dataset = SyncService::read_all(&mut conn).await?;
    Ok(Json(dataset))
}

/// Replace each portal table named in the body with the supplied records.
/// An unreadable body (e.g. over the size limit) is rejected even in offline mode.
pub async fn handle_write(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, AppError> {
    let body = body?;
    let Some(pool) = state.pool.as_ref() else {
        return Ok(Json(Dataset::default()).into_response());
    };
    let body = parse_body(&body)?;
    let plan = WritePlan::from_body(&body)?;
    if !plan.ignored.is_empty() {
        tracing::debug!(keys = ?plan.ignored, "ignoring unknown tables");
    }

    let mut conn = pool.acquire().await?;
    let summary = SyncService::replace_tables(&mut conn, &plan, state.write_mode()).await?;
    let tables: Vec<String> = summary
        .iter()
        .map(|(entity, rows)| format!("{}={}", entity, rows))
        .collect();
    tracing::info!(
        user_id = ?caller.user_id,
        session_id = ?caller.session_id,
        tables = %tables.join(","),
        "dataset saved"
    );
    Ok(response::saved().into_response())
}

pub async fn method_not_allowed() -> impl IntoResponse {
    response::method_not_allowed()
}

pub async fn not_found() -> impl IntoResponse {
    response::not_found()
}

/// An empty body counts as `{}`.
fn parse_body(bytes: &[u8]) -> Result<Value, AppError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_slice(bytes).map_err(|e| AppError::BadRequest(e.to_string()))
}

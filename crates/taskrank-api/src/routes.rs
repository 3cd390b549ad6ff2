//! HTTP handlers.

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State, rejection::BytesRejection},
};
use serde::Deserialize;
use serde_json::{Value, json};
use taskrank_engine::rank_tasks;
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::intake;
use crate::report::{AnalysisReport, SuggestionReport};
use crate::server::AppState;

/// Score and sort a submitted batch.
///
/// Accepts `{"tasks": [...]}` or a bare list as the request body. Bodies
/// over the configured limit are answered with a JSON 413.
#[instrument(skip_all)]
pub async fn analyze_tasks(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let body = body?;
    let tasks = intake::read_tasks(&body)?;
    let ranking = rank_tasks(tasks, state.scorer(), state.today());

    info!(
        bytes = body.len(),
        tasks = ranking.len(),
        cycle_detected = ranking.cycle_detected(),
        "analysis complete"
    );
    Ok(Json(AnalysisReport::from_ranking(&ranking)))
}

#[derive(Debug, Deserialize)]
pub struct SuggestParams {
    pub tasks: Option<String>,
}

/// Top suggestions for a batch passed as the `tasks` query parameter.
#[instrument(skip_all)]
pub async fn suggest_tasks(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> Result<Json<SuggestionReport>, ApiError> {
    let raw = params
        .tasks
        .filter(|tasks| !tasks.is_empty())
        .ok_or(ApiError::MissingTasksParam)?;
    let payload: Value =
        serde_json::from_str(&raw).map_err(|source| ApiError::InvalidTasksParam { source })?;

    let tasks = intake::normalize_tasks(intake::decode_payload(payload)?)?;
    let ranking = rank_tasks(tasks, state.scorer(), state.today());

    Ok(Json(SuggestionReport::from_ranking(
        &ranking,
        state.config().suggestion_limit,
    )))
}

/// Fallback for non-POST requests to the analyze endpoint.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

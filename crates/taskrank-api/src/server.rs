//! HTTP service wiring.

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use chrono::NaiveDate;
use taskrank_core::{Result, TaskRankError};
use taskrank_engine::TaskScorer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::config::ServiceConfig;
use crate::routes;

/// Shared, read-only state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    scorer: Arc<TaskScorer>,
    config: Arc<ServiceConfig>,
    /// Fixed reference date; the local date when unset
    today: Option<NaiveDate>,
}

impl AppState {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            scorer: Arc::new(TaskScorer::with_weights(config.scoring)),
            config: Arc::new(config),
            today: None,
        }
    }

    /// Pin the reference date used for urgency.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn scorer(&self) -> &TaskScorer {
        &self.scorer
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

/// Build the router for the task analysis API.
pub fn router(state: AppState) -> Router {
    let analyze = post(routes::analyze_tasks).fallback(routes::method_not_allowed);

    Router::new()
        .route("/api/tasks/analyze/", analyze.clone())
        .route("/api/tasks/analyze", analyze)
        .route("/api/tasks/suggest/", get(routes::suggest_tasks))
        .route("/api/tasks/suggest", get(routes::suggest_tasks))
        .route("/health", get(routes::health))
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Run the service until Ctrl-C.
pub async fn serve(config: ServiceConfig) -> Result<()> {
    config.validate()?;
    let addr = config.bind_addr;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| TaskRankError::internal(format!("failed to bind {addr}: {e}")))?;

    info!(%addr, "TaskRank service listening");

    axum::serve(listener, router(AppState::new(config)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| TaskRankError::internal(format!("server error: {e}")))?;

    info!("TaskRank service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

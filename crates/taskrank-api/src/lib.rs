//! # taskrank-api
//!
//! Everything between a client and the scoring engine:
//!
//! - [`intake`] - decode request payloads and normalize loosely-typed task fields
//! - [`report`] - shape ranked batches into response documents
//! - [`error`] - transport errors and their HTTP status codes
//! - [`config`] - service configuration
//! - [`server`] / [`routes`] - the axum HTTP service
//!
//! ## Endpoints
//!
//! - **POST** `/api/tasks/analyze/` - score a batch, highest score first
//! - **GET** `/api/tasks/suggest/?tasks=<json>` - top suggestions for a batch
//! - **GET** `/health` - liveness check

pub mod config;
pub mod error;
pub mod intake;
pub mod report;
pub mod routes;
pub mod server;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use report::{AnalysisReport, SuggestionReport};
pub use server::{AppState, router, serve};

//! Transport-level errors.
//!
//! These are the only failures a caller of TaskRank can see. The engine
//! itself never fails on task data; everything here is about requests that
//! could not be read as a task batch.

use axum::{
    Json,
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use taskrank_core::TaskRankError;
use thiserror::Error;
use tracing::warn;

/// Errors raised while accepting a task batch.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Analyze endpoint called with a method other than POST
    #[error("only POST allowed")]
    MethodNotAllowed,

    /// Request body exceeds the configured limit
    #[error("request body too large")]
    PayloadTooLarge,

    /// Request body could not be read
    #[error("could not read request body")]
    UnreadableBody,

    /// Request body is not valid JSON
    #[error("invalid JSON")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    /// Payload is neither a list nor an object with a `tasks` list
    #[error("expected a list of tasks")]
    NotAList,

    /// A list entry is not a JSON object
    #[error("task at position {index} is not an object")]
    InvalidTask { index: usize },

    /// Suggest endpoint called without a `tasks` query parameter
    #[error("please provide tasks param as JSON")]
    MissingTasksParam,

    /// `tasks` query parameter is not valid JSON
    #[error("invalid tasks JSON")]
    InvalidTasksParam {
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge
        } else {
            Self::UnreadableBody
        }
    }
}

/// JSON error body: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(status = status.as_u16(), error = %self, "request rejected");
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

impl From<ApiError> for TaskRankError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::InvalidJson { source } | ApiError::InvalidTasksParam { source } => {
                TaskRankError::json_parse("task payload", source)
            }
            other => TaskRankError::invalid_payload(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::MethodNotAllowed.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(ApiError::NotAList.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::PayloadTooLarge.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(ApiError::UnreadableBody.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidTask { index: 2 }.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_conversion_to_core_error() {
        let source = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
        let err: TaskRankError = ApiError::InvalidJson { source }.into();
        assert!(matches!(err, TaskRankError::JsonParse { .. }));

        let err: TaskRankError = ApiError::NotAList.into();
        assert!(err.is_input_error());
        assert!(err.to_string().contains("expected a list of tasks"));
    }
}

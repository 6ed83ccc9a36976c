//! Error taxonomy for the HTTP layer.

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

use crate::validation::ValidationError;

pub const MUST_LOG_IN: &str = "you must log in";
pub const INVALID_TOKEN: &str = "invalid token";

#[derive(Error, Debug)]
pub enum ApiError {
    /// Incomplete or malformed input.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("invalid JSON")]
    InvalidJson,

    #[error("{0}")]
    Unauthorized(&'static str),

    /// A well-formed request for a record that does not exist.
    #[error("{0}")]
    NotFound(&'static str),

    #[error("route not found")]
    RouteNotFound(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) | ApiError::InvalidJson => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) | ApiError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(e) => {
                error!(error = ?e, "unhandled failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let error = self.to_string();
        match self {
            ApiError::RouteNotFound(route) => {
                (status, Json(json!({ "error": error, "route": route }))).into_response()
            }
            _ => (status, Json(ErrorBody { error })).into_response(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonSyntaxError(_) => ApiError::InvalidJson,
            JsonRejection::JsonDataError(_) | JsonRejection::MissingJsonContentType(_) => {
                ApiError::Validation(ValidationError::Incomplete)
            }
            other => ApiError::Internal(anyhow::anyhow!(other.body_text())),
        }
    }
}

/// `Json` extractor whose rejections render as [`ApiError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

pub type ApiResult<T> = Result<T, ApiError>;

/// Fallback for unknown paths and for known paths hit with an unsupported method.
pub async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::RouteNotFound(uri.to_string())
}

//! API error handling
//!
//! Callers get no distinction between error kinds: everything is a 400 with
//! the underlying error text.

use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use gp_provider::{Operation, ProviderError};
use thiserror::Error;
use tracing::warn;

use crate::api::model::ErrorBody;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Unexpected {operation} response: expected a list")]
    UnexpectedShape { operation: Operation },

    /// Path or query the extractors could not decode
    #[error("{0}")]
    BadRequest(String),
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        warn!(error = %message, "Request failed");

        (StatusCode::BAD_REQUEST, Json(ErrorBody { message })).into_response()
    }
}

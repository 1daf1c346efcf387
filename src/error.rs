//! Request-level error type shared by every handler.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing, empty, oversized or mistyped input.
    #[error("{0}")]
    Validation(&'static str),

    /// The username is already registered.
    #[error("Username already taken")]
    Conflict,

    /// Unknown username or wrong password. Never tells the two apart.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No usable session. Missing, malformed, expired and forged tokens all land here.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("server error: {0}")]
    Server(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        Self::Server(e.into())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection.body_text(), "rejected request body");
        Self::Validation("Invalid request body")
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Conflict | Self::InvalidCredentials => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::Server(e) => {
                error!(error = ?e, "request failed");
                "Server error".to_string()
            }
            other => other.to_string(),
        };
        (self.status(), Json(ErrorBody { error: message })).into_response()
    }
}

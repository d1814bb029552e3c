use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failure kinds raised by the auth flows.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong credentials, or a gated profile lookup that missed. The
    /// message never says which.
    #[error("authorization error")]
    AuthenticationFailed,

    /// Email already registered.
    #[error("registration error")]
    RegistrationFailed,

    /// Malformed, unsigned or signature-mismatched bearer token.
    #[error("invalid token")]
    Unauthorized,

    /// Request rejected before the core flows run.
    #[error("{0}")]
    InvalidInput(&'static str),

    /// Missing or empty signing secret.
    #[error("signing secret is missing or empty")]
    Configuration,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::AuthenticationFailed | AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthError::RegistrationFailed => StatusCode::UNPROCESSABLE_ENTITY,
            AuthError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AuthError::Configuration | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "auth flow failed");
            return (status, Json(json!({ "error": "internal error" }))).into_response();
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

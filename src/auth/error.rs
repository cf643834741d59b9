//! Authentication Errors
//! Mission: Fail uniformly without leaking why a request was rejected

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown user or wrong password at login
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Bad signature, malformed or expired token
    #[error("invalid token")]
    InvalidToken,

    /// Token did not resolve to a known user
    #[error("unauthorized")]
    Unauthorized,

    /// No bearer credentials on the request
    #[error("missing bearer token")]
    MissingToken,

    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Client-facing reason. Token failures share a single message.
    pub fn detail(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "Incorrect email or password",
            AuthError::InvalidToken | AuthError::Unauthorized => "Could not validate credentials",
            AuthError::MissingToken => "Not authenticated",
            AuthError::Internal(_) => "Internal server error",
        }
    }

    /// Bearer failures on protected routes carry a challenge; login does not.
    pub fn bearer_challenge(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidToken | AuthError::Unauthorized | AuthError::MissingToken
        )
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "detail": self.detail() }));

        if self.bearer_challenge() {
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}

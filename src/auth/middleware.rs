//! Authentication Middleware
//! Mission: Protect routes by resolving the bearer token to a user

use crate::auth::{api::AuthState, error::AuthError};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

/// Resolves `Authorization: Bearer <token>` and stores the `User` in the
/// request extensions for downstream handlers.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AuthError::MissingToken)?;

    let user = state.auth_service.resolve(bearer.token())?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}


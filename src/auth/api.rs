//! Authentication API Endpoints
//! Mission: Adapt form logins and bearer lookups onto the auth service

use crate::auth::{
    error::AuthError,
    jwt::JwtHandler,
    models::{LoginForm, Token, User},
    service::AuthService,
    user_store::{InMemoryUserStore, UserStore},
};
use crate::config::Config;
use axum::{extract::State, Extension, Form, Json};
use std::sync::Arc;
use tracing::info;

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub auth_service: AuthService,
}

impl AuthState {
    pub fn new(auth_service: AuthService) -> Self {
        Self { auth_service }
    }

    /// Seeded user table plus a token handler built from `config`
    pub fn from_config(config: &Config) -> Self {
        let user_store: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::seeded());
        let jwt_handler = Arc::new(JwtHandler::from_config(config));
        Self::new(AuthService::new(user_store, jwt_handler))
    }
}

/// Login endpoint - POST /token
pub async fn login(
    State(state): State<AuthState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<Token>, AuthError> {
    info!("🔐 Login attempt: {}", form.username);

    let token = state.auth_service.login(&form.username, &form.password)?;

    Ok(Json(token))
}

/// Current user - GET /users/me (behind auth middleware)
pub async fn read_users_me(Extension(user): Extension<User>) -> Json<User> {
    Json(user)
}

//! Auth Service
//! Mission: Turn credentials into tokens and tokens back into users

use crate::auth::{
    error::AuthError,
    jwt::JwtHandler,
    models::{EmailClaim, Token, User},
    user_store::UserStore,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Credential check and token resolution, independent of HTTP
#[derive(Clone)]
pub struct AuthService {
    user_store: Arc<dyn UserStore>,
    jwt_handler: Arc<JwtHandler>,
}

impl AuthService {
    pub fn new(user_store: Arc<dyn UserStore>, jwt_handler: Arc<JwtHandler>) -> Self {
        Self {
            user_store,
            jwt_handler,
        }
    }

    #[cfg(test)]
    fn jwt_handler(&self) -> &JwtHandler {
        &self.jwt_handler
    }

    /// Exchange an email/password pair for a bearer token.
    /// Unknown user and wrong password fail identically.
    pub fn login(&self, username: &str, password: &str) -> Result<Token, AuthError> {
        let user = match self.user_store.lookup(username) {
            Some(user) if user.password == password => user,
            _ => {
                warn!("❌ Failed login attempt: {}", username);
                return Err(AuthError::InvalidCredentials);
            }
        };

        let access_token = self.jwt_handler.issue(&EmailClaim { email: &user.email })?;

        info!("✅ Login successful: {}", user.email);

        Ok(Token::bearer(access_token))
    }

    /// Resolve a bearer token to the user named in its email claim
    pub fn resolve(&self, token: &str) -> Result<User, AuthError> {
        let claims = self
            .jwt_handler
            .verify(token)
            .map_err(|_| AuthError::Unauthorized)?;

        let user = claims
            .email
            .as_deref()
            .filter(|email| !email.is_empty())
            .and_then(|email| self.user_store.lookup(email))
            .ok_or(AuthError::Unauthorized)?;

        debug!("Resolved token for {}", user.email);

        Ok(user)
    }
}

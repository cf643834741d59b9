//! Authentication Models
//! Mission: Define user, token and claim data structures

use serde::{Deserialize, Serialize};

/// User account. The email is the identity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub password: String, // plaintext, exposed by /users/me
}

impl User {
    /// Build a user record, rejecting malformed email addresses
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Option<Self> {
        let email = email.into();
        if !is_valid_email(&email) {
            return None;
        }
        Some(Self {
            email,
            password: password.into(),
        })
    }
}

/// Bearer token handed back from a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String, // always "bearer"
}

impl Token {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Claim set signed into every access token
#[derive(Debug, Clone, Serialize)]
pub struct EmailClaim<'a> {
    pub email: &'a str,
}

/// Claims recovered from a verified token. `email` is optional because a
/// correctly signed token is not guaranteed to carry one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub email: Option<String>,
    pub exp: i64, // expiration timestamp (seconds)
}

/// Login form body (`application/x-www-form-urlencoded`)
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Structural check: one '@', non-empty local part, dotted domain.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
}

//! JWT Token Handler
//! Mission: Sign and verify expiring access tokens

use crate::auth::{error::AuthError, models::Claims};
use crate::config::Config;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;
use tracing::debug;

/// Claims plus the expiry merged in at issue time
#[derive(Serialize)]
struct Expiring<'a, C: Serialize> {
    #[serde(flatten)]
    claims: &'a C,
    exp: i64,
}

/// JWT Handler for token operations
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    lifetime: Duration,
}

impl JwtHandler {
    /// Create a handler signing with `secret` under an HMAC `algorithm`.
    /// A lifetime too large for `Duration` saturates, and issuing then fails.
    pub fn new(secret: &str, algorithm: Algorithm, expire_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            lifetime: Duration::try_minutes(expire_minutes).unwrap_or(Duration::MAX),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.secret_key,
            config.algorithm,
            config.access_token_expire_minutes,
        )
    }

    /// Sign `claims` with an expiry of now + lifetime
    pub fn issue<C: Serialize>(&self, claims: &C) -> Result<String, AuthError> {
        self.issue_at(claims, Utc::now())
    }

    /// Sign `claims` as if issued at `issued_at`
    pub fn issue_at<C: Serialize>(
        &self,
        claims: &C,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let exp = issued_at
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| AuthError::Internal("Invalid timestamp".to_string()))?
            .timestamp();

        debug!(
            "Issuing JWT ({:?}), expires in {}m",
            self.algorithm,
            self.lifetime.num_minutes()
        );

        encode(
            &Header::new(self.algorithm),
            &Expiring { claims, exp },
            &self.encoding_key,
        )
        .map_err(|e| AuthError::Internal(format!("Failed to encode JWT: {e}")))
    }

    /// Check signature and expiry. Every failure is `InvalidToken`.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        // Pin the algorithm; exp is required and checked with no leeway
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Rejected JWT: {:?}", e.kind());
                AuthError::InvalidToken
            })
    }
}

// JWT session token issuance and validation service

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::error::AuthError;

/// Session tokens live for 6 hours from issuance
pub const SESSION_TOKEN_TTL_SECS: i64 = 6 * 60 * 60;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub authorized: bool,
    pub user_id: String,
    pub exp: i64, // expiration timestamp (seconds)
    pub iat: i64, // issued at timestamp (seconds)
}

/// Token service for JWT operations
///
/// Tokens are HMAC-SHA256 signed and never persisted server-side.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    has_key: bool,
    lifetime_secs: i64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("lifetime_secs", &self.lifetime_secs)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Create a new TokenService with the signing secret
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            has_key: !secret.is_empty(),
            lifetime_secs: SESSION_TOKEN_TTL_SECS,
        }
    }

    /// Issue a signed token for `subject_id`, valid for 6 hours
    pub fn issue(&self, subject_id: Uuid) -> Result<String, AuthError> {
        if !self.has_key {
            return Err(AuthError::TokenGenerationError(
                "signing key is not configured".to_string(),
            ));
        }

        let now = Utc::now().timestamp();
        let claims = Claims {
            authorized: true,
            user_id: subject_id.to_string(),
            iat: now,
            exp: now + self.lifetime_secs,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
    }

    /// Verify signature and expiry, returning the claims
    ///
    /// Every failure (bad signature, malformed token, expired, not
    /// authorized) collapses into `InvalidToken`.
    pub fn validate(&self, raw_token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let claims = decode::<Claims>(raw_token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token rejected: {}", e);
                AuthError::InvalidToken
            })?;

        if !claims.authorized {
            return Err(AuthError::InvalidToken);
        }

        Ok(claims)
    }

    /// Validate the token and return the embedded subject id
    pub fn extract_subject(&self, raw_token: &str) -> Result<Uuid, AuthError> {
        let claims = self.validate(raw_token)?;
        Uuid::parse_str(&claims.user_id).map_err(|_| AuthError::InvalidToken)
    }
}

/// Pull the token out of an `Authorization: <scheme> <token>` header value
///
/// Anything that is not exactly two space-separated parts yields an empty
/// token, which then fails validation.
pub fn extract_token(header_value: Option<&str>) -> &str {
    let Some(value) = header_value else {
        return "";
    };

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_scheme), Some(token), None) => token,
        _ => "",
    }
}

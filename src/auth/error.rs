// Authentication and authorization error types

use axum::response::{IntoResponse, Response};

use crate::error::ApiError;

/// Faults raised by the token service, the credential verifier and the
/// ownership checks
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Malformed, tampered, expired or missing session token
    #[error("Invalid token")]
    InvalidToken,

    /// Plaintext does not match the stored hash
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Caller is authenticated but does not own the target resource
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Password hashing error: {0}")]
    PasswordHashError(String),

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::InvalidToken => ApiError::Unauthorized("Invalid token".to_string()),
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::Forbidden(message) => ApiError::Forbidden(message),
            AuthError::PasswordHashError(message) => {
                ApiError::InternalError(format!("password hashing failed: {}", message))
            }
            AuthError::TokenGenerationError(message) => {
                ApiError::InternalError(format!("token generation failed: {}", message))
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

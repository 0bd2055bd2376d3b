// Error handling module for the Postlog API
// Provides the boundary error type and its HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error, warn};

/// Main error type for the API
/// All handlers and services return Result<T, ApiError>
///
/// Each variant maps to exactly one HTTP status code and error code, so a
/// client can always tell the fault classes apart.
#[derive(Debug)]
pub enum ApiError {
    /// Field-level validation failures from the validator crate
    /// Maps to HTTP 400 Bad Request
    ValidationError(validator::ValidationErrors),

    /// Malformed input that is not tied to a request body field
    /// (e.g. an unparsable id in the path)
    /// Maps to HTTP 400 Bad Request
    InvalidInput(String),

    /// Email/password mismatch
    /// Maps to HTTP 401 Unauthorized
    InvalidCredentials,

    /// Missing, malformed, tampered or expired session token
    /// Maps to HTTP 401 Unauthorized
    Unauthorized(String),

    /// Caller does not own the resource being mutated
    /// Maps to HTTP 403 Forbidden
    Forbidden(String),

    /// Resource not found by ID
    /// Maps to HTTP 404 Not Found
    NotFound { resource: String, id: String },

    /// Unique constraint conflict (email or nick already taken)
    /// Maps to HTTP 409 Conflict
    Conflict { message: String },

    /// Database operation errors
    /// Maps to HTTP 500 Internal Server Error
    /// Sensitive details are filtered from client responses
    DatabaseError(sqlx::Error),

    /// The store did not answer within the configured timeout
    /// Maps to HTTP 503 Service Unavailable
    StoreUnavailable(String),

    /// Internal server errors
    /// Maps to HTTP 500 Internal Server Error
    InternalError(String),
}

/// Consistent error response structure
///
/// Machine-readable `error_code` plus a human-readable `message`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error_code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// ISO 8601 timestamp of when the error occurred
    pub timestamp: String,
}

impl ErrorResponse {
    fn new(error_code: &str, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.to_string(),
            message: message.into(),
            details: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = self.to_error_response();
        (status, Json(error_response)).into_response()
    }
}

impl ApiError {
    /// Shorthand for a missing resource
    pub fn not_found(resource: &str, id: impl ToString) -> Self {
        ApiError::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    /// Convert ApiError to HTTP status code and ErrorResponse
    ///
    /// Logging level follows severity: error! for infrastructure faults,
    /// warn! for security-relevant rejections, debug! for ordinary client errors.
    fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        let status = self.status_code();
        let response = match self {
            ApiError::ValidationError(errors) => {
                debug!("Validation error: {:?}", errors);
                let mut response = ErrorResponse::new("VALIDATION_ERROR", "Request validation failed");
                response.details =
                    Some(serde_json::to_value(errors).unwrap_or(serde_json::json!({})));
                response
            }
            ApiError::InvalidInput(message) => {
                debug!("Invalid input: {}", message);
                ErrorResponse::new("VALIDATION_ERROR", message.clone())
            }
            ApiError::InvalidCredentials => {
                warn!("Rejected credentials");
                ErrorResponse::new("INVALID_CREDENTIALS", "Invalid email or password")
            }
            ApiError::Unauthorized(message) => {
                warn!("Unauthorized access attempt: {}", message);
                ErrorResponse::new("UNAUTHORIZED", message.clone())
            }
            ApiError::Forbidden(message) => {
                warn!("Forbidden access attempt: {}", message);
                ErrorResponse::new("FORBIDDEN", message.clone())
            }
            ApiError::NotFound { resource, id } => {
                debug!("Resource not found: {} with id {}", resource, id);
                ErrorResponse::new("NOT_FOUND", format!("{} with id {} not found", resource, id))
            }
            ApiError::Conflict { message } => {
                warn!("Conflict error: {}", message);
                ErrorResponse::new("CONFLICT", message.clone())
            }
            ApiError::DatabaseError(db_error) => {
                // Full error stays in the logs, never in the response body
                error!("Database error: {:?}", db_error);
                ErrorResponse::new("DATABASE_ERROR", "A database error occurred")
            }
            ApiError::StoreUnavailable(message) => {
                error!("Store unavailable: {}", message);
                ErrorResponse::new("STORE_UNAVAILABLE", "The data store is temporarily unavailable")
            }
            ApiError::InternalError(internal_msg) => {
                error!("Internal error: {}", internal_msg);
                ErrorResponse::new("INTERNAL_ERROR", "An internal server error occurred")
            }
        };

        (status, response)
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) | ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::DatabaseError(_) | ApiError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::ValidationError(errors) => write!(f, "Validation error: {}", errors),
            ApiError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ApiError::InvalidCredentials => write!(f, "Invalid email or password"),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound { resource, id } => write!(f, "{} with id {} not found", resource, id),
            ApiError::Conflict { message } => write!(f, "Conflict: {}", message),
            ApiError::DatabaseError(e) => write!(f, "Database error: {}", e),
            ApiError::StoreUnavailable(msg) => write!(f, "Store unavailable: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Convert sqlx errors to ApiError
///
/// Unique violations become conflicts; a pool timeout means the store is
/// unreachable rather than broken.
impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => ApiError::Conflict {
                message: match db_err.constraint() {
                    Some(constraint) if constraint.contains("email") => {
                        "Email already exists".to_string()
                    }
                    Some(constraint) if constraint.contains("nick") => {
                        "Nick already exists".to_string()
                    }
                    _ => "Resource already exists".to_string(),
                },
            },
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                ApiError::Conflict {
                    message: "Resource is still referenced".to_string(),
                }
            }
            sqlx::Error::PoolTimedOut => {
                ApiError::StoreUnavailable("timed out acquiring a connection".to_string())
            }
            _ => ApiError::DatabaseError(error),
        }
    }
}

/// Convert validator errors to ApiError
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(errors)
    }
}

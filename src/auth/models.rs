// Authentication DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::validate_not_blank;

/// Login request DTO
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(custom = "validate_not_blank")]
    #[schema(example = "john@example.com")]
    pub email: String,
    #[validate(custom = "validate_not_blank")]
    pub password: String,
}

/// Authentication response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub id: Uuid,
    /// Session token, valid for six hours
    pub token: String,
}

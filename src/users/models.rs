use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::validate_not_blank;

/// User as exposed to callers; the password never leaves the store this way
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "johnd")]
    pub nick: String,
    #[schema(example = "john@example.com")]
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Id and password hash, read only for login
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub id: Uuid,
    pub password: String,
}

/// Registration request DTO
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(custom = "validate_not_blank")]
    pub name: String,
    #[validate(custom = "validate_not_blank")]
    pub nick: String,
    #[validate(email(message = "the email format is invalid"))]
    pub email: String,
    #[validate(custom = "validate_not_blank")]
    pub password: String,
}

/// Profile update DTO; the password is changed through its own endpoint
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(custom = "validate_not_blank")]
    pub name: String,
    #[validate(custom = "validate_not_blank")]
    pub nick: String,
    #[validate(email(message = "the email format is invalid"))]
    pub email: String,
}

/// Password change DTO
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdatePasswordRequest {
    pub current: String,
    #[validate(custom = "validate_not_blank")]
    pub new: String,
}

/// Validated, trimmed profile fields ready to persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
    pub nick: String,
    pub email: String,
}

impl UserProfile {
    fn trimmed(name: &str, nick: &str, email: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            nick: nick.trim().to_string(),
            email: email.trim().to_string(),
        }
    }
}

impl CreateUserRequest {
    /// Trim name, nick and email so validation sees what gets stored
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            nick: self.nick.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password,
        }
    }
}

impl UpdateUserRequest {
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            nick: self.nick.trim().to_string(),
            email: self.email.trim().to_string(),
        }
    }
}

impl From<&CreateUserRequest> for UserProfile {
    fn from(request: &CreateUserRequest) -> Self {
        Self::trimmed(&request.name, &request.nick, &request.email)
    }
}

impl From<&UpdateUserRequest> for UserProfile {
    fn from(request: &UpdateUserRequest) -> Self {
        Self::trimmed(&request.name, &request.nick, &request.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(email: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: "John Doe".to_string(),
            nick: "johnd".to_string(),
            email: email.to_string(),
            password: "pw123".to_string(),
        }
    }

    #[test]
    fn valid_registration_passes() {
        assert!(registration("john@example.com").validate().is_ok());
    }

    #[test]
    fn malformed_email_is_rejected() {
        let errors = registration("not-an-email").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn blank_password_is_rejected() {
        let mut request = registration("john@example.com");
        request.password = "  ".to_string();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn padded_email_is_valid_once_trimmed() {
        let request = registration(" john@example.com ");
        assert!(request.validate().is_err());

        let trimmed = request.trimmed();
        assert!(trimmed.validate().is_ok());
        assert_eq!(trimmed.email, "john@example.com");
        assert_eq!(trimmed.password, "pw123");
    }

    #[test]
    fn profile_is_trimmed() {
        let request = UpdateUserRequest {
            name: " John Doe ".to_string(),
            nick: "johnd\n".to_string(),
            email: "john@example.com".to_string(),
        };
        let profile = UserProfile::from(&request);
        assert_eq!(profile.name, "John Doe");
        assert_eq!(profile.nick, "johnd");
    }

    #[test]
    fn user_json_has_no_password() {
        let user = User {
            id: Uuid::new_v4(),
            name: "John Doe".to_string(),
            nick: "johnd".to_string(),
            email: "john@example.com".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
    }
}

// Authentication service - business logic layer

use std::sync::Arc;
use validator::Validate;

use crate::auth::{
    models::{AuthResponse, LoginRequest},
    password::PasswordService,
    token::TokenService,
};
use crate::error::ApiError;
use crate::users::UserRepository;

/// Authentication service coordinating credential checks and token issuance
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: TokenService,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(users: Arc<dyn UserRepository>, tokens: TokenService) -> Self {
        Self { users, tokens }
    }

    /// Login a user
    ///
    /// This method:
    /// 1. Looks up the stored credentials by email
    /// 2. Verifies the password against the stored hash
    /// 3. Issues a session token for the user id
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, ApiError> {
        request.validate()?;

        let credentials = self.users.search_by_email(request.email.trim()).await?;
        PasswordService::verify_password(&request.password, &credentials.password)?;

        let token = self.tokens.issue(credentials.id)?;
        tracing::info!("User {} logged in", credentials.id);

        Ok(AuthResponse {
            id: credentials.id,
            token,
        })
    }
}

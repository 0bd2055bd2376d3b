use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::ensure_owner;
use crate::auth::password::PasswordService;
use crate::error::ApiError;
use crate::users::models::{
    CreateUserRequest, UpdatePasswordRequest, UpdateUserRequest, User, UserProfile,
};
use crate::users::repository::UserRepository;

/// Service layer for user accounts
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    /// Create a new UserService
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Register a new user
    ///
    /// This method:
    /// 1. Trims the profile fields
    /// 2. Validates name, nick, email format and password
    /// 3. Hashes the password before it reaches the store
    pub async fn register(&self, request: CreateUserRequest) -> Result<User, ApiError> {
        let request = request.trimmed();
        request.validate()?;

        let profile = UserProfile::from(&request);
        let password_hash = PasswordService::hash_password(&request.password)?;

        let user = self.repository.create(&profile, &password_hash).await?;
        tracing::info!("Registered user {} ({})", user.id, user.nick);

        Ok(user)
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<User, ApiError> {
        self.repository.get_by_id(user_id).await
    }

    /// Overwrite the caller's own profile
    pub async fn update_user(
        &self,
        user_id: Uuid,
        caller_id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<(), ApiError> {
        ensure_owner(
            caller_id,
            user_id,
            "it is not possible to update a user if not yours",
        )?;
        let request = request.trimmed();
        request.validate()?;

        self.repository
            .update(user_id, &UserProfile::from(&request))
            .await
    }

    pub async fn delete_user(&self, user_id: Uuid, caller_id: Uuid) -> Result<(), ApiError> {
        ensure_owner(
            caller_id,
            user_id,
            "it is not possible to delete a user if not yours",
        )?;

        self.repository.delete(user_id).await?;
        tracing::info!("Deleted user {}", user_id);
        Ok(())
    }

    /// Change the caller's own password
    ///
    /// This method:
    /// 1. Verifies the caller owns the account
    /// 2. Checks the current password against the stored hash
    /// 3. Stores a hash of the new password
    pub async fn update_password(
        &self,
        user_id: Uuid,
        caller_id: Uuid,
        request: UpdatePasswordRequest,
    ) -> Result<(), ApiError> {
        ensure_owner(
            caller_id,
            user_id,
            "it is not possible to change other user's password",
        )?;
        request.validate()?;

        let stored_hash = self.repository.search_password(user_id).await?;
        PasswordService::verify_password(&request.current, &stored_hash)?;

        let new_hash = PasswordService::hash_password(&request.new)?;
        self.repository.update_password(user_id, &new_hash).await
    }
}

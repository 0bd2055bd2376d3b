use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::validation::validate_not_blank;

/// A post as read back from the store, joined with its author's nick
///
/// Also the element type of the cached listing, hence `Deserialize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    #[schema(example = "First Post")]
    pub title: String,
    #[schema(example = "Hello, world")]
    pub content: String,
    pub author_id: Uuid,
    #[schema(example = "johnd")]
    pub author_nick: String,
    /// Never negative
    #[schema(example = 0, minimum = 0)]
    pub likes: i64,
    pub created_at: DateTime<Utc>,
}

/// Request body for creating or updating a post
///
/// Only title and content are writable; author and likes are not.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct PostInput {
    #[validate(custom = "validate_not_blank")]
    #[schema(example = "First Post")]
    pub title: String,
    #[validate(custom = "validate_not_blank")]
    #[schema(example = "Hello, world")]
    pub content: String,
}

/// Title and content after validation and trimming, ready to persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedPost {
    pub title: String,
    pub content: String,
}

impl PostInput {
    /// Validate, then trim surrounding whitespace
    pub fn prepare(&self) -> Result<PreparedPost, ApiError> {
        self.validate()?;

        Ok(PreparedPost {
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
        })
    }
}

/// Response body for a freshly created post
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedPost {
    pub id: Uuid,
}

//! User model.

use quill_core::grading::Reviewer;
use quill_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub display_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// The user acting as a reviewer, with their current display name.
    pub fn as_reviewer(&self) -> Reviewer {
        Reviewer {
            user_id: self.id,
            display_name: self.display_name.clone(),
        }
    }
}

/// DTO for creating a user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub display_name: String,
}

//! Repository for the `topics` table.

use quill_core::types::DbId;
use sqlx::PgPool;

use crate::models::topic::{CreateTopic, Topic};

const COLUMNS: &str = "id, title, created_at, updated_at";

pub struct TopicRepo;

impl TopicRepo {
    pub async fn create(pool: &PgPool, input: &CreateTopic) -> Result<Topic, sqlx::Error> {
        let query = format!("INSERT INTO topics (title) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Topic>(&query)
            .bind(&input.title)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Topic>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM topics WHERE id = $1");
        sqlx::query_as::<_, Topic>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

//! Repository for the `topic_reservations` table.

use quill_core::store::ReservationStatus;
use quill_core::types::DbId;
use sqlx::PgPool;

use crate::models::topic::Reservation;

const COLUMNS: &str = "id, topic_id, user_id, status, created_at, updated_at";

/// Provides reservation lookups and the submitted-status transition.
pub struct ReservationRepo;

impl ReservationRepo {
    /// Reserve `topic_id` for `user_id`.
    pub async fn create(
        pool: &PgPool,
        topic_id: DbId,
        user_id: DbId,
    ) -> Result<Reservation, sqlx::Error> {
        let query = format!(
            "INSERT INTO topic_reservations (topic_id, user_id, status)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(topic_id)
            .bind(user_id)
            .bind(ReservationStatus::Reserved.as_str())
            .fetch_one(pool)
            .await
    }

    pub async fn find(
        pool: &PgPool,
        topic_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM topic_reservations WHERE topic_id = $1 AND user_id = $2"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(topic_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Mark the reservation submitted. Returns `true` if a reservation existed.
    pub async fn mark_submitted(
        pool: &PgPool,
        topic_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE topic_reservations SET status = $3, updated_at = NOW() \
             WHERE topic_id = $1 AND user_id = $2",
        )
        .bind(topic_id)
        .bind(user_id)
        .bind(ReservationStatus::Submitted.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

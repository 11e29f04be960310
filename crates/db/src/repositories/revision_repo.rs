//! Repository for the `article_revisions` table.
//!
//! Revisions are append-only snapshots; `delete` exists only to compensate
//! for a mutation that failed after its snapshot was written.

use quill_core::article::{NewRevision, Revision};
use quill_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::revision::{RevisionDetailRow, RevisionRow, RevisionView};

/// Column list for article_revisions queries.
const COLUMNS: &str = "id, article_id, owner_id, topic_id, version, title, body, fields, \
    grades, updated_at, created_at";

/// Column list for article_revisions joined with `users u` as `r`.
const DETAIL_COLUMNS: &str = "r.id, r.article_id, r.owner_id, r.topic_id, r.version, r.title, \
    r.body, r.fields, r.grades, r.updated_at, r.created_at, u.display_name AS owner_name";

/// Provides archive and read operations for article revisions.
pub struct RevisionRepo;

impl RevisionRepo {
    /// Archive a snapshot. `created_at` records the archival time.
    pub async fn create(pool: &PgPool, input: &NewRevision) -> Result<Revision, sqlx::Error> {
        let state = &input.state;
        let query = format!(
            "INSERT INTO article_revisions
                (article_id, owner_id, topic_id, version, title, body, fields, grades, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RevisionRow>(&query)
            .bind(input.article_id)
            .bind(state.owner_id)
            .bind(state.topic_id)
            .bind(state.version)
            .bind(&state.content.title)
            .bind(&state.content.body)
            .bind(Json(&state.content.fields))
            .bind(Json(&state.grades))
            .bind(state.updated_at)
            .fetch_one(pool)
            .await
            .map(Revision::from)
    }

    /// Find a revision by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Revision>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM article_revisions WHERE id = $1");
        let row = sqlx::query_as::<_, RevisionRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Revision::from))
    }

    /// Find a revision by ID with its owner's display name.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<RevisionView>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM article_revisions r
             JOIN users u ON u.id = r.owner_id
             WHERE r.id = $1"
        );
        let row = sqlx::query_as::<_, RevisionDetailRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(RevisionView::from))
    }

    /// List revisions of an article, most recently archived first.
    pub async fn list_by_article(
        pool: &PgPool,
        article_id: DbId,
    ) -> Result<Vec<Revision>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM article_revisions
             WHERE article_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, RevisionRow>(&query)
            .bind(article_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Revision::from).collect())
    }

    /// Delete a revision. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM article_revisions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

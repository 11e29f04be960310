//! Repository for the `articles` table.
//!
//! Writes that the version controller relies on (`commit`, `append_grade`)
//! are single conditional statements so their checks and writes are atomic.

use quill_core::article::{Article, NewArticle};
use quill_core::grading::Grade;
use quill_core::types::{DbId, VersionNumber};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::article::{ArticleDetailRow, ArticleRow, ArticleView};

/// Column list for articles queries.
const COLUMNS: &str = "id, owner_id, topic_id, version, title, body, fields, grades, \
    created_at, updated_at";

/// Column list for articles joined with `users u` as `a`.
const DETAIL_COLUMNS: &str = "a.id, a.owner_id, a.topic_id, a.version, a.title, a.body, \
    a.fields, a.grades, a.created_at, a.updated_at, u.display_name AS owner_name";

/// Provides CRUD and versioned-write operations for articles.
pub struct ArticleRepo;

impl ArticleRepo {
    /// Insert a new article at the column default version with no grades.
    pub async fn create(pool: &PgPool, input: &NewArticle) -> Result<Article, sqlx::Error> {
        let query = format!(
            "INSERT INTO articles (owner_id, topic_id, title, body, fields)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ArticleRow>(&query)
            .bind(input.owner_id)
            .bind(input.topic_id)
            .bind(&input.content.title)
            .bind(&input.content.body)
            .bind(Json(&input.content.fields))
            .fetch_one(pool)
            .await
            .map(Article::from)
    }

    /// Find an article by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Article>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM articles WHERE id = $1");
        let row = sqlx::query_as::<_, ArticleRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Article::from))
    }

    /// Find an article by ID with its owner's display name.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<ArticleView>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM articles a
             JOIN users u ON u.id = a.owner_id
             WHERE a.id = $1"
        );
        let row = sqlx::query_as::<_, ArticleDetailRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(ArticleView::from))
    }

    /// List articles newest first, optionally restricted to one owner.
    pub async fn list(
        pool: &PgPool,
        owner_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ArticleView>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM articles a
             JOIN users u ON u.id = a.owner_id
             WHERE ($1::BIGINT IS NULL OR a.owner_id = $1)
             ORDER BY a.created_at DESC, a.id DESC
             LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, ArticleDetailRow>(&query)
            .bind(owner_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(ArticleView::from).collect())
    }

    /// Write the content and version of `next` if the stored version is still
    /// `expected_version`.
    ///
    /// Grades are emptied in place when `clear_grades` is set and otherwise
    /// left untouched, so a grade appended concurrently is never overwritten.
    /// Returns `None` when no row matched.
    pub async fn commit(
        pool: &PgPool,
        next: &Article,
        expected_version: VersionNumber,
        clear_grades: bool,
    ) -> Result<Option<Article>, sqlx::Error> {
        let query = format!(
            "UPDATE articles SET
                version = $3,
                title = $4,
                body = $5,
                fields = $6,
                grades = CASE WHEN $7::BOOL THEN '[]'::jsonb ELSE grades END,
                updated_at = NOW()
             WHERE id = $1 AND version = $2
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ArticleRow>(&query)
            .bind(next.id)
            .bind(expected_version)
            .bind(next.state.version)
            .bind(&next.state.content.title)
            .bind(&next.state.content.body)
            .bind(Json(&next.state.content.fields))
            .bind(clear_grades)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Article::from))
    }

    /// Append `grade` unless the reviewer already has a grade on the article.
    ///
    /// Returns `None` when the article is missing or already graded by this
    /// reviewer; use [`ArticleRepo::exists`] to tell the two apart.
    pub async fn append_grade(
        pool: &PgPool,
        article_id: DbId,
        grade: &Grade,
    ) -> Result<Option<Article>, sqlx::Error> {
        let query = format!(
            "UPDATE articles SET
                grades = grades || jsonb_build_array($2::jsonb),
                updated_at = NOW()
             WHERE id = $1
               AND NOT grades @> jsonb_build_array(jsonb_build_object('reviewer_id', $3::BIGINT))
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ArticleRow>(&query)
            .bind(article_id)
            .bind(Json(grade))
            .bind(grade.reviewer_id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Article::from))
    }

    /// Whether an article with `id` exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM articles WHERE id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await?;
        Ok(exists)
    }

    /// Permanently delete an article. Its revisions are kept.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

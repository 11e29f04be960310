//! Article rows, views and DTOs.

use quill_core::article::{Article, ArticleContent, DocumentState};
use quill_core::grading::Grade;
use quill_core::types::{DbId, Timestamp, VersionNumber};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `articles` table.
#[derive(Debug, Clone, FromRow)]
pub struct ArticleRow {
    pub id: DbId,
    pub owner_id: DbId,
    pub topic_id: DbId,
    pub version: VersionNumber,
    pub title: String,
    pub body: String,
    pub fields: Json<Map<String, Value>>,
    pub grades: Json<Vec<Grade>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<ArticleRow> for Article {
    fn from(row: ArticleRow) -> Self {
        Article {
            id: row.id,
            state: DocumentState {
                owner_id: row.owner_id,
                topic_id: row.topic_id,
                version: row.version,
                content: ArticleContent {
                    title: row.title,
                    body: row.body,
                    fields: row.fields.0,
                },
                grades: row.grades.0,
                updated_at: row.updated_at,
            },
            created_at: row.created_at,
        }
    }
}

/// An article row joined with its owner's display name.
#[derive(Debug, Clone, FromRow)]
pub struct ArticleDetailRow {
    #[sqlx(flatten)]
    pub article: ArticleRow,
    pub owner_name: String,
}

/// An article as returned by lookups and listings.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleView {
    #[serde(flatten)]
    pub article: Article,
    pub owner_name: String,
}

impl From<ArticleDetailRow> for ArticleView {
    fn from(row: ArticleDetailRow) -> Self {
        Self {
            article: row.article.into(),
            owner_name: row.owner_name,
        }
    }
}

/// DTO for creating an article.
///
/// Owner, version and grades are server-assigned; any such keys in the
/// request body are ignored.
#[derive(Debug, Deserialize)]
pub struct CreateArticle {
    pub topic_id: Option<DbId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl CreateArticle {
    /// Split into the topic reference and the initial content.
    pub fn into_parts(self) -> (Option<DbId>, ArticleContent) {
        (
            self.topic_id,
            ArticleContent {
                title: self.title,
                body: self.body,
                fields: self.fields,
            },
        )
    }
}

/// DTO for submitting a grade.
#[derive(Debug, Deserialize)]
pub struct CreateGrade {
    #[serde(default)]
    pub score: Value,
}

/// Query params for listing articles.
#[derive(Debug, Deserialize)]
pub struct ListArticlesParams {
    /// Only the caller's own articles.
    #[serde(default)]
    pub mine: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

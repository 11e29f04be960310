//! Revision rows, views and the revision diff response.

use quill_core::article::{ArticleContent, DocumentState, Revision};
use quill_core::diff::DiffLine;
use quill_core::grading::Grade;
use quill_core::types::{DbId, Timestamp, VersionNumber};
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `article_revisions` table.
#[derive(Debug, Clone, FromRow)]
pub struct RevisionRow {
    pub id: DbId,
    pub article_id: DbId,
    pub owner_id: DbId,
    pub topic_id: DbId,
    pub version: VersionNumber,
    pub title: String,
    pub body: String,
    pub fields: Json<Map<String, Value>>,
    pub grades: Json<Vec<Grade>>,
    pub updated_at: Timestamp,
    pub created_at: Timestamp,
}

impl From<RevisionRow> for Revision {
    fn from(row: RevisionRow) -> Self {
        Revision {
            id: row.id,
            article_id: row.article_id,
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

/// A revision row joined with its owner's display name.
#[derive(Debug, Clone, FromRow)]
pub struct RevisionDetailRow {
    #[sqlx(flatten)]
    pub revision: RevisionRow,
    pub owner_name: String,
}

/// A revision as returned by lookups.
#[derive(Debug, Clone, Serialize)]
pub struct RevisionView {
    #[serde(flatten)]
    pub revision: Revision,
    pub owner_name: String,
}

impl From<RevisionDetailRow> for RevisionView {
    fn from(row: RevisionDetailRow) -> Self {
        Self {
            revision: row.revision.into(),
            owner_name: row.owner_name,
        }
    }
}

/// Body diff between a revision and the live article.
#[derive(Debug, Serialize)]
pub struct RevisionDiff {
    pub article_id: DbId,
    pub revision_id: DbId,
    pub revision_version: VersionNumber,
    pub current_version: VersionNumber,
    pub lines: Vec<DiffLine>,
}

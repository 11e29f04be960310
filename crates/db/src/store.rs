//! PostgreSQL implementation of the core store traits.
//!
//! Thin adapter: each method delegates to a repository and wraps
//! `sqlx::Error` in [`StoreError`].

use quill_core::article::{Article, NewArticle, NewRevision, Revision};
use quill_core::grading::Grade;
use quill_core::store::{DocumentStore, GradeAppend, HistoryStore, ReservationStore, StoreError};
use quill_core::types::{DbId, VersionNumber};
use quill_core::versioning::{SnapshotPolicy, VersionController};

use crate::repositories::{ArticleRepo, ReservationRepo, RevisionRepo};
use crate::DbPool;

/// Store backed by a connection pool. Cloning shares the pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Version controller wired to PostgreSQL for all three stores.
pub type PgVersionController = VersionController<PgStore, PgStore, PgStore>;

/// Build a [`PgVersionController`] sharing one pool.
pub fn version_controller(pool: DbPool, policy: SnapshotPolicy) -> PgVersionController {
    let store = PgStore::new(pool);
    VersionController::new(store.clone(), store.clone(), store, policy)
}

impl DocumentStore for PgStore {
    async fn insert(&self, new: &NewArticle) -> Result<Article, StoreError> {
        ArticleRepo::create(&self.pool, new)
            .await
            .map_err(StoreError::backend)
    }

    async fn find(&self, id: DbId) -> Result<Option<Article>, StoreError> {
        ArticleRepo::find_by_id(&self.pool, id)
            .await
            .map_err(StoreError::backend)
    }

    async fn commit(
        &self,
        next: &Article,
        expected_version: VersionNumber,
        clear_grades: bool,
    ) -> Result<Option<Article>, StoreError> {
        ArticleRepo::commit(&self.pool, next, expected_version, clear_grades)
            .await
            .map_err(StoreError::backend)
    }

    async fn append_grade(&self, article_id: DbId, grade: &Grade) -> Result<GradeAppend, StoreError> {
        let appended = ArticleRepo::append_grade(&self.pool, article_id, grade)
            .await
            .map_err(StoreError::backend)?;
        if let Some(article) = appended {
            return Ok(GradeAppend::Appended(article));
        }
        // The guarded UPDATE matched nothing: either the row is gone or the
        // reviewer is already in the array.
        let exists = ArticleRepo::exists(&self.pool, article_id)
            .await
            .map_err(StoreError::backend)?;
        tracing::debug!(
            article_id,
            reviewer_id = grade.reviewer_id,
            article_exists = exists,
            "Guarded grade append matched no row"
        );
        Ok(if exists {
            GradeAppend::Duplicate
        } else {
            GradeAppend::Missing
        })
    }
}

impl HistoryStore for PgStore {
    async fn archive(&self, revision: &NewRevision) -> Result<Revision, StoreError> {
        RevisionRepo::create(&self.pool, revision)
            .await
            .map_err(StoreError::backend)
    }

    async fn discard(&self, revision_id: DbId) -> Result<bool, StoreError> {
        RevisionRepo::delete(&self.pool, revision_id)
            .await
            .map_err(StoreError::backend)
    }

    async fn list_for_article(&self, article_id: DbId) -> Result<Vec<Revision>, StoreError> {
        RevisionRepo::list_by_article(&self.pool, article_id)
            .await
            .map_err(StoreError::backend)
    }
}

impl ReservationStore for PgStore {
    async fn mark_submitted(&self, topic_id: DbId, user_id: DbId) -> Result<bool, StoreError> {
        ReservationRepo::mark_submitted(&self.pool, topic_id, user_id)
            .await
            .map_err(StoreError::backend)
    }
}

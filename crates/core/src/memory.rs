//! In-memory implementation of the store traits.
//!
//! Backs the engine tests and any embedding that does not need PostgreSQL.
//! All state sits behind one `tokio::sync::RwLock`, which makes every trait
//! method atomic with respect to the others.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::article::{Article, DocumentState, NewArticle, NewRevision, Revision, INITIAL_VERSION};
use crate::grading::{find_grade, Grade};
use crate::store::{
    DocumentStore, GradeAppend, HistoryStore, ReservationStatus, ReservationStore, StoreError,
};
use crate::types::{DbId, VersionNumber};

#[derive(Debug, Default)]
struct MemoryState {
    articles: BTreeMap<DbId, Article>,
    revisions: BTreeMap<DbId, Revision>,
    reservations: HashMap<(DbId, DbId), ReservationStatus>,
    last_article_id: DbId,
    last_revision_id: DbId,
}

/// Shared in-memory store. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give `user_id` a reservation on `topic_id`.
    pub async fn reserve(&self, topic_id: DbId, user_id: DbId) {
        self.state
            .write()
            .await
            .reservations
            .insert((topic_id, user_id), ReservationStatus::Reserved);
    }

    pub async fn reservation(&self, topic_id: DbId, user_id: DbId) -> Option<ReservationStatus> {
        self.state
            .read()
            .await
            .reservations
            .get(&(topic_id, user_id))
            .copied()
    }

    /// Hard-delete an article. Its revisions stay behind.
    pub async fn remove_article(&self, id: DbId) -> bool {
        self.state.write().await.articles.remove(&id).is_some()
    }

    pub async fn article_count(&self) -> usize {
        self.state.read().await.articles.len()
    }

    pub async fn revision_count(&self) -> usize {
        self.state.read().await.revisions.len()
    }

    pub async fn find_revision(&self, id: DbId) -> Option<Revision> {
        self.state.read().await.revisions.get(&id).cloned()
    }
}

impl DocumentStore for InMemoryStore {
    async fn insert(&self, new: &NewArticle) -> Result<Article, StoreError> {
        let mut state = self.state.write().await;
        state.last_article_id += 1;
        let now = Utc::now();
        let article = Article {
            id: state.last_article_id,
            state: DocumentState {
                owner_id: new.owner_id,
                topic_id: new.topic_id,
                version: INITIAL_VERSION,
                content: new.content.clone(),
                grades: Vec::new(),
                updated_at: now,
            },
            created_at: now,
        };
        state.articles.insert(article.id, article.clone());
        Ok(article)
    }

    async fn find(&self, id: DbId) -> Result<Option<Article>, StoreError> {
        Ok(self.state.read().await.articles.get(&id).cloned())
    }

    async fn commit(
        &self,
        next: &Article,
        expected_version: VersionNumber,
        clear_grades: bool,
    ) -> Result<Option<Article>, StoreError> {
        let mut state = self.state.write().await;
        let Some(stored) = state.articles.get_mut(&next.id) else {
            return Ok(None);
        };
        if stored.state.version != expected_version {
            return Ok(None);
        }

        stored.state.version = next.state.version;
        stored.state.content = next.state.content.clone();
        if clear_grades {
            stored.state.grades.clear();
        }
        stored.state.updated_at = Utc::now();
        Ok(Some(stored.clone()))
    }

    async fn append_grade(&self, article_id: DbId, grade: &Grade) -> Result<GradeAppend, StoreError> {
        let mut state = self.state.write().await;
        let Some(stored) = state.articles.get_mut(&article_id) else {
            return Ok(GradeAppend::Missing);
        };
        if find_grade(&stored.state.grades, grade.reviewer_id).is_some() {
            return Ok(GradeAppend::Duplicate);
        }
        stored.state.grades.push(grade.clone());
        stored.state.updated_at = Utc::now();
        Ok(GradeAppend::Appended(stored.clone()))
    }
}

impl HistoryStore for InMemoryStore {
    async fn archive(&self, revision: &NewRevision) -> Result<Revision, StoreError> {
        let mut state = self.state.write().await;
        state.last_revision_id += 1;
        let archived = Revision {
            id: state.last_revision_id,
            article_id: revision.article_id,
            state: revision.state.clone(),
            created_at: Utc::now(),
        };
        state.revisions.insert(archived.id, archived.clone());
        Ok(archived)
    }

    async fn discard(&self, revision_id: DbId) -> Result<bool, StoreError> {
        Ok(self.state.write().await.revisions.remove(&revision_id).is_some())
    }

    async fn list_for_article(&self, article_id: DbId) -> Result<Vec<Revision>, StoreError> {
        let state = self.state.read().await;
        let mut revisions: Vec<Revision> = state
            .revisions
            .values()
            .filter(|r| r.article_id == article_id)
            .cloned()
            .collect();
        revisions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(revisions)
    }
}

impl ReservationStore for InMemoryStore {
    async fn mark_submitted(&self, topic_id: DbId, user_id: DbId) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        match state.reservations.get_mut(&(topic_id, user_id)) {
            Some(status) => {
                *status = ReservationStatus::Submitted;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

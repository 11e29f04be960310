//! Storage seams used by the version controller.
//!
//! The PostgreSQL repositories and the in-memory store both implement these
//! traits. Methods return `impl Future + Send` so implementations can be
//! plain `async fn`s and handlers stay `Send`.

use std::future::Future;

use crate::article::{Article, NewArticle, NewRevision, Revision};
use crate::grading::Grade;
use crate::types::{DbId, VersionNumber};

/// A failure inside a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage backend failure: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wrap a backend-native error.
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(err))
    }
}

/// Outcome of an atomic check-and-append of a grade.
#[derive(Debug, Clone, PartialEq)]
pub enum GradeAppend {
    /// The grade was stored; carries the updated article.
    Appended(Article),
    /// The reviewer had already graded the article. Nothing changed.
    Duplicate,
    /// No article with that id exists.
    Missing,
}

/// Status of a user's reservation on a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStatus {
    Reserved,
    Submitted,
}

impl ReservationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reserved => "reserved",
            Self::Submitted => "submitted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "reserved" => Some(Self::Reserved),
            "submitted" => Some(Self::Submitted),
            _ => None,
        }
    }
}

/// Current state of every article.
pub trait DocumentStore: Send + Sync {
    /// Insert a new article at [`crate::article::INITIAL_VERSION`] with no grades.
    fn insert(&self, new: &NewArticle)
        -> impl Future<Output = Result<Article, StoreError>> + Send;

    fn find(&self, id: DbId) -> impl Future<Output = Result<Option<Article>, StoreError>> + Send;

    /// Persist the content and version of `next`, provided the stored version
    /// still equals `expected_version`.
    ///
    /// Grades are never written from `next`: they are emptied in place when
    /// `clear_grades` is set and left as stored otherwise. Returns `None` when
    /// the article is gone or its version has moved on.
    fn commit(
        &self,
        next: &Article,
        expected_version: VersionNumber,
        clear_grades: bool,
    ) -> impl Future<Output = Result<Option<Article>, StoreError>> + Send;

    /// Append `grade` unless its reviewer already graded the article. The
    /// check and the append happen as one atomic step.
    fn append_grade(
        &self,
        article_id: DbId,
        grade: &Grade,
    ) -> impl Future<Output = Result<GradeAppend, StoreError>> + Send;
}

/// Append-only archive of article snapshots.
pub trait HistoryStore: Send + Sync {
    fn archive(
        &self,
        revision: &NewRevision,
    ) -> impl Future<Output = Result<Revision, StoreError>> + Send;

    /// Remove a revision whose mutation never landed. Returns `false` if it
    /// was already gone.
    fn discard(&self, revision_id: DbId) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Revisions of one article, newest archival first.
    fn list_for_article(
        &self,
        article_id: DbId,
    ) -> impl Future<Output = Result<Vec<Revision>, StoreError>> + Send;
}

/// Topic reservations touched as a side effect of article creation.
pub trait ReservationStore: Send + Sync {
    /// Mark `user_id`'s reservation on `topic_id` as submitted. Returns
    /// `false` when the user holds no reservation on the topic.
    fn mark_submitted(
        &self,
        topic_id: DbId,
        user_id: DbId,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reservation_status_round_trips_through_text() {
        for status in [ReservationStatus::Reserved, ReservationStatus::Submitted] {
            assert_eq!(ReservationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ReservationStatus::parse("cancelled"), None);
    }

    #[test]
    fn backend_error_keeps_source_message() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err = StoreError::backend(io);
        assert_eq!(err.to_string(), "Storage backend failure: disk full");
    }
}

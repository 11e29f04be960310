//! The version controller: snapshot-then-mutate updates, grading and restore.
//!
//! Every accepted content change goes through [`VersionController::mutate`]:
//!
//! 1. merge the sanitized patch, advance `version` by one, clear or keep
//!    grades, and validate the merged content,
//! 2. archive the current state as a [`Revision`],
//! 3. commit, conditioned on the version that was archived.
//!
//! If the commit does not land, the revision written in step 2 is discarded
//! again so history only holds states that were actually replaced.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::article::{
    apply_patch, Article, ArticleContent, ArticlePatch, NewArticle, NewRevision, Revision,
};
use crate::error::CoreError;
use crate::grading::{duplicate_review, ensure_not_graded, validate_score, Grade, Reviewer};
use crate::store::{DocumentStore, GradeAppend, HistoryStore, ReservationStore, StoreError};
use crate::types::DbId;

/// What to do when archiving the pre-mutation snapshot fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapshotPolicy {
    /// Abort the mutation and report the failure.
    #[default]
    FailClosed,
    /// Log the failure and mutate anyway, leaving a gap in history.
    BestEffort,
}

impl SnapshotPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FailClosed => "fail_closed",
            Self::BestEffort => "best_effort",
        }
    }
}

impl fmt::Display for SnapshotPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SnapshotPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail_closed" => Ok(Self::FailClosed),
            "best_effort" => Ok(Self::BestEffort),
            other => Err(CoreError::Validation(format!(
                "Invalid snapshot policy '{other}'. Must be one of: fail_closed, best_effort"
            ))),
        }
    }
}

/// Errors surfaced by the version controller.
#[derive(Debug, thiserror::Error)]
pub enum VersioningError {
    /// Validation, not-found, conflict and authorization failures.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The pre-mutation snapshot could not be archived; nothing was changed.
    #[error("Failed to archive a revision of article {article_id}: {source}")]
    Snapshot {
        article_id: DbId,
        #[source]
        source: StoreError,
    },

    /// Any other storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Orchestrates article writes over a document store, a history store and a
/// reservation store.
#[derive(Debug, Clone)]
pub struct VersionController<D, H, R> {
    documents: D,
    history: H,
    reservations: R,
    policy: SnapshotPolicy,
}

impl<D, H, R> VersionController<D, H, R>
where
    D: DocumentStore,
    H: HistoryStore,
    R: ReservationStore,
{
    pub fn new(documents: D, history: H, reservations: R, policy: SnapshotPolicy) -> Self {
        Self {
            documents,
            history,
            reservations,
            policy,
        }
    }

    pub fn policy(&self) -> SnapshotPolicy {
        self.policy
    }

    pub fn documents(&self) -> &D {
        &self.documents
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    /// Create an article owned by `acting_user` under `topic_id`.
    ///
    /// A missing topic is a validation error. On success the user's
    /// reservation on the topic is marked submitted; failing to do so is
    /// logged and never fails the create.
    pub async fn create(
        &self,
        content: ArticleContent,
        topic_id: Option<DbId>,
        acting_user: DbId,
    ) -> Result<Article, VersioningError> {
        let topic_id = topic_id
            .ok_or_else(|| CoreError::Validation("A topic is required to submit an article".into()))?;
        content.validate()?;

        let article = self
            .documents
            .insert(&NewArticle {
                owner_id: acting_user,
                topic_id,
                content,
            })
            .await?;

        match self.reservations.mark_submitted(topic_id, acting_user).await {
            Ok(true) => tracing::debug!(topic_id, user_id = acting_user, "Reservation marked submitted"),
            Ok(false) => tracing::debug!(topic_id, user_id = acting_user, "No reservation to mark submitted"),
            Err(err) => tracing::warn!(
                topic_id,
                user_id = acting_user,
                error = %err,
                "Failed to mark reservation submitted"
            ),
        }

        tracing::info!(
            article_id = article.id,
            topic_id,
            user_id = acting_user,
            "Article created"
        );
        Ok(article)
    }

    /// A normal content edit: snapshot, merge, bump version, clear grades.
    pub async fn update(
        &self,
        current: &Article,
        patch: &ArticlePatch,
    ) -> Result<Article, VersioningError> {
        self.mutate(current, patch, true).await
    }

    /// Snapshot `current`, apply `patch`, advance the version and persist.
    pub async fn mutate(
        &self,
        current: &Article,
        patch: &ArticlePatch,
        clear_grades: bool,
    ) -> Result<Article, VersioningError> {
        // Limits apply to the merged content, not to the patch alone.
        let next = apply_patch(current, patch, clear_grades);
        next.state.content.validate()?;

        let archived = match self.history.archive(&NewRevision::capture(current)).await {
            Ok(revision) => Some(revision),
            Err(source) => match self.policy {
                SnapshotPolicy::FailClosed => {
                    tracing::error!(
                        article_id = current.id,
                        error = %source,
                        "Snapshot failed, mutation aborted"
                    );
                    return Err(VersioningError::Snapshot {
                        article_id: current.id,
                        source,
                    });
                }
                SnapshotPolicy::BestEffort => {
                    tracing::error!(
                        article_id = current.id,
                        error = %source,
                        "Snapshot failed, mutating without a revision"
                    );
                    None
                }
            },
        };

        let committed = self
            .documents
            .commit(&next, current.state.version, clear_grades)
            .await;

        match committed {
            Ok(Some(saved)) => {
                tracing::info!(
                    article_id = saved.id,
                    version = saved.state.version,
                    revision_id = archived.as_ref().map(|r| r.id),
                    grades_cleared = clear_grades,
                    "Article mutated"
                );
                Ok(saved)
            }
            Ok(None) => {
                self.discard_orphan(archived.as_ref()).await;
                Err(CoreError::Conflict(format!(
                    "Article {} was modified or removed since version {}",
                    current.id, current.state.version
                ))
                .into())
            }
            Err(err) => {
                self.discard_orphan(archived.as_ref()).await;
                Err(err.into())
            }
        }
    }

    /// Record `reviewer`'s score on `article`.
    ///
    /// No snapshot, no version bump. A reviewer may grade an article once.
    pub async fn add_grade(
        &self,
        article: &Article,
        reviewer: &Reviewer,
        score: Value,
    ) -> Result<Article, VersioningError> {
        validate_score(&score)?;
        ensure_not_graded(&article.state.grades, reviewer.user_id)?;

        let grade = Grade::new(reviewer, score);
        match self.documents.append_grade(article.id, &grade).await? {
            GradeAppend::Appended(updated) => {
                tracing::info!(
                    article_id = updated.id,
                    reviewer_id = reviewer.user_id,
                    grade_count = updated.state.grades.len(),
                    "Grade added"
                );
                Ok(updated)
            }
            GradeAppend::Duplicate => Err(duplicate_review(reviewer.user_id).into()),
            GradeAppend::Missing => Err(CoreError::NotFound {
                entity: "article",
                id: article.id,
            }
            .into()),
        }
    }

    /// Reinstate the content archived in `revision` as a new mutation.
    ///
    /// Grades are kept, the replaced state is archived, and the version still
    /// advances.
    pub async fn restore(&self, revision: &Revision) -> Result<Article, VersioningError> {
        let current = self
            .documents
            .find(revision.article_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "article",
                id: revision.article_id,
            })?;

        let restored = self
            .mutate(&current, &ArticlePatch::from_revision(revision), false)
            .await?;
        tracing::info!(
            article_id = restored.id,
            revision_id = revision.id,
            restored_version = revision.state.version,
            "Article restored from revision"
        );
        Ok(restored)
    }

    async fn discard_orphan(&self, revision: Option<&Revision>) {
        let Some(revision) = revision else {
            return;
        };
        match self.history.discard(revision.id).await {
            Ok(_) => tracing::debug!(
                article_id = revision.article_id,
                revision_id = revision.id,
                "Discarded revision of failed mutation"
            ),
            Err(err) => tracing::error!(
                article_id = revision.article_id,
                revision_id = revision.id,
                error = %err,
                "Failed to discard revision of failed mutation"
            ),
        }
    }
}

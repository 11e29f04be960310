//! Handlers for archived revisions: lookup, restore and diff.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use quill_core::access::authorize;
use quill_core::article::Revision;
use quill_core::diff::line_diff;
use quill_core::error::CoreError;
use quill_core::types::DbId;
use quill_db::models::revision::RevisionDiff;
use quill_db::repositories::RevisionRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::article::ensure_article;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Fetch a revision by id or return 404.
async fn ensure_revision(pool: &sqlx::PgPool, id: DbId) -> AppResult<Revision> {
    RevisionRepo::find_by_id(pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "revision",
            id,
        })
    })
}

/// GET /revisions/{id}
pub async fn get_revision(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let revision = RevisionRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "revision",
            id,
        })?;
    Ok(Json(DataResponse { data: revision }))
}

/// POST /revisions/{id}/restore
///
/// Reinstate the revision's content on its article. Gated on the revision's
/// owner. Grades on the live article are kept.
pub async fn restore_revision(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let revision = ensure_revision(&state.pool, id).await?;
    authorize(&revision, auth.user_id)?;

    let restored = state.versioning.restore(&revision).await?;

    tracing::info!(
        user_id = auth.user_id,
        article_id = restored.id,
        revision_id = id,
        version = restored.state.version,
        "Revision restored"
    );

    Ok(Json(DataResponse { data: restored }))
}

/// GET /revisions/{id}/diff
///
/// Line diff from the revision's body to the live article's body.
pub async fn diff_revision(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let revision = ensure_revision(&state.pool, id).await?;
    let article = ensure_article(&state.pool, revision.article_id).await?;

    let diff = RevisionDiff {
        article_id: article.id,
        revision_id: revision.id,
        revision_version: revision.state.version,
        current_version: article.state.version,
        lines: line_diff(&revision.state.content.body, &article.state.content.body),
    };

    Ok(Json(DataResponse { data: diff }))
}

//! Handlers for articles: CRUD, grading and revision history.
//!
//! Writes go through the version controller in `AppState`; reads hit the
//! repositories directly.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use quill_core::access::authorize;
use quill_core::article::{Article, ArticlePatch};
use quill_core::error::CoreError;
use quill_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use quill_core::types::DbId;
use quill_db::models::article::{CreateArticle, CreateGrade, ListArticlesParams};
use quill_db::repositories::{ArticleRepo, RevisionRepo, TopicRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
Helpers
-------------------------------------------------------------------------- */

/// Fetch an article by id or return 404.
pub(crate) async fn ensure_article(pool: &sqlx::PgPool, id: DbId) -> AppResult<Article> {
    ArticleRepo::find_by_id(pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "article",
            id,
        })
    })
}

/* --------------------------------------------------------------------------
Article CRUD
-------------------------------------------------------------------------- */

/// GET /articles
///
/// List articles newest first. `mine=true` restricts to the caller's own.
pub async fn list_articles(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListArticlesParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);
    let owner = params.mine.then_some(auth.user_id);

    let articles = ArticleRepo::list(&state.pool, owner, limit, offset).await?;
    Ok(Json(DataResponse { data: articles }))
}

/// POST /articles
///
/// Create an article owned by the caller under an existing topic.
pub async fn create_article(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateArticle>,
) -> AppResult<impl IntoResponse> {
    let (topic_id, content) = input.into_parts();

    if let Some(topic_id) = topic_id {
        TopicRepo::find_by_id(&state.pool, topic_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "topic",
                id: topic_id,
            })?;
    }

    let article = state
        .versioning
        .create(content, topic_id, auth.user_id)
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: article })))
}

/// GET /articles/{id}
pub async fn get_article(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let article = ArticleRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "article",
            id,
        })?;
    Ok(Json(DataResponse { data: article }))
}

/// PUT /articles/{id}
///
/// Owner-only content edit. Archives the current state, bumps the version
/// and clears existing grades.
pub async fn update_article(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(patch): Json<ArticlePatch>,
) -> AppResult<impl IntoResponse> {
    let article = ensure_article(&state.pool, id).await?;
    authorize(&article, auth.user_id)?;

    let updated = state.versioning.update(&article, &patch).await?;

    tracing::info!(
        user_id = auth.user_id,
        article_id = updated.id,
        version = updated.state.version,
        "Article updated"
    );

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /articles/{id}
///
/// Owner-only hard delete. Revisions are kept.
pub async fn delete_article(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let article = ensure_article(&state.pool, id).await?;
    authorize(&article, auth.user_id)?;

    if !ArticleRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "article",
            id,
        }));
    }

    tracing::info!(user_id = auth.user_id, article_id = id, "Article deleted");

    Ok(StatusCode::NO_CONTENT)
}

/* --------------------------------------------------------------------------
Grades
-------------------------------------------------------------------------- */

/// POST /articles/{id}/grades
///
/// Record the caller's grade. Any authenticated user may grade, once per
/// article. The reviewer name is taken from the users table now.
pub async fn add_grade(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateGrade>,
) -> AppResult<impl IntoResponse> {
    let article = ensure_article(&state.pool, id).await?;
    let reviewer = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "user",
            id: auth.user_id,
        })?
        .as_reviewer();

    let graded = state
        .versioning
        .add_grade(&article, &reviewer, input.score)
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: graded })))
}

/* --------------------------------------------------------------------------
History
-------------------------------------------------------------------------- */

/// GET /articles/{id}/revisions
///
/// Archived states of the article, most recent first. Works for deleted
/// articles too, since their revisions remain.
pub async fn list_revisions(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let revisions = RevisionRepo::list_by_article(&state.pool, id).await?;
    Ok(Json(DataResponse { data: revisions }))
}

pub mod article;
pub mod health;
pub mod revision;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /articles                          list, create
/// /articles/{id}                     get, update, delete
/// /articles/{id}/grades              add grade
/// /articles/{id}/revisions           revision history
///
/// /revisions/{id}                    get
/// /revisions/{id}/restore            restore onto the live article
/// /revisions/{id}/diff               body diff against the live article
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/articles", article::router())
        .nest("/revisions", revision::router())
}

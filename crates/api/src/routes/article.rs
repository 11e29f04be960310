//! Route definitions for articles, registered under `/articles`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::article;
use crate::state::AppState;

/// Article routes.
///
/// ```text
/// GET    /                   list_articles
/// POST   /                   create_article
/// GET    /{id}               get_article
/// PUT    /{id}               update_article
/// DELETE /{id}               delete_article
/// POST   /{id}/grades        add_grade
/// GET    /{id}/revisions     list_revisions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(article::list_articles).post(article::create_article))
        .route(
            "/{id}",
            get(article::get_article)
                .put(article::update_article)
                .delete(article::delete_article),
        )
        .route("/{id}/grades", post(article::add_grade))
        .route("/{id}/revisions", get(article::list_revisions))
}

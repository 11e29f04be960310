//! Route definitions for archived revisions, registered under `/revisions`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::revision;
use crate::state::AppState;

/// Revision routes.
///
/// ```text
/// GET    /{id}               get_revision
/// POST   /{id}/restore       restore_revision
/// GET    /{id}/diff          diff_revision
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(revision::get_revision))
        .route("/{id}/restore", post(revision::restore_revision))
        .route("/{id}/diff", get(revision::diff_revision))
}

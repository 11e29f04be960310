use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use quill_core::error::CoreError;
use quill_core::versioning::VersioningError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and [`VersioningError`] for domain failures and
/// `sqlx::Error` for direct repository reads. Implements [`IntoResponse`] to produce consistent
/// `{ "error", "code" }` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `quill_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failure reported by the version controller.
    #[error(transparent)]
    Versioning(#[from] VersioningError),

    /// A database error from sqlx on a direct repository call.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),

            AppError::Versioning(err) => match err {
                VersioningError::Core(core) => classify_core_error(core),
                VersioningError::Snapshot { article_id, source } => {
                    tracing::error!(article_id, error = %source, "Revision snapshot failed");
                    (
                        StatusCode::BAD_REQUEST,
                        "SNAPSHOT_FAILED",
                        format!(
                            "Could not archive the current state of article {article_id}; \
                             no changes were made"
                        ),
                    )
                }
                VersioningError::Store(source) => {
                    tracing::error!(error = %source, "Store error");
                    internal()
                }
            },

            AppError::Database(err) => classify_sqlx_error(err),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;
    use quill_core::store::StoreError;

    use super::*;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn store_error() -> StoreError {
        StoreError::backend(std::io::Error::new(
            std::io::ErrorKind::Other,
            "connection reset",
        ))
    }

    #[tokio::test]
    async fn validation_is_400() {
        let (status, body) = render(CoreError::Validation("bad title".into()).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"], "bad title");
    }

    #[tokio::test]
    async fn not_found_names_entity() {
        let err = CoreError::NotFound {
            entity: "revision",
            id: 9,
        };
        let (status, body) = render(err.into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "revision with id 9 not found");
    }

    #[tokio::test]
    async fn versioning_core_errors_map_like_core() {
        let err = VersioningError::Core(CoreError::Conflict("stale".into()));
        let (status, body) = render(err.into()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CONFLICT");

        let err = VersioningError::Core(CoreError::Forbidden("not yours".into()));
        let (status, _) = render(err.into()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn snapshot_failure_is_400_without_backend_detail() {
        let err = VersioningError::Snapshot {
            article_id: 3,
            source: store_error(),
        };
        let (status, body) = render(err.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "SNAPSHOT_FAILED");
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("article 3"));
        assert!(!message.contains("connection reset"));
    }

    #[tokio::test]
    async fn store_failure_is_sanitized_500() {
        let (status, body) = render(VersioningError::Store(store_error()).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "INTERNAL_ERROR");
        assert_eq!(body["error"], "An internal error occurred");
    }

    #[tokio::test]
    async fn row_not_found_is_404() {
        let (status, _) = render(sqlx::Error::RowNotFound.into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unauthorized_is_401() {
        let (status, body) = render(CoreError::Unauthorized("no token".into()).into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }
}

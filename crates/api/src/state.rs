use std::sync::Arc;

use quill_db::store::PgVersionController;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool and everything else sit behind `Arc`s.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, used directly by read paths.
    pub pool: quill_db::DbPool,
    /// Server configuration (JWT settings are read by the auth extractor).
    pub config: Arc<ServerConfig>,
    /// Version controller for every write to articles and their history.
    pub versioning: Arc<PgVersionController>,
}

impl AppState {
    /// Wire the state around one pool, using the configured snapshot policy.
    pub fn new(pool: quill_db::DbPool, config: ServerConfig) -> Self {
        let versioning = quill_db::store::version_controller(pool.clone(), config.snapshot_policy);
        Self {
            pool,
            config: Arc::new(config),
            versioning: Arc::new(versioning),
        }
    }
}

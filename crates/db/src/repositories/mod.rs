//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod article_repo;
pub mod reservation_repo;
pub mod revision_repo;
pub mod topic_repo;
pub mod user_repo;

pub use article_repo::ArticleRepo;
pub use reservation_repo::ReservationRepo;
pub use revision_repo::RevisionRepo;
pub use topic_repo::TopicRepo;
pub use user_repo::UserRepo;

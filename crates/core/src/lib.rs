//! Domain core for the quill article service.
//!
//! Holds the article/revision data model, the merge and grading rules, the
//! authorization gate, and the [`versioning::VersionController`] that drives
//! snapshot-then-mutate updates over the store traits in [`store`].
//!
//! This crate has zero internal dependencies so it can back both the
//! PostgreSQL repositories and the in-memory store in [`memory`].

pub mod access;
pub mod article;
pub mod diff;
pub mod error;
pub mod grading;
pub mod memory;
pub mod pagination;
pub mod store;
pub mod types;
pub mod versioning;

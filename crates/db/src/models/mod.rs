//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - `FromRow` row structs matching the table, converted into core types
//! - `Serialize` views returned by the API
//! - `Deserialize` create DTOs

pub mod article;
pub mod revision;
pub mod topic;
pub mod user;

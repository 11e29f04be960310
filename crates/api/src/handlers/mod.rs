pub mod article;
pub mod revision;

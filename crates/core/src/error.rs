use crate::types::DbId;

/// Domain error shared by every layer.
///
/// The API maps each variant to a distinct HTTP status, so callers pick the
/// variant by what went wrong for the client, not by where it happened.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_entity_and_id() {
        let err = CoreError::NotFound {
            entity: "article",
            id: 7,
        };
        assert_eq!(err.to_string(), "Entity not found: article with id 7");
    }

    #[test]
    fn validation_message_is_prefixed() {
        let err = CoreError::Validation("topic is required".into());
        assert_eq!(err.to_string(), "Validation failed: topic is required");
    }
}

//! Review grades: one score per reviewer per article.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::types::DbId;

/// A single reviewer's score entry on an article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    pub reviewer_id: DbId,
    /// Display name captured when the grade was submitted.
    pub reviewer_name: String,
    pub score: Value,
}

/// The user submitting a grade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reviewer {
    pub user_id: DbId,
    pub display_name: String,
}

impl Grade {
    pub fn new(reviewer: &Reviewer, score: Value) -> Self {
        Self {
            reviewer_id: reviewer.user_id,
            reviewer_name: reviewer.display_name.clone(),
            score,
        }
    }
}

/// Validate a score payload: a number, or a structured object/array.
pub fn validate_score(score: &Value) -> Result<(), CoreError> {
    match score {
        Value::Number(_) => Ok(()),
        Value::Object(map) if !map.is_empty() => Ok(()),
        Value::Array(items) if !items.is_empty() => Ok(()),
        Value::Object(_) | Value::Array(_) => Err(CoreError::Validation(
            "Score must not be empty".into(),
        )),
        _ => Err(CoreError::Validation(
            "Score must be a number, an object or an array".into(),
        )),
    }
}

/// Find the grade left by `reviewer_id`, if any.
pub fn find_grade(grades: &[Grade], reviewer_id: DbId) -> Option<&Grade> {
    grades.iter().find(|g| g.reviewer_id == reviewer_id)
}

/// Reject a second grade from the same reviewer.
pub fn ensure_not_graded(grades: &[Grade], reviewer_id: DbId) -> Result<(), CoreError> {
    match find_grade(grades, reviewer_id) {
        Some(_) => Err(duplicate_review(reviewer_id)),
        None => Ok(()),
    }
}

/// The validation error reported for a repeated review.
pub fn duplicate_review(reviewer_id: DbId) -> CoreError {
    CoreError::Validation(format!(
        "Duplicate review: user {reviewer_id} has already graded this article"
    ))
}

//! Article and revision model plus the patch/merge rules.
//!
//! A live [`Article`] and an archived [`Revision`] embed the same
//! [`DocumentState`], so their serialized forms differ only by `id`,
//! `created_at` and the revision's `article_id` back-reference. Restoring a
//! revision never depends on field names differing between the two.
//!
//! Client input reaches the engine only as an [`ArticlePatch`], which has no
//! slot for identity, ownership, topic, version or grades. Anything else a
//! client sends is dropped during deserialization.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::grading::Grade;
use crate::types::{DbId, Timestamp, VersionNumber};

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Version assigned to a freshly created article.
pub const INITIAL_VERSION: VersionNumber = 1;

/// Maximum title length in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum body length in characters.
pub const MAX_BODY_LENGTH: usize = 100_000;

/// Maximum number of author-defined fields on one article.
pub const MAX_CUSTOM_FIELDS: usize = 50;

/// Maximum length of an author-defined field name.
pub const MAX_FIELD_KEY_LENGTH: usize = 64;

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// Author-editable content of an article.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleContent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    /// Arbitrary author-defined fields, merged key by key on update.
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl ArticleContent {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_title(&self.title)?;
        validate_body(&self.body)?;
        validate_fields(&self.fields)
    }
}

/// Everything an article carries apart from its identity and creation time.
///
/// This is exactly what a revision archives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentState {
    pub owner_id: DbId,
    pub topic_id: DbId,
    pub version: VersionNumber,
    #[serde(flatten)]
    pub content: ArticleContent,
    pub grades: Vec<Grade>,
    pub updated_at: Timestamp,
}

/// The live, current state of a submitted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: DbId,
    #[serde(flatten)]
    pub state: DocumentState,
    pub created_at: Timestamp,
}

/// An immutable snapshot of an article taken just before a mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revision {
    pub id: DbId,
    /// The article this snapshot was taken from. May dangle once the article
    /// has been deleted.
    pub article_id: DbId,
    #[serde(flatten)]
    pub state: DocumentState,
    /// Archival time, not the article's creation time.
    pub created_at: Timestamp,
}

/// Input for inserting a new article. The store assigns id, version and
/// timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewArticle {
    pub owner_id: DbId,
    pub topic_id: DbId,
    pub content: ArticleContent,
}

/// A snapshot that has not been archived yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRevision {
    pub article_id: DbId,
    pub state: DocumentState,
}

impl NewRevision {
    /// Capture the full current state of `article`, dropping its identity and
    /// creation time.
    pub fn capture(article: &Article) -> Self {
        Self {
            article_id: article.id,
            state: article.state.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Patch
// ---------------------------------------------------------------------------

/// A partial content update.
///
/// Deserializing ignores unknown keys, so protected fields in client input
/// (`id`, `version`, `owner_id`, `topic_id`, `grades`, ...) are discarded
/// silently.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ArticlePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(skip)]
    replace_fields: bool,
}

impl ArticlePatch {
    /// A client-style patch: `fields` entries merge key by key into the
    /// current map.
    pub fn new(title: Option<String>, body: Option<String>, fields: Map<String, Value>) -> Self {
        Self {
            title,
            body,
            fields,
            replace_fields: false,
        }
    }

    /// Build a patch that reinstates the archived content of `revision`.
    ///
    /// Unlike a client patch, the custom field map replaces the current one
    /// wholesale so the result matches the revision exactly.
    pub fn from_revision(revision: &Revision) -> Self {
        let content = &revision.state.content;
        Self {
            title: Some(content.title.clone()),
            body: Some(content.body.clone()),
            fields: content.fields.clone(),
            replace_fields: true,
        }
    }

    /// Whether the custom field map replaces rather than merges.
    pub fn replaces_fields(&self) -> bool {
        self.replace_fields
    }
}

/// Compute the next state of `current` after applying `patch`.
///
/// The version advances by exactly one. Identity, owner, topic and creation
/// time are carried over from `current`. Grades are emptied when
/// `clear_grades` is set and kept otherwise. `updated_at` is left for the
/// store to stamp.
pub fn apply_patch(current: &Article, patch: &ArticlePatch, clear_grades: bool) -> Article {
    let mut next = current.clone();
    let content = &mut next.state.content;

    if let Some(title) = &patch.title {
        content.title.clone_from(title);
    }
    if let Some(body) = &patch.body {
        content.body.clone_from(body);
    }
    if patch.replace_fields {
        content.fields = patch.fields.clone();
    } else {
        for (key, value) in &patch.fields {
            content.fields.insert(key.clone(), value.clone());
        }
    }

    next.state.version = current.state.version + 1;
    if clear_grades {
        next.state.grades.clear();
    }
    next
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate an article title (at most 200 characters; may be empty for drafts).
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate an article body (at most 100 000 characters).
pub fn validate_body(body: &str) -> Result<(), CoreError> {
    if body.chars().count() > MAX_BODY_LENGTH {
        return Err(CoreError::Validation(format!(
            "Body must be at most {MAX_BODY_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate the author-defined field map (count and key shape).
pub fn validate_fields(fields: &Map<String, Value>) -> Result<(), CoreError> {
    if fields.len() > MAX_CUSTOM_FIELDS {
        return Err(CoreError::Validation(format!(
            "A maximum of {MAX_CUSTOM_FIELDS} custom fields is allowed"
        )));
    }
    for key in fields.keys() {
        if key.trim().is_empty() {
            return Err(CoreError::Validation(
                "Custom field names must not be empty".into(),
            ));
        }
        if key.chars().count() > MAX_FIELD_KEY_LENGTH {
            return Err(CoreError::Validation(format!(
                "Custom field name '{key}' exceeds {MAX_FIELD_KEY_LENGTH} characters"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

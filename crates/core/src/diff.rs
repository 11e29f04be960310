//! Line-level diff between two article bodies.

use std::time::Duration;

use serde::Serialize;
use similar::{Algorithm, ChangeTag, TextDiff};

/// How a line changed between the old and the new text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineChange {
    Added,
    Removed,
    Unchanged,
}

/// One line of a diff result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffLine {
    pub change: LineChange,
    pub content: String,
}

impl DiffLine {
    fn new(change: LineChange, content: &str) -> Self {
        Self {
            change,
            content: content.to_string(),
        }
    }
}

/// Upper bound on the time spent searching for a minimal diff. Past it the
/// remaining region is reported as a plain removal plus addition.
const DIFF_TIMEOUT: Duration = Duration::from_secs(1);

/// Diff `old` against `new` line by line. Lines come out in reading order,
/// removals before additions within a changed block.
///
/// Uses Myers' algorithm in linear space, so memory stays proportional to
/// the input even for bodies at the length limit.
pub fn line_diff(old: &str, new: &str) -> Vec<DiffLine> {
    let old: Vec<&str> = old.lines().collect();
    let new: Vec<&str> = new.lines().collect();

    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .timeout(DIFF_TIMEOUT)
        .diff_slices(&old, &new);

    diff.iter_all_changes()
        .map(|change| {
            let kind = match change.tag() {
                ChangeTag::Equal => LineChange::Unchanged,
                ChangeTag::Delete => LineChange::Removed,
                ChangeTag::Insert => LineChange::Added,
            };
            DiffLine::new(kind, change.value())
        })
        .collect()
}

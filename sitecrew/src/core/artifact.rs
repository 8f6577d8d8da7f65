//! Artifacts extracted from model output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A piece of generated content destined for one output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedArtifact {
    /// The fence label it was extracted under (e.g. "html").
    pub label: String,
    /// The trimmed body of the fenced region.
    pub content: String,
}

impl ExtractedArtifact {
    /// Creates a new artifact.
    #[must_use]
    pub fn new(label: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            content: content.into(),
        }
    }

    /// Converts an extraction map into artifacts, ordered by label.
    #[must_use]
    pub fn from_map(map: BTreeMap<String, String>) -> Vec<Self> {
        map.into_iter()
            .map(|(label, content)| Self { label, content })
            .collect()
    }

    /// Returns the content size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns true if the content is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

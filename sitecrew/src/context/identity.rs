//! Run identity for tracking pipeline executions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunIdentity {
    /// The unique id of this run.
    pub pipeline_run_id: Uuid,
    /// The name of the pipeline being run.
    pub pipeline_name: String,
}

impl RunIdentity {
    /// Creates a new run identity with a generated run id.
    #[must_use]
    pub fn new(pipeline_name: impl Into<String>) -> Self {
        Self {
            pipeline_run_id: Uuid::new_v4(),
            pipeline_name: pipeline_name.into(),
        }
    }

    /// Creates a run identity with a specific run id.
    #[must_use]
    pub fn with_run_id(pipeline_name: impl Into<String>, pipeline_run_id: Uuid) -> Self {
        Self {
            pipeline_run_id,
            pipeline_name: pipeline_name.into(),
        }
    }

    /// Returns the run id as a string.
    #[must_use]
    pub fn run_id_str(&self) -> String {
        self.pipeline_run_id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_identity_new() {
        let a = RunIdentity::new("website");
        let b = RunIdentity::new("website");
        assert_eq!(a.pipeline_name, "website");
        assert_ne!(a.pipeline_run_id, b.pipeline_run_id);
    }

    #[test]
    fn test_run_identity_with_run_id() {
        let id = Uuid::new_v4();
        let identity = RunIdentity::with_run_id("research", id);
        assert_eq!(identity.run_id_str(), id.to_string());
    }
}

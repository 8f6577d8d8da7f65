//! Stage result type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The text produced by one stage execution.
///
/// A result is created exactly once per stage in a run and never changes
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageResult {
    /// The id of the stage that produced this result.
    pub stage_id: String,
    /// Name of the role the stage ran as.
    pub role_name: String,
    /// The generated text, verbatim.
    pub text: String,
    /// When the stage started.
    pub started_at: DateTime<Utc>,
    /// When the stage ended.
    pub ended_at: DateTime<Utc>,
    /// Number of model calls it took (1 when no retry happened).
    pub attempts: usize,
}

impl StageResult {
    /// Creates a completed stage result ending now.
    #[must_use]
    pub fn completed(
        stage_id: impl Into<String>,
        role_name: impl Into<String>,
        text: impl Into<String>,
        started_at: DateTime<Utc>,
        attempts: usize,
    ) -> Self {
        Self {
            stage_id: stage_id.into(),
            role_name: role_name.into(),
            text: text.into(),
            started_at,
            ended_at: Utc::now(),
            attempts,
        }
    }

    /// Returns the duration in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        (self.ended_at - self.started_at).num_milliseconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_result_completed() {
        let started = Utc::now();
        let result = StageResult::completed("planning", "Senior Project Manager", "plan", started, 1);

        assert_eq!(result.stage_id, "planning");
        assert_eq!(result.text, "plan");
        assert_eq!(result.attempts, 1);
        assert!(result.ended_at >= result.started_at);
    }

    #[test]
    fn test_stage_result_duration() {
        let started = Utc::now();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let result = StageResult::completed("qa", "QA Engineer", "ok", started, 1);

        assert!(result.duration_ms() >= 10);
    }
}

//! Test assertions for pipeline runs.

use crate::errors::SitecrewError;
use crate::pipeline::PipelineRun;

/// Asserts that `prompt` contains `needle`.
pub fn assert_prompt_contains(prompt: &str, needle: &str) {
    assert!(
        prompt.contains(needle),
        "Expected prompt to contain {needle:?}, got:\n{prompt}"
    );
}

/// Asserts that the run produced results for exactly `ids`, in order.
pub fn assert_stage_order(run: &PipelineRun, ids: &[&str]) {
    let actual: Vec<&str> = run.results().iter().map(|r| r.stage_id.as_str()).collect();
    assert_eq!(actual, ids, "Unexpected stage order");
}

/// Asserts that the error is a pipeline failure at `stage_id`.
pub fn assert_failed_at(err: &SitecrewError, stage_id: &str) {
    assert_eq!(
        err.failed_stage(),
        Some(stage_id),
        "Expected failure at stage '{stage_id}', got: {err}"
    );
}

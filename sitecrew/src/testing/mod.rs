//! Testing utilities for sitecrew pipelines.
//!
//! This module provides:
//! - A scripted, in-process model client
//! - Small pipeline fixtures
//! - Assertions for runs and prompts

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{assert_failed_at, assert_prompt_contains, assert_stage_order};
pub use fixtures::{chain_pipeline, sample_transcript, test_role, test_stage};
pub use mocks::ScriptedModelClient;

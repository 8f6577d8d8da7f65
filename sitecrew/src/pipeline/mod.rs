//! Pipeline building and execution.
//!
//! This module provides:
//! - A validating pipeline builder
//! - Dependency graph checks
//! - The sequential runner and its write-once result store
//! - Retry with backoff for model calls

mod builder;
mod dag;
mod retry;
mod runner;
mod store;

pub use builder::{Pipeline, PipelineBuilder};
pub use dag::StageGraph;
pub use retry::{
    should_retry, with_retry, Attempted, BackoffStrategy, JitterStrategy, RetryConfig,
    RetryDecision, RetryState, RetryableError,
};
pub use runner::{PipelineRun, PipelineRunner};
pub use store::ResultStore;

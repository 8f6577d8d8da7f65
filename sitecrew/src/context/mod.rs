//! Per-run context.
//!
//! This module provides:
//! - The identity of a pipeline run, used to correlate logs and events
//! - The read-only view of prior outputs handed to each stage

mod identity;
mod inputs;

pub use identity::RunIdentity;
pub use inputs::StageInputs;

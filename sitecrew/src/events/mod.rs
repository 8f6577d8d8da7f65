//! Pipeline lifecycle events.
//!
//! The runner reports progress through an [`EventSink`]. Events are plain
//! `(type, json)` pairs so sinks can forward them anywhere.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

/// A run started.
pub const PIPELINE_STARTED: &str = "pipeline.started";
/// Every stage finished.
pub const PIPELINE_COMPLETED: &str = "pipeline.completed";
/// A stage failed and the run was aborted.
pub const PIPELINE_FAILED: &str = "pipeline.failed";
/// The run was cancelled.
pub const PIPELINE_CANCELLED: &str = "pipeline.cancelled";
/// A stage is about to call the model.
pub const STAGE_STARTED: &str = "stage.started";
/// A stage produced its result.
pub const STAGE_COMPLETED: &str = "stage.completed";
/// A stage gave up.
pub const STAGE_FAILED: &str = "stage.failed";

//! # Sitecrew
//!
//! Multi-stage prompt pipelines that turn a natural-language request into
//! a generated website.
//!
//! Sitecrew provides:
//!
//! - **Stage pipelines**: role-framed prompts whose outputs feed later stages
//! - **Fence extraction**: pulling labelled code blocks out of model output
//! - **Project materialization**: writing artifacts and docs to disk
//! - **Ready-made crews**: an eight-role website crew and a research crew
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sitecrew::prelude::*;
//!
//! let crew = crews::website()?;
//! let runner = PipelineRunner::new(Arc::new(GeminiClient::new(config)?));
//! let run = runner.run(crew.pipeline(), "A landing page for a bakery").await?;
//!
//! let artifacts = crew.extract_artifacts(&run);
//! Materializer::default().materialize("bakery", &artifacts, &crew.project_report(&run))?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cancellation;
pub mod config;
pub mod context;
pub mod core;
pub mod crews;
pub mod errors;
pub mod events;
pub mod extract;
pub mod materialize;
pub mod model;
pub mod observability;
pub mod pipeline;
pub mod stages;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cancellation::CancellationToken;
    pub use crate::config::SitecrewConfig;
    pub use crate::core::{ExtractedArtifact, Role, StageResult};
    pub use crate::crews::{self, Crew};
    pub use crate::errors::{
        ContractErrorInfo, CycleDetectedError, ModelError, OutputConflictError,
        PipelineValidationError, SitecrewError, UndeclaredDependencyError,
    };
    pub use crate::events::{EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::extract::extract;
    pub use crate::materialize::{MaterializedProject, Materializer, ProjectReport};
    pub use crate::model::{GeminiClient, GeminiConfig, GenerationParams, ModelClient};
    pub use crate::pipeline::{Pipeline, PipelineBuilder, PipelineRun, PipelineRunner, RetryConfig};
    pub use crate::stages::Stage;
}

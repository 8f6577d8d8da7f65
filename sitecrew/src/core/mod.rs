//! Core domain types for sitecrew.
//!
//! This module contains the values that flow through a pipeline run:
//! - Role descriptors that frame each stage's prompt
//! - Stage results produced by the runner
//! - Artifacts pulled out of the model's output

mod artifact;
mod result;
mod role;

pub use artifact::ExtractedArtifact;
pub use result::StageResult;
pub use role::Role;

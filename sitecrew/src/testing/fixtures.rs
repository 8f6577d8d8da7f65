//! Test fixtures for pipeline testing.

use std::sync::Arc;

use crate::core::Role;
use crate::errors::SitecrewError;
use crate::pipeline::{Pipeline, PipelineBuilder};
use crate::stages::Stage;

/// Creates a role named `name` with a short objective and persona.
#[must_use]
pub fn test_role(name: &str) -> Arc<Role> {
    Arc::new(Role::new(
        name,
        format!("do the work of the {name}"),
        format!("You are a dependable {name}."),
    ))
}

/// Creates a stage whose prompt is `Task <id>: <request>`.
#[must_use]
pub fn test_stage(id: &str) -> Stage {
    Stage::new(id, test_role(&format!("{id} agent")), format!("Task {id}: {{{{request}}}}"))
}

/// Builds a pipeline where every stage depends on the one before it.
///
/// # Errors
///
/// Returns an error if `ids` is empty or contains duplicates.
pub fn chain_pipeline(ids: &[&str]) -> Result<Pipeline, SitecrewError> {
    let mut builder = PipelineBuilder::new("chain").with_default_request("default request");
    let mut previous: Option<&str> = None;
    for id in ids {
        let mut stage = test_stage(id);
        if let Some(prev) = previous {
            stage = stage.with_dependency(prev);
        }
        builder.add_stage(stage)?;
        previous = Some(id);
    }
    builder.build()
}

/// A transcript in the shape the website crew produces: an early draft
/// followed by the developer's final code.
#[must_use]
pub fn sample_transcript() -> String {
    [
        "## Architecture\nDraft markup:\n```html\n<p>draft</p>\n```",
        "## Development\n```html\n<!DOCTYPE html>\n<html><body><h1>Acme</h1></body></html>\n```\n\n\
         ```css\nbody { margin: 0; }\n```\n\n```javascript\nconsole.log('ready');\n```",
        "## QA\nAll checks passed.",
    ]
    .join("\n\n")
}

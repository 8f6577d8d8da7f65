//! Stage definitions.
//!
//! A stage is one prompt/response step: a role, a prompt template, the
//! stages whose output it reads, and a description of what the model is
//! expected to produce.

mod template;

pub use template::PromptTemplate;

use crate::context::StageInputs;
use crate::core::Role;
use crate::errors::{ContractErrorInfo, PipelineValidationError, SitecrewError};
use std::sync::Arc;

/// Heading for the section listing dependency outputs not placed by the template.
pub const CONTEXT_HEADING: &str = "This is the context you're working with:";

/// Heading for the expected-output hint.
pub const EXPECTED_OUTPUT_HEADING: &str = "This is the expected criteria for your final answer:";

/// A single step in a pipeline.
#[derive(Debug, Clone)]
pub struct Stage {
    /// Unique id within the pipeline.
    pub id: String,
    /// The persona the model answers as.
    pub role: Arc<Role>,
    /// The prompt template.
    pub template: PromptTemplate,
    /// Ids of earlier stages whose output this stage reads, in order.
    pub depends_on: Vec<String>,
    /// What the model should produce; passed along as a hint.
    pub expected_output: String,
}

impl Stage {
    /// Creates a stage with no dependencies.
    #[must_use]
    pub fn new(id: impl Into<String>, role: Arc<Role>, template: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role,
            template: PromptTemplate::parse(template),
            depends_on: Vec::new(),
            expected_output: String::new(),
        }
    }

    /// Adds a dependency. Repeated ids are ignored.
    #[must_use]
    pub fn with_dependency(mut self, dep: impl Into<String>) -> Self {
        let dep = dep.into();
        if !self.depends_on.contains(&dep) {
            self.depends_on.push(dep);
        }
        self
    }

    /// Adds several dependencies, keeping their order.
    #[must_use]
    pub fn with_dependencies(self, deps: impl IntoIterator<Item = impl Into<String>>) -> Self {
        deps.into_iter().fold(self, |stage, dep| stage.with_dependency(dep))
    }

    /// Sets the expected output description.
    #[must_use]
    pub fn with_expected_output(mut self, expected: impl Into<String>) -> Self {
        self.expected_output = expected.into();
        self
    }

    /// Validates the stage on its own, without looking at the rest of the pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is blank, the stage depends on itself, or
    /// the template references an output that is not a declared dependency.
    pub fn validate(&self) -> Result<(), PipelineValidationError> {
        if self.id.trim().is_empty() {
            return Err(PipelineValidationError::new("Stage id cannot be empty")
                .with_error_info(
                    ContractErrorInfo::new("STAGE-EMPTY-ID", "Stage id is blank")
                        .with_fix_hint("Give every stage a short, unique identifier."),
                ));
        }

        if self.depends_on.contains(&self.id) {
            return Err(PipelineValidationError::new(format!(
                "Stage '{}' cannot depend on itself",
                self.id
            ))
            .with_stages(vec![self.id.clone()])
            .with_error_info(ContractErrorInfo::new(
                "STAGE-SELF-DEP",
                format!("Stage '{}' lists itself as a dependency", self.id),
            )));
        }

        for referenced in self.template.referenced_outputs() {
            if !self.depends_on.iter().any(|d| d == referenced) {
                return Err(PipelineValidationError::new(format!(
                    "Stage '{}' references output of '{}' without depending on it",
                    self.id, referenced
                ))
                .with_stages(vec![self.id.clone(), referenced.to_string()])
                .with_error_info(
                    ContractErrorInfo::new(
                        "STAGE-UNDECLARED-REF",
                        format!("Placeholder {{{{output:{referenced}}}}} has no matching dependency"),
                    )
                    .with_fix_hint("Add the stage to depends_on or remove the placeholder."),
                ));
            }
        }

        Ok(())
    }

    /// Renders the full prompt sent to the model.
    ///
    /// The template is rendered first. Every dependency the template does not
    /// place explicitly is then appended verbatim under a context heading, in
    /// `depends_on` order. The expected output description closes the prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if a declared dependency has no output in `inputs`,
    /// or if the template reads an undeclared stage.
    pub fn render_prompt(&self, request: &str, inputs: &StageInputs) -> Result<String, SitecrewError> {
        let mut prompt = self.template.render(request, inputs)?;

        let placed = self.template.referenced_outputs();
        let mut context = String::new();
        for dep in self.depends_on.iter().filter(|d| !placed.contains(&d.as_str())) {
            let text = inputs.get(dep)?.ok_or_else(|| {
                PipelineValidationError::new(format!(
                    "Stage '{}' has no output from dependency '{}'",
                    self.id, dep
                ))
                .with_stages(vec![self.id.clone(), dep.clone()])
            })?;
            context.push_str("\n\n");
            context.push_str(text);
        }

        if !context.is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(CONTEXT_HEADING);
            prompt.push_str(&context);
        }

        if !self.expected_output.trim().is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(EXPECTED_OUTPUT_HEADING);
            prompt.push(' ');
            prompt.push_str(self.expected_output.trim());
        }

        Ok(prompt)
    }
}

//! Pipeline builder with validation.

use super::dag::StageGraph;
use crate::errors::{ContractErrorInfo, CycleDetectedError, PipelineValidationError, SitecrewError};
use crate::model::GenerationParams;
use crate::stages::Stage;
use std::collections::HashSet;

/// A validated, immutable sequence of stages.
///
/// Every dependency names a stage scheduled earlier, so running the stages
/// in order always has the inputs each one needs.
#[derive(Debug, Clone)]
pub struct Pipeline {
    name: String,
    default_request: Option<String>,
    params: GenerationParams,
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Returns the pipeline name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the stages in execution order.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Returns a stage by id.
    #[must_use]
    pub fn stage(&self, id: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.id == id)
    }

    /// Returns the stage ids in execution order.
    #[must_use]
    pub fn stage_ids(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.id.as_str()).collect()
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Always false; a built pipeline has at least one stage.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Returns the generation parameters used for every stage.
    #[must_use]
    pub fn params(&self) -> GenerationParams {
        self.params
    }

    /// Returns the request used when the caller supplies a blank one.
    #[must_use]
    pub fn default_request(&self) -> Option<&str> {
        self.default_request.as_deref()
    }

    /// Trims `request`, falling back to the default request when blank.
    ///
    /// # Errors
    ///
    /// Returns a validation error if both are blank.
    pub fn resolve_request(&self, request: &str) -> Result<String, PipelineValidationError> {
        let trimmed = request.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }

        match self.default_request.as_deref().map(str::trim) {
            Some(default) if !default.is_empty() => Ok(default.to_string()),
            _ => Err(PipelineValidationError::new(format!(
                "Pipeline '{}' received an empty request and has no default",
                self.name
            ))
            .with_error_info(
                ContractErrorInfo::new("PIPELINE-EMPTY-REQUEST", "Request is blank")
                    .with_fix_hint("Pass a request or give the pipeline a default request."),
            )),
        }
    }
}

/// Builder for creating validated pipelines.
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    name: String,
    default_request: Option<String>,
    params: GenerationParams,
    stages: Vec<Stage>,
    ids: HashSet<String>,
}

impl PipelineBuilder {
    /// Creates a new pipeline builder.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_request: None,
            params: GenerationParams::default(),
            stages: Vec::new(),
            ids: HashSet::new(),
        }
    }

    /// Sets the request used when the caller's request is blank.
    #[must_use]
    pub fn with_default_request(mut self, request: impl Into<String>) -> Self {
        self.default_request = Some(request.into());
        self
    }

    /// Sets the generation parameters.
    #[must_use]
    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    /// Adds a stage to the pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails (blank or duplicate id, missing
    /// dependency, undeclared template reference).
    pub fn stage(mut self, stage: Stage) -> Result<Self, PipelineValidationError> {
        self.add_stage(stage)?;
        Ok(self)
    }

    /// Adds a stage to the pipeline.
    ///
    /// A stage may only depend on stages added before it.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn add_stage(&mut self, stage: Stage) -> Result<(), PipelineValidationError> {
        stage.validate()?;

        if self.ids.contains(&stage.id) {
            return Err(PipelineValidationError::new(format!(
                "Stage '{}' is defined more than once",
                stage.id
            ))
            .with_stages(vec![stage.id.clone()])
            .with_error_info(
                ContractErrorInfo::new("PIPELINE-DUPLICATE", format!("Duplicate stage id '{}'", stage.id))
                    .with_fix_hint("Stage ids must be unique within a pipeline."),
            ));
        }

        for dep in &stage.depends_on {
            if !self.ids.contains(dep) {
                return Err(PipelineValidationError::new(format!(
                    "Stage '{}' depends on unknown stage '{}'",
                    stage.id, dep
                ))
                .with_stages(vec![stage.id.clone(), dep.clone()])
                .with_error_info(
                    ContractErrorInfo::new("PIPELINE-MISSING-DEP", format!("Dependency '{dep}' not found"))
                        .with_fix_hint("Ensure the dependency is added before the stage that depends on it."),
                ));
            }
        }

        self.ids.insert(stage.id.clone());
        self.stages.push(stage);
        Ok(())
    }

    /// Adds every stage in order.
    ///
    /// # Errors
    ///
    /// Returns the first validation error.
    pub fn stages(mut self, stages: impl IntoIterator<Item = Stage>) -> Result<Self, PipelineValidationError> {
        for stage in stages {
            self.add_stage(stage)?;
        }
        Ok(self)
    }

    /// Builds the pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the builder has no stages or the dependency
    /// graph is not a forward-only DAG.
    pub fn build(self) -> Result<Pipeline, SitecrewError> {
        if self.stages.is_empty() {
            return Err(PipelineValidationError::new(format!("Pipeline '{}' has no stages", self.name))
                .with_error_info(
                    ContractErrorInfo::new("PIPELINE-EMPTY", "Cannot build an empty pipeline")
                        .with_fix_hint("Add at least one stage to the pipeline before building."),
                )
                .into());
        }

        let graph = StageGraph::new(&self.stages);
        if let Some(cycle) = graph.find_cycle() {
            return Err(CycleDetectedError::new(cycle).into());
        }
        if let Some((stage, dep)) = graph.find_forward_reference() {
            return Err(PipelineValidationError::new(format!(
                "Stage '{stage}' depends on '{dep}', which is scheduled after it"
            ))
            .with_stages(vec![stage.to_string(), dep.to_string()])
            .with_error_info(ContractErrorInfo::new(
                "PIPELINE-MISSING-DEP",
                format!("Dependency '{dep}' is not scheduled before '{stage}'"),
            ))
            .into());
        }

        Ok(Pipeline {
            name: self.name,
            default_request: self.default_request,
            params: self.params,
            stages: self.stages,
        })
    }

    /// Returns the pipeline name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Role;
    use std::sync::Arc;

    fn stage(id: &str) -> Stage {
        let role = Arc::new(Role::new("Tester", "test", "You test."));
        Stage::new(id, role, format!("Do {id}"))
    }

    fn code(err: &PipelineValidationError) -> &str {
        err.code().unwrap_or_default()
    }

    #[test]
    fn test_builder_creation() {
        let builder = PipelineBuilder::new("test");
        assert_eq!(builder.name(), "test");
        assert_eq!(builder.stage_count(), 0);
    }

    #[test]
    fn test_builder_with_dependencies() {
        let pipeline = PipelineBuilder::new("test")
            .stage(stage("stage1"))
            .unwrap()
            .stage(stage("stage2").with_dependency("stage1"))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(pipeline.name(), "test");
        assert_eq!(pipeline.stage_ids(), vec!["stage1", "stage2"]);
        assert_eq!(pipeline.stage("stage2").unwrap().depends_on, vec!["stage1"]);
    }

    #[test]
    fn test_builder_missing_dependency() {
        let err = PipelineBuilder::new("test")
            .stage(stage("stage1").with_dependency("missing"))
            .unwrap_err();

        assert_eq!(code(&err), "PIPELINE-MISSING-DEP");
        assert_eq!(err.stages, vec!["stage1", "missing"]);
    }

    #[test]
    fn test_builder_dependency_added_later_is_missing() {
        let err = PipelineBuilder::new("test")
            .stage(stage("b").with_dependency("a"))
            .and_then(|b| b.stage(stage("a")))
            .unwrap_err();
        assert_eq!(code(&err), "PIPELINE-MISSING-DEP");
    }

    #[test]
    fn test_builder_duplicate_id() {
        let err = PipelineBuilder::new("test")
            .stage(stage("a"))
            .unwrap()
            .stage(stage("a"))
            .unwrap_err();
        assert_eq!(code(&err), "PIPELINE-DUPLICATE");
    }

    #[test]
    fn test_builder_self_dependency() {
        let err = PipelineBuilder::new("test")
            .stage(stage("a").with_dependency("a"))
            .unwrap_err();
        assert_eq!(code(&err), "STAGE-SELF-DEP");
    }

    #[test]
    fn test_builder_undeclared_template_reference() {
        let role = Arc::new(Role::new("Tester", "test", "You test."));
        let err = PipelineBuilder::new("test")
            .stage(stage("a"))
            .unwrap()
            .stage(Stage::new("b", role, "Review {{output:a}}"))
            .unwrap_err();
        assert_eq!(code(&err), "STAGE-UNDECLARED-REF");
    }

    #[test]
    fn test_builder_empty_build() {
        let err = PipelineBuilder::new("test").build().unwrap_err();
        match err {
            SitecrewError::Validation(e) => assert_eq!(code(&e), "PIPELINE-EMPTY"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_builder_cycle_detected_at_build() {
        // Pushed directly; add_stage would reject the forward reference first.
        let mut builder = PipelineBuilder::new("test");
        builder.stages.push(stage("a").with_dependency("b"));
        builder.stages.push(stage("b").with_dependency("a"));

        match builder.build().unwrap_err() {
            SitecrewError::CycleDetected(e) => assert_eq!(e.cycle_path, vec!["a", "b", "a"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_resolve_request() {
        let pipeline = PipelineBuilder::new("test")
            .with_default_request("default thing")
            .stage(stage("a"))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(pipeline.resolve_request("  custom  ").unwrap(), "custom");
        assert_eq!(pipeline.resolve_request("   ").unwrap(), "default thing");
    }

    #[test]
    fn test_resolve_request_without_default() {
        let pipeline = PipelineBuilder::new("test").stage(stage("a")).unwrap().build().unwrap();
        let err = pipeline.resolve_request("").unwrap_err();
        assert_eq!(code(&err), "PIPELINE-EMPTY-REQUEST");
    }

    #[test]
    fn test_stages_in_bulk() {
        let pipeline = PipelineBuilder::new("bulk")
            .with_params(GenerationParams::new(0.4, 1024))
            .stages([stage("a"), stage("b").with_dependency("a")])
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(pipeline.len(), 2);
        assert_eq!(pipeline.params().max_output_tokens, 1024);
    }
}

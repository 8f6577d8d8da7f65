//! Stage inputs with strict dependency enforcement.

use crate::errors::UndeclaredDependencyError;
use std::collections::HashMap;

/// An immutable view of prior stage outputs, as seen by one stage.
///
/// Only outputs of declared dependencies are readable; asking for any other
/// stage is an [`UndeclaredDependencyError`].
#[derive(Debug, Clone, Default)]
pub struct StageInputs {
    /// Output text of prior stages, keyed by stage id.
    outputs: HashMap<String, String>,
    /// Declared dependencies, in declaration order.
    declared_dependencies: Vec<String>,
    /// The id of the current stage (for error messages).
    stage_id: String,
}

impl StageInputs {
    /// Creates new stage inputs.
    #[must_use]
    pub fn new(
        outputs: HashMap<String, String>,
        declared_dependencies: Vec<String>,
        stage_id: impl Into<String>,
    ) -> Self {
        Self {
            outputs,
            declared_dependencies,
            stage_id: stage_id.into(),
        }
    }

    /// Gets the output text of a declared dependency.
    ///
    /// Returns `Ok(None)` when the dependency is declared but has not
    /// produced output.
    ///
    /// # Errors
    ///
    /// Returns `UndeclaredDependencyError` if `stage` is not a declared
    /// dependency.
    pub fn get(&self, stage: &str) -> Result<Option<&str>, UndeclaredDependencyError> {
        if !self.declared_dependencies.iter().any(|d| d == stage) {
            return Err(UndeclaredDependencyError::new(&self.stage_id, stage));
        }
        Ok(self.outputs.get(stage).map(String::as_str))
    }

    /// Checks if output exists for a stage.
    #[must_use]
    pub fn contains(&self, stage: &str) -> bool {
        self.outputs.contains_key(stage)
    }

    /// Returns the declared dependencies in declaration order.
    #[must_use]
    pub fn declared_dependencies(&self) -> &[String] {
        &self.declared_dependencies
    }

    /// Returns the id of the stage these inputs belong to.
    #[must_use]
    pub fn stage_id(&self) -> &str {
        &self.stage_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> StageInputs {
        let mut outputs = HashMap::new();
        outputs.insert("planning".to_string(), "the plan".to_string());
        outputs.insert("design".to_string(), "the design".to_string());
        StageInputs::new(outputs, vec!["planning".to_string()], "development")
    }

    #[test]
    fn test_get_declared_dependency() {
        let inputs = inputs();
        assert_eq!(inputs.get("planning").unwrap(), Some("the plan"));
    }

    #[test]
    fn test_get_undeclared_dependency_fails() {
        let inputs = inputs();
        let err = inputs.get("design").unwrap_err();
        assert_eq!(err.stage, "development");
        assert_eq!(err.key, "design");
    }

    #[test]
    fn test_declared_but_missing() {
        let inputs = StageInputs::new(HashMap::new(), vec!["planning".to_string()], "qa");
        assert_eq!(inputs.get("planning").unwrap(), None);
        assert!(!inputs.contains("planning"));
    }
}

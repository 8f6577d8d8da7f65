//! Ready-made crews.
//!
//! A crew is a pipeline plus what the caller needs to turn a finished run
//! into a project: the artifact labels to extract and the roster printed in
//! the project documentation.

mod research;
mod website;

pub use research::{research, DEFAULT_RESEARCH_TOPIC, RESEARCH_STAGE};
pub use website::{website, DEFAULT_WEBSITE_REQUEST, WEBSITE_ARTIFACT_LABELS};

use crate::core::ExtractedArtifact;
use crate::extract::extract;
use crate::materialize::{ProjectReport, RoleSummary};
use crate::pipeline::{Pipeline, PipelineRun};

/// A pipeline bundled with its extraction and documentation metadata.
#[derive(Debug, Clone)]
pub struct Crew {
    pipeline: Pipeline,
    artifact_labels: Vec<String>,
    roster: Vec<RoleSummary>,
}

impl Crew {
    /// Creates a crew with no artifact labels and an empty roster.
    #[must_use]
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            artifact_labels: Vec::new(),
            roster: Vec::new(),
        }
    }

    /// Sets the fence labels extracted from a finished run.
    #[must_use]
    pub fn with_artifact_labels(mut self, labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.artifact_labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the roster printed in the project documentation.
    #[must_use]
    pub fn with_roster(mut self, roster: Vec<RoleSummary>) -> Self {
        self.roster = roster;
        self
    }

    /// Returns the pipeline.
    #[must_use]
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Returns the artifact labels.
    #[must_use]
    pub fn artifact_labels(&self) -> &[String] {
        &self.artifact_labels
    }

    /// Returns the roster.
    #[must_use]
    pub fn roster(&self) -> &[RoleSummary] {
        &self.roster
    }

    /// Extracts this crew's artifacts from the aggregated text of a run.
    ///
    /// Labels with no well-formed fence are absent from the result.
    #[must_use]
    pub fn extract_artifacts(&self, run: &PipelineRun) -> Vec<ExtractedArtifact> {
        let found = extract(&run.aggregated_text(), &self.artifact_labels);
        self.artifact_labels
            .iter()
            .filter_map(|label| found.get(label).map(|content| ExtractedArtifact::new(label, content)))
            .collect()
    }

    /// Builds the documentation report for a run.
    #[must_use]
    pub fn project_report(&self, run: &PipelineRun) -> ProjectReport {
        ProjectReport::new(self.roster.clone(), run.aggregated_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PipelineRunner;
    use crate::testing::{chain_pipeline, ScriptedModelClient};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_extract_artifacts_keeps_label_order() {
        let client = Arc::new(ScriptedModelClient::with_responses([
            "```css\nbody {}\n```",
            "```html\n<p>x</p>\n```\n```javascript\nunterminated",
        ]));
        let crew = Crew::new(chain_pipeline(&["A", "B"]).unwrap())
            .with_artifact_labels(["html", "css", "javascript"])
            .with_roster(vec![RoleSummary::new("Tester", "Testing")]);

        let run = PipelineRunner::new(client).run(crew.pipeline(), "x").await.unwrap();
        let artifacts = crew.extract_artifacts(&run);

        assert_eq!(
            artifacts,
            vec![
                ExtractedArtifact::new("html", "<p>x</p>"),
                ExtractedArtifact::new("css", "body {}"),
            ]
        );

        let report = crew.project_report(&run);
        assert_eq!(report.roles.len(), 1);
        assert_eq!(report.development_log, run.aggregated_text());
    }
}

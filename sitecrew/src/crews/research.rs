//! The single-stage research crew.

use super::Crew;
use crate::core::Role;
use crate::errors::SitecrewError;
use crate::materialize::RoleSummary;
use crate::model::GenerationParams;
use crate::pipeline::PipelineBuilder;
use crate::stages::Stage;
use std::sync::Arc;

/// Id of the only research stage.
pub const RESEARCH_STAGE: &str = "research";

/// Topic used when the user gives none.
pub const DEFAULT_RESEARCH_TOPIC: &str = "Recent advances in artificial intelligence";

/// Builds the research crew: one researcher answering one topic.
///
/// A blank topic falls back to [`DEFAULT_RESEARCH_TOPIC`].
///
/// # Errors
///
/// Returns an error only if the stage definition is inconsistent.
pub fn research() -> Result<Crew, SitecrewError> {
    let researcher = Arc::new(Role::new(
        "Research Agent",
        "Conduct research on a given topic and provide a detailed report.",
        "You are a highly skilled researcher in Artificial Intelligence.",
    ));

    let stage = Stage::new(RESEARCH_STAGE, researcher, "Research the topic: '''{{request}}'''")
        .with_expected_output("Give a clear explanation of the given topic.");

    let pipeline = PipelineBuilder::new("research")
        .with_default_request(DEFAULT_RESEARCH_TOPIC)
        .with_params(GenerationParams::new(0.4, 2048))
        .stage(stage)?
        .build()?;

    Ok(Crew::new(pipeline).with_roster(vec![RoleSummary::new("Research Agent", "Topic research and reporting")]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PipelineRunner;
    use crate::testing::ScriptedModelClient;

    #[test]
    fn test_research_crew_shape() {
        let crew = research().unwrap();
        let pipeline = crew.pipeline();

        assert_eq!(pipeline.stage_ids(), vec![RESEARCH_STAGE]);
        assert_eq!(pipeline.default_request(), Some(DEFAULT_RESEARCH_TOPIC));
        assert_eq!(pipeline.params(), GenerationParams::new(0.4, 2048));
        assert!(crew.artifact_labels().is_empty());
    }

    #[tokio::test]
    async fn test_research_prompt_and_blank_topic() {
        let crew = research().unwrap();
        let client = Arc::new(ScriptedModelClient::new().with_fallback("REPORT"));
        let runner = PipelineRunner::new(client.clone());

        let run = runner.run(crew.pipeline(), "vector databases").await.unwrap();
        assert_eq!(run.final_text(), "REPORT");
        assert!(client.prompts()[0].starts_with("Research the topic: '''vector databases'''"));

        let run = runner.run(crew.pipeline(), "   ").await.unwrap();
        assert_eq!(run.request(), DEFAULT_RESEARCH_TOPIC);
        assert_eq!(client.call_count(), 2);
        assert!(client.prompts()[1].starts_with(&format!("Research the topic: '''{DEFAULT_RESEARCH_TOPIC}'''")));
    }
}

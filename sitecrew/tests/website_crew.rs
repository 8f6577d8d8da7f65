//! End-to-end runs of the ready-made crews against a scripted model.

use pretty_assertions::assert_eq;
use sitecrew::cancellation::CancellationToken;
use sitecrew::crews;
use sitecrew::errors::{ModelError, SitecrewError};
use sitecrew::materialize::Materializer;
use sitecrew::pipeline::{JitterStrategy, PipelineRunner, RetryConfig};
use sitecrew::testing::{assert_failed_at, assert_prompt_contains, ScriptedModelClient};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

const DEVELOPMENT_REPLY: &str = "Here is the site.\n\n\
```html\n<!DOCTYPE html>\n<html><body><h1>Bakery</h1></body></html>\n```\n\n\
```css\nh1 { color: brown; }\n```\n\n\
```javascript\ndocument.title = 'Bakery';\n```\n";

fn scripted_crew_client() -> ScriptedModelClient {
    ScriptedModelClient::new()
        .when_prompt_contains("Analyze this website requirement", "PLAN-NOTES")
        .when_prompt_contains("Create detailed business analysis", "BA-NOTES")
        .when_prompt_contains("Create a professional design system", "DESIGN-NOTES")
        .when_prompt_contains("Design frontend architecture", "ARCH-NOTES\n```html\n<p>draft</p>\n```")
        .when_prompt_contains("Create content strategy", "CONTENT-NOTES")
        .when_prompt_contains("Create SEO and performance", "SEO-NOTES")
        .when_prompt_contains("Implement the complete website", DEVELOPMENT_REPLY)
        .when_prompt_contains("Perform comprehensive quality assurance", "QA: all checks passed")
}

fn fast_retry() -> RetryConfig {
    RetryConfig::new().with_base_delay_ms(1).with_jitter(JitterStrategy::None)
}

#[tokio::test]
async fn test_website_crew_end_to_end() {
    let out = TempDir::new().unwrap();
    let client = Arc::new(scripted_crew_client());
    let crew = crews::website().unwrap();

    let run = PipelineRunner::new(client.clone())
        .with_retry_config(fast_retry())
        .run(crew.pipeline(), "A landing page for a bakery")
        .await
        .unwrap();

    assert_eq!(client.call_count(), 8);
    assert_eq!(run.final_text(), "QA: all checks passed");

    let development = client.prompt_containing("Implement the complete website").unwrap();
    for notes in ["PLAN-NOTES", "BA-NOTES", "DESIGN-NOTES", "ARCH-NOTES", "CONTENT-NOTES", "SEO-NOTES"] {
        assert_prompt_contains(&development, notes);
    }
    assert_prompt_contains(&development, "A landing page for a bakery");

    let analysis = client.prompt_containing("Create detailed business analysis").unwrap();
    assert_prompt_contains(&analysis, "PLAN-NOTES");
    let seo = client.prompt_containing("Create SEO and performance").unwrap();
    assert_prompt_contains(&seo, "CONTENT-NOTES");
    assert!(!seo.contains("PLAN-NOTES"));

    let qa = client.prompt_containing("Perform comprehensive quality assurance").unwrap();
    assert_prompt_contains(&qa, "document.title = 'Bakery';");
    assert!(!qa.contains("PLAN-NOTES"));

    let artifacts = crew.extract_artifacts(&run);
    let labels: Vec<&str> = artifacts.iter().map(|a| a.label.as_str()).collect();
    assert_eq!(labels, vec!["html", "css", "javascript"]);

    let project = Materializer::new(out.path())
        .materialize("bakery_site", &artifacts, &crew.project_report(&run))
        .unwrap();

    let dir = out.path().join("bakery_site");
    assert_eq!(project.dir, dir);
    assert_eq!(project.files.len(), 6);
    assert_eq!(
        fs::read_to_string(dir.join("index.html")).unwrap(),
        "<!DOCTYPE html>\n<html><body><h1>Bakery</h1></body></html>"
    );
    assert_eq!(fs::read_to_string(dir.join("styles.css")).unwrap(), "h1 { color: brown; }");
    assert_eq!(fs::read_to_string(dir.join("script.js")).unwrap(), "document.title = 'Bakery';");

    let doc = fs::read_to_string(dir.join("project_documentation.md")).unwrap();
    assert!(doc.starts_with("# Bakery Site - Project Documentation"));
    assert!(doc.contains("professional 8-agent development team"));
    assert!(doc.contains("8. **QA Engineer** - Quality assurance and testing"));
    assert!(doc.contains("QA: all checks passed"));

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join("package.json")).unwrap()).unwrap();
    assert_eq!(manifest["name"], "bakery-site");
}

#[tokio::test]
async fn test_blank_description_uses_default_request() {
    let client = Arc::new(scripted_crew_client());
    let crew = crews::website().unwrap();

    PipelineRunner::new(client.clone())
        .with_retry_config(fast_retry())
        .run(crew.pipeline(), "")
        .await
        .unwrap();

    let planning = client.prompt_containing("Analyze this website requirement").unwrap();
    assert_prompt_contains(&planning, crews::DEFAULT_WEBSITE_REQUEST);
}

#[tokio::test]
async fn test_failed_development_stage_stops_before_qa() {
    let client = Arc::new(
        scripted_crew_client().fail_on_call(7, ModelError::http(400, "request too large")),
    );
    let crew = crews::website().unwrap();

    let err = PipelineRunner::new(client.clone())
        .with_retry_config(fast_retry())
        .run(crew.pipeline(), "portfolio")
        .await
        .unwrap_err();

    assert_failed_at(&err, "development");
    assert_eq!(client.call_count(), 7);
    assert!(client.prompt_containing("Perform comprehensive quality assurance").is_none());
}

#[tokio::test]
async fn test_cancelled_run_produces_nothing() {
    let client = Arc::new(scripted_crew_client());
    let token = Arc::new(CancellationToken::new());
    token.cancel("interrupted by user");
    let crew = crews::website().unwrap();

    let err = PipelineRunner::new(client.clone())
        .with_cancellation(token)
        .run(crew.pipeline(), "portfolio")
        .await
        .unwrap_err();

    assert!(matches!(err, SitecrewError::Cancelled(_)));
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_research_crew_report() {
    let client = Arc::new(ScriptedModelClient::new().with_fallback("Transformers use attention."));
    let crew = crews::research().unwrap();

    let run = PipelineRunner::new(client.clone())
        .run(crew.pipeline(), "transformer models")
        .await
        .unwrap();

    assert_eq!(run.final_text(), "Transformers use attention.");
    let requests = client.requests();
    let request = &requests[0];
    assert!(request.system_instruction.starts_with("You are Research Agent."));
    assert!((request.params.temperature - 0.4).abs() < f32::EPSILON);
}

//! Sequential pipeline execution.

use super::retry::{with_retry, Attempted, RetryConfig};
use super::store::ResultStore;
use super::Pipeline;
use crate::cancellation::CancellationToken;
use crate::context::{RunIdentity, StageInputs};
use crate::core::StageResult;
use crate::errors::SitecrewError;
use crate::events::{self, EventSink, NoOpEventSink};
use crate::model::{GenerationRequest, ModelClient};
use crate::stages::Stage;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Separator placed between stage outputs in the aggregated text.
const AGGREGATE_SEPARATOR: &str = "\n\n";

/// The outcome of a successful run.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    identity: RunIdentity,
    request: String,
    results: Vec<StageResult>,
    duration_ms: f64,
}

impl PipelineRun {
    /// Returns the run id.
    #[must_use]
    pub fn run_id(&self) -> Uuid {
        self.identity.pipeline_run_id
    }

    /// Returns the pipeline name.
    #[must_use]
    pub fn pipeline_name(&self) -> &str {
        &self.identity.pipeline_name
    }

    /// Returns the request the run was executed with.
    #[must_use]
    pub fn request(&self) -> &str {
        &self.request
    }

    /// Returns the text of the last stage.
    #[must_use]
    pub fn final_text(&self) -> &str {
        self.results.last().map_or("", |r| r.text.as_str())
    }

    /// Joins every stage output in execution order.
    #[must_use]
    pub fn aggregated_text(&self) -> String {
        self.results
            .iter()
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>()
            .join(AGGREGATE_SEPARATOR)
    }

    /// Returns every stage result in execution order.
    #[must_use]
    pub fn results(&self) -> &[StageResult] {
        &self.results
    }

    /// Returns the result of one stage.
    #[must_use]
    pub fn result(&self, stage_id: &str) -> Option<&StageResult> {
        self.results.iter().find(|r| r.stage_id == stage_id)
    }

    /// Returns the wall-clock duration of the run in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }
}

/// Executes pipelines against a model client.
///
/// Stages run one at a time in pipeline order. The first stage that fails
/// aborts the run.
pub struct PipelineRunner {
    client: Arc<dyn ModelClient>,
    retry: RetryConfig,
    events: Arc<dyn EventSink>,
    cancellation: Arc<CancellationToken>,
}

impl std::fmt::Debug for PipelineRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineRunner")
            .field("retry", &self.retry)
            .field("cancellation", &self.cancellation)
            .finish_non_exhaustive()
    }
}

impl PipelineRunner {
    /// Creates a runner with default retry settings and no event sink.
    #[must_use]
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self {
            client,
            retry: RetryConfig::default(),
            events: Arc::new(NoOpEventSink),
            cancellation: Arc::new(CancellationToken::new()),
        }
    }

    /// Sets the retry policy for model calls.
    #[must_use]
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = sink;
        self
    }

    /// Uses a shared cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: Arc<CancellationToken>) -> Self {
        self.cancellation = token;
        self
    }

    /// Returns the cancellation token observed by this runner.
    #[must_use]
    pub fn cancellation_token(&self) -> Arc<CancellationToken> {
        Arc::clone(&self.cancellation)
    }

    /// Runs every stage of `pipeline` for `request`.
    ///
    /// A blank request is replaced by the pipeline's default request.
    ///
    /// # Errors
    ///
    /// * `PipelineFailure` naming the first stage whose model call failed
    /// * `Cancelled` if the token fires before or during a stage
    /// * validation errors if the request is blank with no default
    pub async fn run(&self, pipeline: &Pipeline, request: &str) -> Result<PipelineRun, SitecrewError> {
        let request = pipeline.resolve_request(request)?;
        let identity = RunIdentity::new(pipeline.name());
        let run_id = identity.run_id_str();
        let started = Instant::now();

        info!(
            run_id = %run_id,
            pipeline = pipeline.name(),
            stages = pipeline.len(),
            "Pipeline started"
        );
        self.events
            .emit(
                events::PIPELINE_STARTED,
                Some(json!({
                    "run_id": run_id,
                    "pipeline": pipeline.name(),
                    "stages": pipeline.stage_ids(),
                })),
            )
            .await;

        let store = ResultStore::new();
        for stage in pipeline.stages() {
            let outcome = if self.cancellation.is_cancelled() {
                Err(self.cancelled_error())
            } else {
                self.run_stage(&run_id, pipeline, stage, &request, &store).await
            };

            if let Err(err) = outcome.and_then(|result| store.insert(result).map_err(SitecrewError::from)) {
                self.report_abort(&run_id, stage, &err, started).await;
                return Err(err);
            }
        }

        let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
        info!(run_id = %run_id, duration_ms, "Pipeline completed");
        self.events
            .emit(
                events::PIPELINE_COMPLETED,
                Some(json!({"run_id": run_id, "duration_ms": duration_ms})),
            )
            .await;

        Ok(PipelineRun {
            identity,
            request,
            results: store.into_results(),
            duration_ms,
        })
    }

    async fn run_stage(
        &self,
        run_id: &str,
        pipeline: &Pipeline,
        stage: &Stage,
        request: &str,
        store: &ResultStore,
    ) -> Result<StageResult, SitecrewError> {
        let inputs = StageInputs::new(
            store.outputs_for(&stage.depends_on),
            stage.depends_on.clone(),
            &stage.id,
        );
        let prompt = stage.render_prompt(request, &inputs)?;
        let generation = GenerationRequest::new(stage.role.system_instruction(), prompt, pipeline.params());

        let started_at = Utc::now();
        let started = Instant::now();
        debug!(
            run_id,
            stage_id = %stage.id,
            role = %stage.role,
            prompt_chars = generation.prompt.len(),
            "Stage started"
        );
        self.events
            .emit(
                events::STAGE_STARTED,
                Some(json!({"run_id": run_id, "stage_id": stage.id, "role": stage.role.name})),
            )
            .await;

        let call = with_retry(&self.retry, &stage.id, || self.client.generate(&generation));
        let outcome = tokio::select! {
            biased;
            () = self.cancellation.cancelled() => return Err(self.cancelled_error()),
            outcome = call => outcome,
        };

        let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
        match outcome {
            Ok(Attempted { value, attempts }) => {
                info!(
                    run_id,
                    stage_id = %stage.id,
                    attempts,
                    duration_ms,
                    output_chars = value.text.len(),
                    "Stage completed"
                );
                self.events
                    .emit(
                        events::STAGE_COMPLETED,
                        Some(json!({
                            "run_id": run_id,
                            "stage_id": stage.id,
                            "attempts": attempts,
                            "duration_ms": duration_ms,
                            "output_tokens": value.output_tokens,
                        })),
                    )
                    .await;
                Ok(StageResult::completed(
                    &stage.id,
                    &stage.role.name,
                    value.text,
                    started_at,
                    attempts,
                ))
            }
            Err(Attempted { value, attempts }) => {
                error!(
                    run_id,
                    stage_id = %stage.id,
                    attempts,
                    error = %value,
                    "Stage failed"
                );
                self.events
                    .emit(
                        events::STAGE_FAILED,
                        Some(json!({
                            "run_id": run_id,
                            "stage_id": stage.id,
                            "attempts": attempts,
                            "error": value.to_string(),
                            "retryable": value.is_retryable(),
                        })),
                    )
                    .await;
                Err(SitecrewError::PipelineFailure {
                    stage_id: stage.id.clone(),
                    source: value,
                })
            }
        }
    }

    async fn report_abort(&self, run_id: &str, stage: &Stage, err: &SitecrewError, started: Instant) {
        let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
        if let SitecrewError::Cancelled(reason) = err {
            warn!(run_id, stage_id = %stage.id, reason = %reason, "Pipeline cancelled");
            self.events
                .emit(
                    events::PIPELINE_CANCELLED,
                    Some(json!({
                        "run_id": run_id,
                        "stage_id": stage.id,
                        "reason": reason,
                        "duration_ms": duration_ms,
                    })),
                )
                .await;
        } else {
            error!(run_id, stage_id = %stage.id, error = %err, "Pipeline failed");
            self.events
                .emit(
                    events::PIPELINE_FAILED,
                    Some(json!({
                        "run_id": run_id,
                        "stage_id": stage.id,
                        "error": err.to_string(),
                        "duration_ms": duration_ms,
                    })),
                )
                .await;
        }
    }

    fn cancelled_error(&self) -> SitecrewError {
        SitecrewError::Cancelled(
            self.cancellation
                .reason()
                .unwrap_or_else(|| "cancellation requested".to_string()),
        )
    }
}

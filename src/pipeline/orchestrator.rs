use super::config::PipelineConfig;
use super::error::{PipelineError, ValidationError};
use super::merge::merge;
use super::request::IdeaRequest;
use super::result::{Complexity, GenerationResult};
use super::stage::Stage;
use crate::advisors::{
    AdvisorError, DomainAnalyzer, IdeaRefiner, LlmDomainAnalyzer, LlmIdeaRefiner,
    LlmProductGenerator, ProductBrief, ProductGenerator,
};
use crate::features::{detect, FeatureFlagSet};
use crate::llm::{BackendError, LLMClient};
use crate::procedural::{ProceduralGenerator, ProceduralInput, TemplateGenerator};
use crate::progress::{LoggingHandler, ProgressEvent, ProgressHandler};
use crate::stack::{choose, StackChoice};
use crate::tools::{ToolProfile, ToolProfileRegistry};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Turns an [`IdeaRequest`] into a [`GenerationResult`]
///
/// Only validation can fail a request. Every advisory collaborator is optional: a
/// failed, slow or malformed branch is logged and the procedural baseline stands in.
/// The worker pool bounding the domain and product branches is owned by the pipeline
/// and shared by every request it serves.
pub struct GenerationPipeline {
    refiner: Arc<dyn IdeaRefiner>,
    domain_analyzer: Arc<dyn DomainAnalyzer>,
    product_generator: Arc<dyn ProductGenerator>,
    procedural: Arc<dyn ProceduralGenerator>,
    registry: Arc<ToolProfileRegistry>,
    progress: Arc<dyn ProgressHandler>,
    permits: Arc<Semaphore>,
    config: PipelineConfig,
}

impl GenerationPipeline {
    pub fn new(
        refiner: Arc<dyn IdeaRefiner>,
        domain_analyzer: Arc<dyn DomainAnalyzer>,
        product_generator: Arc<dyn ProductGenerator>,
        config: PipelineConfig,
    ) -> Self {
        let permits = Arc::new(Semaphore::new(config.max_concurrency.max(1)));
        Self {
            refiner,
            domain_analyzer,
            product_generator,
            procedural: Arc::new(TemplateGenerator::new()),
            registry: Arc::new(ToolProfileRegistry::with_defaults()),
            progress: Arc::new(LoggingHandler),
            permits,
            config,
        }
    }

    /// Wires the LLM-backed advisors around a single client
    pub fn with_llm(client: Arc<dyn LLMClient>, config: PipelineConfig) -> Self {
        let refiner = LlmIdeaRefiner::new(Arc::clone(&client), config.refine_timeout)
            .with_min_len(config.min_refined_len);
        Self::new(
            Arc::new(refiner),
            Arc::new(LlmDomainAnalyzer::new(Arc::clone(&client))),
            Arc::new(LlmProductGenerator::new(client)),
            config,
        )
    }

    pub fn with_procedural(mut self, procedural: Arc<dyn ProceduralGenerator>) -> Self {
        self.procedural = procedural;
        self
    }

    pub fn with_registry(mut self, registry: Arc<ToolProfileRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressHandler>) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn registry(&self) -> &ToolProfileRegistry {
        &self.registry
    }

    /// Checks the trimmed idea length, in characters, and returns the trimmed idea
    pub fn validate<'r>(&self, request: &'r IdeaRequest) -> Result<&'r str, ValidationError> {
        let idea = request.trimmed_idea();
        let len = idea.chars().count();
        if len < self.config.min_idea_len {
            return Err(ValidationError::TooShort {
                len,
                min: self.config.min_idea_len,
            });
        }
        if len > self.config.max_idea_len {
            return Err(ValidationError::TooLong {
                len,
                max: self.config.max_idea_len,
            });
        }
        Ok(idea)
    }

    pub async fn generate(&self, request: &IdeaRequest) -> Result<GenerationResult, PipelineError> {
        let span = info_span!(
            "generate",
            request_id = %Uuid::new_v4(),
            mode = %request.mode,
            tool = request.tool.as_deref().unwrap_or("default")
        );
        self.run(request).instrument(span).await
    }

    async fn run(&self, request: &IdeaRequest) -> Result<GenerationResult, PipelineError> {
        let start = Instant::now();

        let stage_start = self.begin(Stage::Validating);
        let idea = match self.validate(request) {
            Ok(idea) => idea,
            Err(err) => {
                self.progress.on_progress(&ProgressEvent::Rejected {
                    reason: err.to_string(),
                });
                return Err(err.into());
            }
        };
        self.finish(Stage::Validating, stage_start);

        let stage_start = self.begin(Stage::Refining);
        let refined = match self
            .refiner
            .refine(idea, request.target_users.as_deref(), request.mode)
            .await
        {
            Ok(refined) => refined,
            Err(err) => {
                self.degraded("refine", &err);
                idea.to_string()
            }
        };
        self.finish(Stage::Refining, stage_start);

        let flags = detect(idea).union(&detect(&refined));
        let profile = self.registry.resolve(request.tool.as_deref());
        let (stack, tool) = resolve_stack(&flags, profile.as_deref());
        info!(
            features = flags.len(),
            tool = tool.as_ref().map_or("default", |t| t.identifier()),
            "Resolved features and stack"
        );

        let stage_start = self.begin(Stage::Analyzing);
        let domain_work = {
            let analyzer = Arc::clone(&self.domain_analyzer);
            let refined = refined.clone();
            let target_users = request.target_users.clone();
            let mode = request.mode;
            async move {
                analyzer
                    .analyze(&refined, target_users.as_deref(), mode)
                    .await
            }
        };
        let product_work = {
            let generator = Arc::clone(&self.product_generator);
            let brief = ProductBrief::new(request, &refined, &flags, &stack);
            async move { generator.generate(&brief).await }
        };
        let (domain, payload) = tokio::join!(
            self.run_branch("domain", self.config.domain_timeout, domain_work),
            self.run_branch("product", self.config.product_timeout, product_work),
        );
        self.finish(Stage::Analyzing, stage_start);

        let stage_start = self.begin(Stage::ProceduralBaseline);
        let input = ProceduralInput {
            target_users: request.target_users.as_deref(),
            constraints: &request.constraints,
            industry: request.industry.as_deref(),
            domain: domain.as_ref(),
            tool: tool.as_ref(),
            ..ProceduralInput::new(&refined, &flags, &stack, request.mode)
        };
        let baseline = self.procedural.build(&input);
        self.finish(Stage::ProceduralBaseline, stage_start);

        let stage_start = self.begin(Stage::Merging);
        let (output, report) = merge(baseline, payload, request.mode, &self.config);
        debug!(
            plan_from_ai = report.plan_from_ai,
            requirements_from_ai = report.requirements_from_ai,
            "Merged advisory output"
        );
        self.finish(Stage::Merging, stage_start);

        let result = GenerationResult {
            refined_idea: refined,
            implementation_plan: output.plan,
            tech_stack: stack.to_map(),
            prompt_count: output.prompts.len(),
            prompts: output.prompts,
            docs: output.docs,
            detected_features: flags.sorted_names(),
            estimated_complexity: Complexity::from_flag_count(flags.len()),
        };

        self.progress.on_progress(&ProgressEvent::Completed {
            total_time: start.elapsed(),
            prompt_count: result.prompt_count,
            plan_from_ai: report.plan_from_ai,
        });

        Ok(result)
    }

    /// Runs one advisory branch as its own task under a permit and a deadline
    ///
    /// The deadline covers the wait for a permit. A branch that overruns, or whose caller
    /// goes away, is aborted, so its permit is returned as soon as the task unwinds.
    async fn run_branch<T, F>(&self, branch: &'static str, budget: Duration, work: F) -> Option<T>
    where
        T: Send + 'static,
        F: Future<Output = Result<T, AdvisorError>> + Send + 'static,
    {
        let permits = Arc::clone(&self.permits);
        let dispatched = Instant::now();
        let mut task = BranchTask {
            handle: tokio::spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|_| BackendError::unavailable("advisory worker pool closed"))?;
                work.await
            }),
        };

        let outcome = match tokio::time::timeout(budget, &mut task.handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(AdvisorError::Unavailable(BackendError::Other {
                message: format!("{} task failed: {}", branch, join_err),
            })),
            Err(_) => {
                task.handle.abort();
                Err(AdvisorError::timeout(dispatched.elapsed()))
            }
        };

        match outcome {
            Ok(value) => {
                debug!(
                    branch,
                    elapsed_ms = dispatched.elapsed().as_millis() as u64,
                    "Advisory branch succeeded"
                );
                Some(value)
            }
            Err(err) => {
                self.degraded(branch, &err);
                None
            }
        }
    }

    fn degraded(&self, branch: &'static str, err: &AdvisorError) {
        match err {
            AdvisorError::SchemaMismatch(_) => {
                warn!(branch, kind = err.kind(), error = %err, "Response format drifted");
            }
            AdvisorError::Malformed(_) => {
                warn!(branch, kind = err.kind(), error = %err, "Model ignored JSON instruction");
            }
            _ => {
                warn!(branch, kind = err.kind(), error = %err, "Collaborator unavailable");
            }
        }
        self.progress.on_progress(&ProgressEvent::BranchDegraded {
            branch,
            kind: err.kind(),
            reason: err.to_string(),
        });
    }

    fn begin(&self, stage: Stage) -> Instant {
        self.progress.on_progress(&ProgressEvent::StageStarted { stage });
        Instant::now()
    }

    fn finish(&self, stage: Stage, started: Instant) {
        self.progress.on_progress(&ProgressEvent::StageComplete {
            stage,
            duration: started.elapsed(),
        });
    }
}

/// Owns a spawned advisory branch and aborts it when dropped
///
/// Covers both the branch deadline and a caller that drops `generate` mid-flight, so no
/// collaborator call outlives its request or keeps holding a worker permit.
struct BranchTask<T> {
    handle: JoinHandle<T>,
}

impl<T> Drop for BranchTask<T> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Picks the stack for a request and the profile procedural generation sees
///
/// A profile's fixed stack wins over flag-based selection. A profile without one gets the
/// chosen stack attached to a private copy, leaving the shared registry entry untouched.
pub fn resolve_stack(
    flags: &FeatureFlagSet,
    profile: Option<&ToolProfile>,
) -> (StackChoice, Option<ToolProfile>) {
    match profile {
        Some(profile) => match &profile.stack {
            Some(fixed) => (fixed.clone(), Some(profile.clone())),
            None => {
                let stack = choose(flags);
                let tool = profile.with_stack(stack.clone());
                (stack, Some(tool))
            }
        },
        None => (choose(flags), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainModel;
    use crate::pipeline::Mode;
    use crate::progress::NoOpHandler;
    use crate::tools::ToolKind;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct CountingRefiner {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl IdeaRefiner for CountingRefiner {
        async fn refine(
            &self,
            idea: &str,
            _target_users: Option<&str>,
            _mode: Mode,
        ) -> Result<String, AdvisorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("{} for busy teams who need it today", idea))
        }
    }

    struct DownAnalyzer;

    #[async_trait]
    impl DomainAnalyzer for DownAnalyzer {
        async fn analyze(
            &self,
            _refined_idea: &str,
            _target_users: Option<&str>,
            _mode: Mode,
        ) -> Result<DomainModel, AdvisorError> {
            Err(BackendError::unavailable("down").into())
        }
    }

    struct SlowProduct {
        delay: Duration,
    }

    #[async_trait]
    impl ProductGenerator for SlowProduct {
        async fn generate(
            &self,
            _brief: &ProductBrief,
        ) -> Result<crate::advisors::ProductPayload, AdvisorError> {
            tokio::time::sleep(self.delay).await;
            Ok(crate::advisors::ProductPayload {
                implementation_plan: Some(vec!["only step".to_string()]),
                product_requirements: None,
            })
        }
    }

    #[derive(Default)]
    struct RecordingHandler {
        events: Mutex<Vec<String>>,
    }

    impl ProgressHandler for RecordingHandler {
        fn on_progress(&self, event: &ProgressEvent) {
            let label = match event {
                ProgressEvent::StageStarted { stage } => format!("start:{}", stage),
                ProgressEvent::StageComplete { stage, .. } => format!("done:{}", stage),
                ProgressEvent::BranchDegraded { branch, kind, .. } => {
                    format!("degraded:{}:{}", branch, kind)
                }
                ProgressEvent::Completed { .. } => "completed".to_string(),
                ProgressEvent::Rejected { .. } => "rejected".to_string(),
            };
            self.events.lock().unwrap().push(label);
        }
    }

    fn pipeline(refiner: Arc<CountingRefiner>, product_delay: Duration) -> GenerationPipeline {
        GenerationPipeline::new(
            refiner,
            Arc::new(DownAnalyzer),
            Arc::new(SlowProduct {
                delay: product_delay,
            }),
            PipelineConfig::default().with_product_timeout(Duration::from_millis(50)),
        )
        .with_progress(Arc::new(NoOpHandler))
    }

    #[test]
    fn test_validate_counts_trimmed_characters() {
        let p = pipeline(Arc::default(), Duration::ZERO);

        let nine = IdeaRequest::new("   abcdefghi   ");
        assert_eq!(
            p.validate(&nine),
            Err(ValidationError::TooShort { len: 9, min: 10 })
        );
        assert_eq!(p.validate(&IdeaRequest::new("abcdefghij")), Ok("abcdefghij"));

        // Multi-byte characters count once each
        let accented = IdeaRequest::new("éééééééééé");
        assert!(p.validate(&accented).is_ok());

        let long = IdeaRequest::new("x".repeat(4001));
        assert_eq!(
            p.validate(&long),
            Err(ValidationError::TooLong {
                len: 4001,
                max: 4000
            })
        );
    }

    #[tokio::test]
    async fn test_rejected_request_calls_nothing() {
        let refiner = Arc::new(CountingRefiner::default());
        let handler = Arc::new(RecordingHandler::default());
        let p = pipeline(refiner.clone(), Duration::ZERO).with_progress(handler.clone());

        let result = p.generate(&IdeaRequest::new("tiny")).await;

        assert!(matches!(result, Err(PipelineError::Validation(_))));
        assert_eq!(refiner.calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            *handler.events.lock().unwrap(),
            vec!["start:validating", "rejected"]
        );
    }

    #[tokio::test]
    async fn test_slow_product_branch_degrades() {
        let refiner = Arc::new(CountingRefiner::default());
        let handler = Arc::new(RecordingHandler::default());
        let p = pipeline(refiner, Duration::from_secs(5)).with_progress(handler.clone());

        let result = p
            .generate(&IdeaRequest::new("A todo app").with_mode(Mode::Mvp))
            .await
            .unwrap();

        assert!(result.implementation_plan.len() >= 5);
        assert_ne!(result.implementation_plan, vec!["only step".to_string()]);
        let events = handler.events.lock().unwrap();
        assert!(events.contains(&"degraded:domain:unavailable".to_string()));
        assert!(events.contains(&"degraded:product:timeout".to_string()));
        assert_eq!(events.last().map(String::as_str), Some("completed"));
    }

    #[tokio::test]
    async fn test_every_started_stage_completes() {
        let handler = Arc::new(RecordingHandler::default());
        let p = pipeline(Arc::default(), Duration::ZERO).with_progress(handler.clone());

        p.generate(&IdeaRequest::new("A todo app")).await.unwrap();

        let events = handler.events.lock().unwrap();
        let started: Vec<&str> = events
            .iter()
            .filter_map(|e| e.strip_prefix("start:"))
            .collect();
        let completed: Vec<&str> = events
            .iter()
            .filter_map(|e| e.strip_prefix("done:"))
            .collect();
        assert_eq!(started, completed);
        assert_eq!(
            started,
            vec![
                "validating",
                "refining",
                "analyzing",
                "procedural_baseline",
                "merging"
            ]
        );
        assert_eq!(events.last().map(String::as_str), Some("completed"));
    }

    #[tokio::test]
    async fn test_result_reflects_stack_and_flags() {
        let p = pipeline(Arc::default(), Duration::ZERO);

        let result = p
            .generate(&IdeaRequest::new("real-time chat for teams"))
            .await
            .unwrap();

        assert!(result.refined_idea.starts_with("real-time chat for teams"));
        assert!(result.detected_features.contains(&"realtime".to_string()));
        assert_eq!(result.prompt_count, result.prompts.len());
        assert_eq!(
            result.estimated_complexity,
            Complexity::from_flag_count(result.detected_features.len())
        );
        assert_ne!(result.tech_stack["cache"], crate::stack::NONE_SLOT);
    }

    #[test]
    fn test_resolve_stack_prefers_fixed_stack() {
        let registry = ToolProfileRegistry::with_defaults();
        let flags = detect("real-time chat with payments");

        let lovable = registry.resolve(Some("lovable")).unwrap();
        let (stack, tool) = resolve_stack(&flags, Some(&*lovable));
        assert_eq!(Some(&stack), lovable.stack.as_ref());
        assert_eq!(tool.unwrap().kind, ToolKind::Lovable);
    }

    #[test]
    fn test_resolve_stack_attaches_chosen_stack_to_copy() {
        let registry = ToolProfileRegistry::with_defaults();
        let flags = detect("real-time chat with payments");

        let claude = registry.resolve(Some("claude_code")).unwrap();
        let (stack, tool) = resolve_stack(&flags, Some(&*claude));
        assert_eq!(stack, choose(&flags));
        assert_eq!(tool.unwrap().stack, Some(stack));
        assert!(registry.resolve(Some("claude_code")).unwrap().stack.is_none());
    }

    #[test]
    fn test_resolve_stack_without_tool() {
        let flags = FeatureFlagSet::new();
        let (stack, tool) = resolve_stack(&flags, None);
        assert_eq!(stack, choose(&flags));
        assert!(tool.is_none());
    }
}

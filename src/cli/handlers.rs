use super::commands::{ConfigArgs, FeaturesArgs, GenerateArgs, ToolsArgs};
use super::output::{FeatureReport, OutputFormatter};
use crate::config::IdeaforgeConfig;
use crate::features::detect;
use crate::llm::select_llm_client;
use crate::pipeline::{GenerationPipeline, GenerationResult, IdeaRequest, PipelineError};
use crate::stack::choose;
use crate::tools::ToolProfileRegistry;
use crate::usage::{StaticTierLimits, UsageError, UsageEvent, UsageGate, UsageLog, UsageRecorder};
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub const EXIT_OK: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_INVALID_REQUEST: i32 = 2;
pub const EXIT_USAGE_LIMIT: i32 = 3;

const USAGE_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

pub async fn handle_generate(args: &GenerateArgs, quiet: bool) -> i32 {
    match run_generate(args, quiet).await {
        Ok(()) => EXIT_OK,
        Err(e) => {
            let code = exit_code_for(&e);
            error!("{:#}", e);
            if !quiet {
                eprintln!("Error: {:#}", e);
            }
            code
        }
    }
}

/// Maps a failed generation onto the process exit code
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(PipelineError::Validation(_)) = err.downcast_ref::<PipelineError>() {
        return EXIT_INVALID_REQUEST;
    }
    if let Some(UsageError::LimitReached { .. }) = err.downcast_ref::<UsageError>() {
        return EXIT_USAGE_LIMIT;
    }
    EXIT_FAILURE
}

async fn run_generate(args: &GenerateArgs, quiet: bool) -> Result<()> {
    let config = IdeaforgeConfig::default();
    config.validate().context("Invalid configuration")?;

    let request = build_request(args)?;
    debug!(?request, "Built request");

    check_usage(&config, &args.tier, &args.user).await?;

    let selected = select_llm_client(&config, args.offline).await;
    if !quiet {
        eprintln!("Using {}", selected.description);
    }

    let pipeline = GenerationPipeline::with_llm(selected.client, config.pipeline_config());
    let result = pipeline.generate(&request).await?;

    record_usage(&config, &args.user, &request).await;

    write_output(args, &result)
}

/// Combines the request file, if any, with command-line overrides
pub fn build_request(args: &GenerateArgs) -> Result<IdeaRequest> {
    let mut request = match &args.request {
        Some(path) => load_request(path)?,
        None => IdeaRequest::new(String::new()),
    };

    if let Some(idea) = &args.idea {
        request.idea = idea.clone();
    }
    if let Some(mode) = args.mode {
        request.mode = mode;
    }
    if let Some(tool) = &args.tool {
        request = request.with_tool(tool);
    }
    if let Some(target_users) = &args.target_users {
        request = request.with_target_users(target_users);
    }
    for constraint in &args.constraints {
        request = request.with_constraint(constraint);
    }
    if let Some(industry) = &args.industry {
        request = request.with_industry(industry);
    }
    if let Some(budget) = &args.budget {
        request = request.with_budget(budget);
    }
    if let Some(timeline) = &args.timeline {
        request = request.with_timeline(timeline);
    }
    if let Some(preferred_stack) = &args.preferred_stack {
        request = request.with_preferred_stack(preferred_stack);
    }

    Ok(request)
}

/// Reads an [`IdeaRequest`] from JSON or YAML
pub fn load_request(path: &Path) -> Result<IdeaRequest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse request file {}", path.display()))
}

async fn check_usage(config: &IdeaforgeConfig, tier: &str, user: &str) -> Result<()> {
    let gate = UsageGate::new(Arc::new(StaticTierLimits::default()), config.tier_cache_ttl());

    let used = match UsageLog::monthly_count(&config.usage_log, user, Utc::now()).await {
        Ok(used) => used,
        Err(e) => {
            warn!("Could not read usage log, not enforcing limits: {}", e);
            return Ok(());
        }
    };

    if gate.allows(tier, used) {
        debug!(tier, used, "Usage within limit");
        return Ok(());
    }

    Err(UsageError::LimitReached {
        tier: tier.to_string(),
        used,
        limit: gate.limit_for(tier),
    }
    .into())
}

async fn record_usage(config: &IdeaforgeConfig, user: &str, request: &IdeaRequest) {
    let (recorder, writer) = UsageRecorder::spawn(config.usage_log.clone(), config.usage_queue);
    recorder.record(UsageEvent::generation(
        user,
        request.trimmed_idea(),
        request.mode,
        request.tool.as_deref(),
    ));
    drop(recorder);

    if tokio::time::timeout(USAGE_FLUSH_TIMEOUT, writer).await.is_err() {
        warn!("Usage record was not flushed in time");
    }
}

fn write_output(args: &GenerateArgs, result: &GenerationResult) -> Result<()> {
    let formatter = OutputFormatter::new(args.format.into());
    let rendered = formatter.format_result(result)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            info!("Package written to {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

pub fn handle_features(args: &FeaturesArgs) -> i32 {
    let flags = detect(&args.text);
    let report = FeatureReport::new(&flags, &choose(&flags));

    print_or_fail(OutputFormatter::new(args.format.into()).format_features(&report))
}

pub fn handle_tools(args: &ToolsArgs) -> i32 {
    let registry = ToolProfileRegistry::with_defaults();

    print_or_fail(OutputFormatter::new(args.format.into()).format_tools(&registry.list()))
}

pub fn handle_config(args: &ConfigArgs) -> i32 {
    let config = IdeaforgeConfig::default();
    if let Err(e) = config.validate() {
        warn!("Configuration is invalid: {}", e);
    }

    print_or_fail(OutputFormatter::new(args.format.into()).format_config(&config))
}

fn print_or_fail(rendered: Result<String>) -> i32 {
    match rendered {
        Ok(output) => {
            println!("{}", output);
            EXIT_OK
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::{CliArgs, Commands};
    use crate::pipeline::{Mode, ValidationError};
    use clap::Parser;
    use tempfile::TempDir;

    fn generate_args(argv: &[&str]) -> GenerateArgs {
        let mut full = vec!["ideaforge", "generate"];
        full.extend_from_slice(argv);
        match CliArgs::parse_from(full).command {
            Commands::Generate(args) => args,
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_build_request_from_flags() {
        let args = generate_args(&[
            "A clinic scheduler",
            "--mode",
            "mvp",
            "--tool",
            "replit",
            "-c",
            "HIPAA",
            "--target-users",
            "small clinics",
        ]);
        let request = build_request(&args).unwrap();

        assert_eq!(request.idea, "A clinic scheduler");
        assert_eq!(request.mode, Mode::Mvp);
        assert_eq!(request.tool.as_deref(), Some("replit"));
        assert_eq!(request.constraints, vec!["HIPAA"]);
        assert_eq!(request.target_users.as_deref(), Some("small clinics"));
    }

    #[test]
    fn test_flags_override_request_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("idea.yaml");
        std::fs::write(
            &path,
            "idea: A marketplace for local bakers\nmode: mvp\nindustry: food\nconstraints:\n  - cheap hosting\n",
        )
        .unwrap();

        let args = generate_args(&[
            "--request",
            path.to_str().unwrap(),
            "--industry",
            "retail",
            "-c",
            "no ads",
        ]);
        let request = build_request(&args).unwrap();

        assert_eq!(request.idea, "A marketplace for local bakers");
        assert_eq!(request.mode, Mode::Mvp);
        assert_eq!(request.industry.as_deref(), Some("retail"));
        assert_eq!(request.constraints, vec!["cheap hosting", "no ads"]);
    }

    #[test]
    fn test_load_json_request() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("idea.json");
        std::fs::write(&path, r#"{"idea": "A team wiki", "tool": "base44"}"#).unwrap();

        let request = load_request(&path).unwrap();
        assert_eq!(request.idea, "A team wiki");
        assert_eq!(request.tool.as_deref(), Some("base44"));
        assert_eq!(request.mode, Mode::Production);
    }

    #[test]
    fn test_missing_request_file() {
        let err = load_request(Path::new("/nonexistent/idea.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read request file"));
    }

    #[test]
    fn test_exit_codes() {
        let invalid = anyhow::Error::from(PipelineError::from(ValidationError::TooShort {
            len: 3,
            min: 10,
        }));
        assert_eq!(exit_code_for(&invalid), EXIT_INVALID_REQUEST);

        let limited = anyhow::Error::from(UsageError::LimitReached {
            tier: "free".to_string(),
            used: 5,
            limit: 5,
        });
        assert_eq!(exit_code_for(&limited), EXIT_USAGE_LIMIT);

        let other = anyhow::anyhow!("disk full");
        assert_eq!(exit_code_for(&other), EXIT_FAILURE);
    }
}

//! Configuration management for ideaforge
//!
//! Settings are loaded from environment variables with defaults and checked by
//! [`IdeaforgeConfig::validate`] before use.
//!
//! # Environment Variables
//!
//! - `IDEAFORGE_PROVIDER`: Provider selection (openai|ollama|anthropic|gemini|groq|xai) - default: "openai"
//! - `IDEAFORGE_MODEL`: Model name - default: "gpt-4.1" ("qwen2.5-coder:7b" for ollama)
//! - `IDEAFORGE_REQUEST_TIMEOUT`: Transport timeout in seconds - default: "90"
//! - `IDEAFORGE_REFINE_TIMEOUT`: Refinement budget in seconds - default: "20"
//! - `IDEAFORGE_DOMAIN_TIMEOUT`: Domain analysis budget in seconds - default: "45"
//! - `IDEAFORGE_PRODUCT_TIMEOUT`: Product generation budget in seconds - default: "60"
//! - `IDEAFORGE_MAX_CONCURRENCY`: Concurrent AI calls across requests - default: "6"
//! - `IDEAFORGE_LOG_LEVEL`: Logging level - default: "info"
//! - `IDEAFORGE_USAGE_LOG`: Usage log path - default: `<data dir>/ideaforge/usage.jsonl`
//! - `IDEAFORGE_USAGE_QUEUE`: Usage recorder queue depth - default: "64"
//! - `IDEAFORGE_TIER_CACHE_TTL`: Tier lookup cache TTL in seconds - default: "300"
//!
//! Provider credentials (`OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, `OLLAMA_HOST`, ...) are read
//! by the genai library directly.

use crate::pipeline::PipelineConfig;
use genai::adapter::AdapterKind;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_MODEL: &str = "gpt-4.1";
const DEFAULT_OLLAMA_MODEL: &str = "qwen2.5-coder:7b";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 90;
const DEFAULT_REFINE_TIMEOUT_SECS: u64 = 20;
const DEFAULT_DOMAIN_TIMEOUT_SECS: u64 = 45;
const DEFAULT_PRODUCT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_CONCURRENCY: usize = 6;
const DEFAULT_USAGE_QUEUE: usize = 64;
const DEFAULT_TIER_CACHE_TTL_SECS: u64 = 300;

const MAX_TIMEOUT_SECS: u64 = 600;
const MAX_CONCURRENCY: usize = 64;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid provider name
    #[error("Invalid provider: {0}. Valid options: openai, ollama, anthropic, gemini, groq, xai")]
    InvalidProvider(String),

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

#[derive(Debug, Clone)]
pub struct IdeaforgeConfig {
    /// LLM provider (from genai)
    pub provider: AdapterKind,

    /// Model name to use for inference (provider-specific)
    pub model: String,

    /// Transport timeout for a single LLM request, in seconds
    pub request_timeout_secs: u64,

    pub refine_timeout_secs: u64,
    pub domain_timeout_secs: u64,
    pub product_timeout_secs: u64,

    /// Concurrent AI calls allowed across all in-flight generations
    pub max_concurrency: usize,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    /// JSONL file that receives usage records
    pub usage_log: PathBuf,

    pub usage_queue: usize,
    pub tier_cache_ttl_secs: u64,
}

pub fn parse_provider(name: &str) -> Result<AdapterKind, ConfigError> {
    let lowered = name.trim().to_lowercase();
    let canonical = match lowered.as_str() {
        "claude" => "anthropic",
        "grok" => "xai",
        other => other,
    };
    AdapterKind::from_lower_str(canonical).ok_or_else(|| ConfigError::InvalidProvider(lowered.clone()))
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn default_usage_log() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(env::temp_dir)
        .join("ideaforge")
        .join("usage.jsonl")
}

impl Default for IdeaforgeConfig {
    /// Loads configuration from `IDEAFORGE_*` environment variables with defaults
    fn default() -> Self {
        let provider = env::var("IDEAFORGE_PROVIDER")
            .ok()
            .and_then(|s| parse_provider(&s).ok())
            .unwrap_or(AdapterKind::OpenAI);

        let model = env::var("IDEAFORGE_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| match provider {
                AdapterKind::Ollama => DEFAULT_OLLAMA_MODEL.to_string(),
                _ => DEFAULT_MODEL.to_string(),
            });

        let log_level = env::var("IDEAFORGE_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        let usage_log = env::var("IDEAFORGE_USAGE_LOG")
            .ok()
            .map(PathBuf::from)
            .unwrap_or_else(default_usage_log);

        Self {
            provider,
            model,
            request_timeout_secs: env_parse("IDEAFORGE_REQUEST_TIMEOUT", DEFAULT_REQUEST_TIMEOUT_SECS),
            refine_timeout_secs: env_parse("IDEAFORGE_REFINE_TIMEOUT", DEFAULT_REFINE_TIMEOUT_SECS),
            domain_timeout_secs: env_parse("IDEAFORGE_DOMAIN_TIMEOUT", DEFAULT_DOMAIN_TIMEOUT_SECS),
            product_timeout_secs: env_parse(
                "IDEAFORGE_PRODUCT_TIMEOUT",
                DEFAULT_PRODUCT_TIMEOUT_SECS,
            ),
            max_concurrency: env_parse("IDEAFORGE_MAX_CONCURRENCY", DEFAULT_MAX_CONCURRENCY),
            log_level,
            usage_log,
            usage_queue: env_parse("IDEAFORGE_USAGE_QUEUE", DEFAULT_USAGE_QUEUE),
            tier_cache_ttl_secs: env_parse(
                "IDEAFORGE_TIER_CACHE_TTL",
                DEFAULT_TIER_CACHE_TTL_SECS,
            ),
        }
    }
}

impl IdeaforgeConfig {
    /// Validates the configuration
    ///
    /// Checks that:
    /// - Every timeout is between 1 second and 10 minutes
    /// - Stage budgets grow refine < domain < product
    /// - Concurrency and queue depth are usable
    /// - Log level is valid
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, secs) in [
            ("Request timeout", self.request_timeout_secs),
            ("Refine timeout", self.refine_timeout_secs),
            ("Domain timeout", self.domain_timeout_secs),
            ("Product timeout", self.product_timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::ValidationFailed(format!(
                    "{} must be at least 1 second",
                    name
                )));
            }
            if secs > MAX_TIMEOUT_SECS {
                return Err(ConfigError::ValidationFailed(format!(
                    "{} cannot exceed 10 minutes",
                    name
                )));
            }
        }

        if !(self.refine_timeout_secs < self.domain_timeout_secs
            && self.domain_timeout_secs < self.product_timeout_secs)
        {
            return Err(ConfigError::ValidationFailed(format!(
                "Stage timeouts must increase refine < domain < product (got {}s, {}s, {}s)",
                self.refine_timeout_secs, self.domain_timeout_secs, self.product_timeout_secs
            )));
        }

        if self.max_concurrency == 0 || self.max_concurrency > MAX_CONCURRENCY {
            return Err(ConfigError::ValidationFailed(format!(
                "Max concurrency must be between 1 and {}",
                MAX_CONCURRENCY
            )));
        }

        if self.usage_queue == 0 {
            return Err(ConfigError::ValidationFailed(
                "Usage queue depth must be at least 1".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    /// Pipeline settings derived from this configuration
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::default()
            .with_refine_timeout(Duration::from_secs(self.refine_timeout_secs))
            .with_domain_timeout(Duration::from_secs(self.domain_timeout_secs))
            .with_product_timeout(Duration::from_secs(self.product_timeout_secs))
            .with_max_concurrency(self.max_concurrency)
    }

    pub fn tier_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.tier_cache_ttl_secs)
    }

    /// Converts configuration to a display map for output formatting
    pub fn to_display_map(&self) -> std::collections::BTreeMap<String, String> {
        let mut map = std::collections::BTreeMap::new();

        map.insert("provider".to_string(), self.provider.as_str().to_string());
        map.insert("model".to_string(), self.model.clone());
        map.insert(
            "request_timeout_secs".to_string(),
            self.request_timeout_secs.to_string(),
        );
        map.insert(
            "refine_timeout_secs".to_string(),
            self.refine_timeout_secs.to_string(),
        );
        map.insert(
            "domain_timeout_secs".to_string(),
            self.domain_timeout_secs.to_string(),
        );
        map.insert(
            "product_timeout_secs".to_string(),
            self.product_timeout_secs.to_string(),
        );
        map.insert(
            "max_concurrency".to_string(),
            self.max_concurrency.to_string(),
        );
        map.insert("log_level".to_string(), self.log_level.clone());
        map.insert(
            "usage_log".to_string(),
            self.usage_log.display().to_string(),
        );
        map.insert("usage_queue".to_string(), self.usage_queue.to_string());
        map.insert(
            "tier_cache_ttl_secs".to_string(),
            self.tier_cache_ttl_secs.to_string(),
        );

        map
    }
}

impl fmt::Display for IdeaforgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ideaforge Configuration:")?;
        writeln!(f, "  Provider: {}", self.provider.as_str())?;
        writeln!(f, "  Model: {}", self.model)?;
        writeln!(f, "  Request Timeout: {}s", self.request_timeout_secs)?;
        writeln!(
            f,
            "  Stage Budgets: refine {}s, domain {}s, product {}s",
            self.refine_timeout_secs, self.domain_timeout_secs, self.product_timeout_secs
        )?;
        writeln!(f, "  Max Concurrency: {}", self.max_concurrency)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        writeln!(f, "  Usage Log: {}", self.usage_log.display())?;
        writeln!(f, "  Usage Queue: {}", self.usage_queue)?;
        writeln!(f, "  Tier Cache TTL: {}s", self.tier_cache_ttl_secs)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    /// Helper to temporarily set environment variables for testing
    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    fn valid() -> IdeaforgeConfig {
        IdeaforgeConfig {
            provider: AdapterKind::OpenAI,
            model: "gpt-4.1".to_string(),
            request_timeout_secs: 90,
            refine_timeout_secs: 20,
            domain_timeout_secs: 45,
            product_timeout_secs: 60,
            max_concurrency: 6,
            log_level: "info".to_string(),
            usage_log: PathBuf::from("/tmp/usage.jsonl"),
            usage_queue: 64,
            tier_cache_ttl_secs: 300,
        }
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards = vec![
            EnvGuard::unset("IDEAFORGE_PROVIDER"),
            EnvGuard::unset("IDEAFORGE_MODEL"),
            EnvGuard::unset("IDEAFORGE_REQUEST_TIMEOUT"),
            EnvGuard::unset("IDEAFORGE_REFINE_TIMEOUT"),
            EnvGuard::unset("IDEAFORGE_DOMAIN_TIMEOUT"),
            EnvGuard::unset("IDEAFORGE_PRODUCT_TIMEOUT"),
            EnvGuard::unset("IDEAFORGE_MAX_CONCURRENCY"),
            EnvGuard::set("IDEAFORGE_LOG_LEVEL", DEFAULT_LOG_LEVEL),
        ];

        let config = IdeaforgeConfig::default();

        assert_eq!(config.provider, AdapterKind::OpenAI);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(config.refine_timeout_secs, 20);
        assert_eq!(config.domain_timeout_secs, 45);
        assert_eq!(config.product_timeout_secs, 60);
        assert_eq!(config.max_concurrency, 6);
        assert!(config.usage_log.ends_with("ideaforge/usage.jsonl"));
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _guards = vec![
            EnvGuard::set("IDEAFORGE_PROVIDER", "ollama"),
            EnvGuard::unset("IDEAFORGE_MODEL"),
            EnvGuard::set("IDEAFORGE_LOG_LEVEL", "DEBUG"),
            EnvGuard::set("IDEAFORGE_DOMAIN_TIMEOUT", "30"),
            EnvGuard::set("IDEAFORGE_MAX_CONCURRENCY", "12"),
            EnvGuard::set("IDEAFORGE_USAGE_LOG", "/var/tmp/u.jsonl"),
        ];

        let config = IdeaforgeConfig::default();

        assert_eq!(config.provider, AdapterKind::Ollama);
        assert_eq!(config.model, DEFAULT_OLLAMA_MODEL);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.domain_timeout_secs, 30);
        assert_eq!(config.max_concurrency, 12);
        assert_eq!(config.usage_log, PathBuf::from("/var/tmp/u.jsonl"));
    }

    #[test]
    #[serial]
    fn test_unparseable_values_fall_back() {
        let _guards = vec![
            EnvGuard::set("IDEAFORGE_PROVIDER", "skynet"),
            EnvGuard::set("IDEAFORGE_PRODUCT_TIMEOUT", "soon"),
        ];

        let config = IdeaforgeConfig::default();

        assert_eq!(config.provider, AdapterKind::OpenAI);
        assert_eq!(config.product_timeout_secs, DEFAULT_PRODUCT_TIMEOUT_SECS);
    }

    #[test]
    fn test_parse_provider() {
        assert_eq!(parse_provider("Claude").unwrap(), AdapterKind::Anthropic);
        assert_eq!(parse_provider(" openai ").unwrap(), AdapterKind::OpenAI);
        assert!(matches!(
            parse_provider("skynet"),
            Err(ConfigError::InvalidProvider(_))
        ));
    }

    #[test]
    fn test_validation_valid() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_timeout() {
        let mut config = valid();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = valid();
        config.product_timeout_secs = 601;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_stage_order() {
        let mut config = valid();
        config.domain_timeout_secs = 60;
        config.product_timeout_secs = 45;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("refine < domain < product"));
    }

    #[test]
    fn test_validation_concurrency_and_queue() {
        let mut config = valid();
        config.max_concurrency = 0;
        assert!(config.validate().is_err());

        let mut config = valid();
        config.max_concurrency = 65;
        assert!(config.validate().is_err());

        let mut config = valid();
        config.usage_queue = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_log_level() {
        let mut config = valid();
        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pipeline_config_carries_budgets() {
        let pipeline = valid().pipeline_config();
        assert_eq!(pipeline.refine_timeout, Duration::from_secs(20));
        assert_eq!(pipeline.domain_timeout, Duration::from_secs(45));
        assert_eq!(pipeline.product_timeout, Duration::from_secs(60));
        assert_eq!(pipeline.max_concurrency, 6);
    }

    #[test]
    fn test_config_display() {
        let display = format!("{}", valid());
        assert!(display.contains("Ideaforge Configuration:"));
        assert!(display.contains("Provider: OpenAI"));
        assert!(display.contains("refine 20s, domain 45s, product 60s"));
    }

    #[test]
    fn test_display_map() {
        let map = valid().to_display_map();
        assert_eq!(map["max_concurrency"], "6");
        assert_eq!(map["usage_log"], "/tmp/usage.jsonl");
    }
}

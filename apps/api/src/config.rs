use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::layout::Issuer;
use crate::llm_client::{ModelParams, DEFAULT_MODEL};
use crate::proposal::completer::MinCardinalities;
use crate::proposal::pipeline::PipelineConfig;
use crate::proposal::prompts::{ANALYSIS_PROMPT_TEMPLATE, TRANSCRIPT_PLACEHOLDER};

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a value is out of range.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub model_params: ModelParams,
    pub prompt_template: String,
    pub min_cardinalities: MinCardinalities,
    pub issuer: Issuer,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup (the process environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = MinCardinalities::default();
        let issuer = Issuer::default();

        let temperature: f32 = parse_or(&lookup, "LLM_TEMPERATURE", 0.5)?;
        if !(0.0..=1.0).contains(&temperature) {
            bail!("LLM_TEMPERATURE must be between 0 and 1, got {temperature}");
        }
        let timeout_secs: u64 = parse_or(&lookup, "LLM_TIMEOUT_SECS", 60)?;
        if timeout_secs == 0 {
            bail!("LLM_TIMEOUT_SECS must be positive");
        }

        Ok(Config {
            anthropic_api_key: require(&lookup, "ANTHROPIC_API_KEY")?,
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            model_params: ModelParams {
                model: lookup("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                temperature,
                max_tokens: parse_or(&lookup, "LLM_MAX_TOKENS", 3000)?,
                timeout: Duration::from_secs(timeout_secs),
            },
            prompt_template: load_prompt_template(lookup("PROMPT_TEMPLATE_PATH"))?,
            min_cardinalities: MinCardinalities {
                problems: parse_or(&lookup, "MIN_PROBLEMS", defaults.problems)?,
                solutions: parse_or(&lookup, "MIN_SOLUTIONS", defaults.solutions)?,
                next_actions: parse_or(&lookup, "MIN_NEXT_ACTIONS", defaults.next_actions)?,
            },
            issuer: Issuer {
                name: lookup("ISSUER_NAME").unwrap_or(issuer.name),
                department: lookup("ISSUER_DEPARTMENT").unwrap_or(issuer.department),
                email: lookup("ISSUER_EMAIL").unwrap_or(issuer.email),
                phone: lookup("ISSUER_PHONE").unwrap_or(issuer.phone),
            },
        })
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            prompt_template: self.prompt_template.clone(),
            model_params: self.model_params.clone(),
            min_cardinalities: self.min_cardinalities,
        }
    }
}

fn require(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    lookup(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        None => Ok(default),
    }
}

fn load_prompt_template(path: Option<String>) -> Result<String> {
    let Some(path) = path else {
        return Ok(ANALYSIS_PROMPT_TEMPLATE.to_string());
    };
    let template = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read prompt template from '{path}'"))?;
    if !template.contains(TRANSCRIPT_PLACEHOLDER) {
        bail!("Prompt template '{path}' has no {TRANSCRIPT_PLACEHOLDER} placeholder");
    }
    Ok(template)
}

use std::time::Duration;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "cramplan";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the generative-model API credential.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Character budget for the soft-gate prefix sample (Upload Gate).
pub const QUICK_SAMPLE_CHARS: usize = 1500;
/// Window of the sample the quick check actually inspects.
pub const QUICK_PREFIX_CHARS: usize = 1000;
/// Distinct academic keywords required by the quick check.
pub const QUICK_MIN_DISTINCT: usize = 2;

/// Per-file character budget for the orchestrator's deep sample.
pub const DEEP_SAMPLE_CHARS: usize = 4000;
/// Budget for the combined two-file sample fed to the density gate.
pub const COMBINED_BUDGET_CHARS: usize = 8000;
/// Distinct academic keywords required by the density gate.
pub const DENSITY_MIN_DISTINCT: usize = 2;
/// Minimum keyword occurrences per 100 words required by the density gate.
///
/// Both threshold pairs are deliberately low: the gates reject receipts and
/// tickets, they do not classify documents. The quick pair stays softer
/// (overridable) than the density pair on purpose; UX friction and cost
/// control are tuned independently.
pub const DENSITY_FLOOR: f64 = 0.3;

/// Default log filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    format!("{APP_NAME}=info")
}

/// Generation parameters sent with every model request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 4096,
        }
    }
}

/// One entry in the ordered model fallback list.
#[derive(Debug, Clone)]
pub struct ModelSpec {
    /// Provider identifier, e.g. "gemini-2.5-flash".
    pub id: String,
    /// Human-readable label used in progress messages.
    pub label: String,
    pub params: GenerationParams,
}

impl ModelSpec {
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            params: GenerationParams::default(),
        }
    }
}

/// Models tried in order; a transient failure on one moves to the next.
pub fn default_models() -> Vec<ModelSpec> {
    vec![
        ModelSpec::new("gemini-2.5-flash", "Gemini 2.5 Flash"),
        ModelSpec::new("gemini-2.0-flash", "Gemini 2.0 Flash"),
    ]
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{API_KEY_VAR} is not set; export it or add it to a .env file")]
    MissingApiKey,
}

/// Process-wide immutable pipeline configuration.
///
/// Built once at startup and passed into [`crate::Analyzer`]; nothing reads
/// the environment after construction.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    /// Base URL of the generative-language endpoint.
    pub endpoint: String,
    /// Ordered fallback list; must not be empty.
    pub models: Vec<ModelSpec>,
    /// Attempts per model before escalating to the next one.
    pub max_attempts: u32,
    /// Wall-clock ceiling for a single model attempt.
    pub attempt_timeout: Duration,
    /// Pause before retrying the request against the next model.
    pub fallback_delay: Duration,
}

impl AppConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            models: default_models(),
            max_attempts: 3,
            attempt_timeout: Duration::from_secs(120),
            fallback_delay: Duration::from_secs(2),
        }
    }

    /// Read the credential from the environment, failing fast when absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_key(std::env::var(API_KEY_VAR).ok())
    }

    pub fn from_key(key: Option<String>) -> Result<Self, ConfigError> {
        match key {
            Some(k) if !k.trim().is_empty() => Ok(Self::new(k)),
            _ => Err(ConfigError::MissingApiKey),
        }
    }
}

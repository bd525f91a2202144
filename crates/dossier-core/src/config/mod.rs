//! Configuration management for Dossier.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `dossier.toml` file
//! 3. User config `~/.config/dossier/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to render config: {0}")]
    RenderError(#[from] toml::ser::Error),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration.
    pub llm: LLMConfig,

    /// Retrieval provider configuration.
    pub search: SearchConfig,

    /// Evidence scoring configuration.
    pub scoring: ScoringConfig,

    /// Fact/opinion classifier configuration.
    pub classifier: ClassifierConfig,

    /// Brief synthesis configuration.
    pub synthesis: SynthesisConfig,

    /// Bounds on external calls.
    pub limits: CallPolicy,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./dossier.toml` (project local)
    /// 2. `~/.config/dossier/config.toml` (user config)
    /// 3. Falls back to defaults
    ///
    /// Environment overrides are applied in every case.
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new("dossier.toml").exists() {
            return Self::from_file("dossier.toml");
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("dossier").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        // LLM overrides
        if let Ok(provider) = std::env::var("DOSSIER_LLM_PROVIDER") {
            self.llm.provider = provider;
        }
        if let Ok(model) = std::env::var("DOSSIER_LLM_MODEL") {
            self.llm.model = Some(model);
        }
        if let Ok(url) = std::env::var("DOSSIER_LLM_BASE_URL") {
            self.llm.base_url = Some(url);
        }
        if let Ok(key) = std::env::var("DOSSIER_LLM_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Ok(tokens) = std::env::var("DOSSIER_LLM_MAX_TOKENS") {
            if let Ok(n) = tokens.parse() {
                self.llm.max_tokens = n;
            }
        }

        // Search overrides
        if let Ok(provider) = std::env::var("DOSSIER_SEARCH_PROVIDER") {
            self.search.provider = provider;
        }
        if let Ok(key) = std::env::var("DOSSIER_SEARCH_API_KEY") {
            self.search.api_key = Some(key);
        }
        if let Ok(cx) = std::env::var("DOSSIER_SEARCH_CX") {
            self.search.cx = Some(cx);
        }
        if let Ok(endpoint) = std::env::var("DOSSIER_SEARCH_ENDPOINT") {
            self.search.endpoint = Some(endpoint);
        }
    }

    /// Checks that numeric settings are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.results_per_task == 0 {
            return Err(ConfigError::Invalid(
                "search.results_per_task must be greater than 0".into(),
            ));
        }
        if self.synthesis.evidence_per_task == 0 {
            return Err(ConfigError::Invalid(
                "synthesis.evidence_per_task must be greater than 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.synthesis.dedup_threshold) {
            return Err(ConfigError::Invalid(
                "synthesis.dedup_threshold must be within [0, 1]".into(),
            ));
        }
        let weights = [
            self.scoring.relevance_weight,
            self.scoring.recency_weight,
            self.scoring.reliability_weight,
        ];
        if weights.iter().any(|w| *w < 0.0) {
            return Err(ConfigError::Invalid(
                "scoring weights must not be negative".into(),
            ));
        }
        if weights.iter().sum::<f64>() > 1.0 + 1e-9 {
            return Err(ConfigError::Invalid(
                "scoring weights must sum to at most 1".into(),
            ));
        }
        Ok(())
    }

    /// Renders this configuration as TOML. API keys are never written.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        Config::default().to_toml_string().unwrap_or_default()
    }
}

/// LLM provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LLMConfig {
    /// Provider name: "auto", "openai", "anthropic", "ollama", or "mock".
    pub provider: String,

    /// Model name (provider-specific).
    pub model: Option<String>,

    /// Base URL for OpenAI-compatible and Ollama providers, or the full
    /// messages endpoint for Anthropic.
    pub base_url: Option<String>,

    /// API key (can also be set via environment variable).
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Maximum tokens a provider may be asked for.
    pub max_tokens: u32,

    /// API version (for Anthropic).
    pub api_version: Option<String>,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_LLM_PROVIDER.to_string(),
            model: None,
            base_url: None,
            api_key: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            api_version: Some(DEFAULT_ANTHROPIC_API_VERSION.to_string()),
        }
    }
}

impl LLMConfig {
    /// Get the model name, falling back to provider defaults.
    pub fn model_or_default(&self) -> String {
        self.model.clone().unwrap_or_else(|| match self.provider.to_lowercase().as_str() {
            "anthropic" | "claude" => DEFAULT_ANTHROPIC_MODEL.to_string(),
            "ollama" => DEFAULT_OLLAMA_MODEL.to_string(),
            _ => DEFAULT_OPENAI_MODEL.to_string(),
        })
    }
}

/// Retrieval provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Provider name: "mock", "google", or "serper".
    pub provider: String,

    /// API key for networked providers.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Google Custom Search engine id.
    pub cx: Option<String>,

    /// Overrides the provider's API endpoint (proxies, self-hosted gateways).
    pub endpoint: Option<String>,

    /// Results requested per sub-task.
    pub results_per_task: usize,

    /// Restrict networked searches to these domains.
    pub domain_filters: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_SEARCH_PROVIDER.to_string(),
            api_key: None,
            cx: None,
            endpoint: None,
            results_per_task: DEFAULT_RESULTS_PER_TASK,
            domain_filters: Vec::new(),
        }
    }
}

/// Evidence scoring weights and the domain reliability table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub relevance_weight: f64,
    pub recency_weight: f64,
    pub reliability_weight: f64,

    /// Reliability for domains absent from `domain_reliability`.
    pub default_reliability: f64,

    /// Per-domain reliability in [0, 1], matched on the exact hostname.
    pub domain_reliability: BTreeMap<String, f64>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            relevance_weight: DEFAULT_RELEVANCE_WEIGHT,
            recency_weight: DEFAULT_RECENCY_WEIGHT,
            reliability_weight: DEFAULT_RELIABILITY_WEIGHT,
            default_reliability: DEFAULT_RELIABILITY,
            domain_reliability: DEFAULT_DOMAIN_RELIABILITY
                .iter()
                .map(|(domain, value)| (domain.to_string(), *value))
                .collect(),
        }
    }
}

/// Fact/opinion classifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Lowercase phrases that mark a claim as opinion.
    pub opinion_markers: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            opinion_markers: DEFAULT_OPINION_MARKERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Brief synthesis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Leading words of the research question used as scoring keywords.
    pub max_keywords: usize,

    /// Raw results considered per task; all of them may become citations.
    pub evidence_per_task: usize,

    /// Results summarized as bullets per task.
    pub bullets_per_task: usize,

    /// Jaccard similarity above which records are near-duplicates.
    pub dedup_threshold: f64,

    /// Snippet characters kept per bullet.
    pub snippet_chars: usize,

    /// Characters kept from each task summary.
    pub section_chars: usize,

    /// Characters kept from the final synthesis.
    pub conclusion_chars: usize,

    pub summary_max_tokens: u32,
    pub synthesis_max_tokens: u32,

    /// Classify bullet evidence into facts and opinions.
    pub classify_claims: bool,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            max_keywords: DEFAULT_MAX_KEYWORDS,
            evidence_per_task: DEFAULT_EVIDENCE_PER_TASK,
            bullets_per_task: DEFAULT_BULLETS_PER_TASK,
            dedup_threshold: DEFAULT_DEDUP_THRESHOLD,
            snippet_chars: DEFAULT_SNIPPET_CHARS,
            section_chars: DEFAULT_SECTION_CHARS,
            conclusion_chars: DEFAULT_CONCLUSION_CHARS,
            summary_max_tokens: DEFAULT_SUMMARY_MAX_TOKENS,
            synthesis_max_tokens: DEFAULT_SYNTHESIS_MAX_TOKENS,
            classify_claims: false,
        }
    }
}

/// Timeouts for calls that leave the process.
///
/// A value of `0` disables the bound for that kind of call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallPolicy {
    pub generation_timeout_secs: u64,
    pub retrieval_timeout_secs: u64,
}

impl Default for CallPolicy {
    fn default() -> Self {
        Self {
            generation_timeout_secs: DEFAULT_GENERATION_TIMEOUT_SECS,
            retrieval_timeout_secs: DEFAULT_RETRIEVAL_TIMEOUT_SECS,
        }
    }
}

impl CallPolicy {
    /// A policy with no bounds, for tests driving in-process fakes.
    pub fn unbounded() -> Self {
        Self {
            generation_timeout_secs: 0,
            retrieval_timeout_secs: 0,
        }
    }

    pub fn generation_timeout(&self) -> Option<Duration> {
        (self.generation_timeout_secs > 0).then(|| Duration::from_secs(self.generation_timeout_secs))
    }

    pub fn retrieval_timeout(&self) -> Option<Duration> {
        (self.retrieval_timeout_secs > 0).then(|| Duration::from_secs(self.retrieval_timeout_secs))
    }
}

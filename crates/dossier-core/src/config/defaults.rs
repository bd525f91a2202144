//! Default values for Dossier configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// LLM Defaults
// ============================================================================

/// Default LLM provider. Resolves to the offline generator unless
/// credentials for a networked provider are configured.
pub const DEFAULT_LLM_PROVIDER: &str = "auto";

/// Default max tokens for LLM responses.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

// OpenAI defaults
/// Default OpenAI API URL.
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";
/// Default OpenAI model.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

// Anthropic defaults
/// Default Anthropic API URL.
pub const DEFAULT_ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
/// Default Anthropic model.
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";
/// Default Anthropic API version.
pub const DEFAULT_ANTHROPIC_API_VERSION: &str = "2023-06-01";

// Ollama defaults
/// Default Ollama API URL.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/v1";
/// Default Ollama model.
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";

/// System message sent with every generation request.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful research assistant.";

/// Number of prompt characters echoed back by the offline generator.
pub const MOCK_ECHO_CHARS: usize = 400;

// ============================================================================
// Search Defaults
// ============================================================================

/// Default retrieval provider.
pub const DEFAULT_SEARCH_PROVIDER: &str = "mock";

/// Default number of results requested per sub-task.
pub const DEFAULT_RESULTS_PER_TASK: usize = 5;

/// Upper bound on results a single provider call may return.
pub const MAX_PROVIDER_RESULTS: usize = 10;

/// Google Custom Search endpoint.
pub const DEFAULT_GOOGLE_CSE_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// Serper search endpoint.
pub const DEFAULT_SERPER_URL: &str = "https://google.serper.dev/search";

/// Domains cycled through by the offline provider.
pub const MOCK_DOMAINS: &[&str] = &["example.com", "example.org", "research.example"];

// ============================================================================
// Scoring Defaults
// ============================================================================

/// Weight of keyword relevance in the combined score.
pub const DEFAULT_RELEVANCE_WEIGHT: f64 = 0.6;

/// Weight of recency in the combined score.
pub const DEFAULT_RECENCY_WEIGHT: f64 = 0.25;

/// Weight of domain reliability in the combined score.
pub const DEFAULT_RELIABILITY_WEIGHT: f64 = 0.15;

/// Reliability assigned to domains missing from the table.
pub const DEFAULT_RELIABILITY: f64 = 0.5;

/// Recency assigned when a record has no usable timestamp.
pub const NEUTRAL_RECENCY: f64 = 0.5;

/// Decay constant for recency, in days.
pub const RECENCY_DECAY_DAYS: f64 = 365.0;

/// Rank assumed for records whose provider did not report one.
pub const MISSING_SOURCE_RANK: u32 = 9999;

/// Built-in domain reliability table.
pub const DEFAULT_DOMAIN_RELIABILITY: &[(&str, f64)] = &[
    ("wikipedia.org", 0.7),
    ("example.com", 0.5),
    ("example.org", 0.55),
    ("research.example", 0.8),
];

// ============================================================================
// Classifier Defaults
// ============================================================================

/// Phrases that mark a claim as opinion regardless of other content.
pub const DEFAULT_OPINION_MARKERS: &[&str] = &[
    "i think",
    "we think",
    "perhaps",
    "may indicate",
    "suggests",
    "argue",
    "opinion",
];

/// Max tokens for the fallback classification call.
pub const CLASSIFY_MAX_TOKENS: u32 = 20;

// ============================================================================
// Synthesis Defaults
// ============================================================================

/// Number of leading query words used as scoring keywords.
pub const DEFAULT_MAX_KEYWORDS: usize = 8;

/// Raw results considered per task (and cited per task).
pub const DEFAULT_EVIDENCE_PER_TASK: usize = 5;

/// Results turned into prose bullets per task.
pub const DEFAULT_BULLETS_PER_TASK: usize = 3;

/// Jaccard similarity above which two records are near-duplicates.
pub const DEFAULT_DEDUP_THRESHOLD: f64 = 0.6;

/// Snippet characters kept in a bullet.
pub const DEFAULT_SNIPPET_CHARS: usize = 240;

/// Characters kept from a per-task summary.
pub const DEFAULT_SECTION_CHARS: usize = 1200;

/// Characters kept from the final synthesis.
pub const DEFAULT_CONCLUSION_CHARS: usize = 800;

/// Max tokens for the decomposition call.
pub const DECOMPOSE_MAX_TOKENS: u32 = 400;

/// Maximum sub-tasks produced by the heuristic decomposition.
pub const HEURISTIC_MAX_TASKS: usize = 6;

/// Max tokens for a per-task summary.
pub const DEFAULT_SUMMARY_MAX_TOKENS: u32 = 400;

/// Max tokens for the final synthesis.
pub const DEFAULT_SYNTHESIS_MAX_TOKENS: u32 = 500;

/// Response substrings that flag a task summary as containing caveats.
pub const CAVEAT_MARKERS: &[&str] = &["contrad", "uncertain", "limitation"];

// ============================================================================
// Limits Defaults
// ============================================================================

/// Timeout for a single generation call, in seconds.
pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 60;

/// Timeout for a single retrieval call, in seconds.
pub const DEFAULT_RETRIEVAL_TIMEOUT_SECS: u64 = 10;

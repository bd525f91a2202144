mod claude;
mod error;
mod mock;
mod openai;
mod provider;

pub use claude::ClaudeClient;
pub use error::LLMError;
pub use mock::MockLLM;
pub use openai::OpenAIClient;
pub use provider::Provider;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Sampling parameters for a single generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Upper bound on response tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Optional system message; providers use their default when absent.
    pub system: Option<String>,
}

impl GenerationParams {
    /// Deterministic sampling with the given token budget.
    pub fn deterministic(max_tokens: u32) -> Self {
        Self {
            max_tokens,
            temperature: 0.0,
            system: None,
        }
    }

    /// Sets the system message.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// The output of a generation call.
///
/// `text` is untrusted free text. `raw` holds the provider's response body
/// and is never interpreted by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generation {
    pub text: String,
    pub raw: serde_json::Value,
}

impl Generation {
    pub fn new(text: impl Into<String>, raw: serde_json::Value) -> Self {
        Self {
            text: text.into(),
            raw,
        }
    }
}

/// Trait for text-generation providers.
///
/// This abstraction allows swapping between different LLM providers
/// without changing the rest of the code.
///
/// # Supported Providers
///
/// - **OpenAI-compatible**: Works with OpenAI, Azure, vLLM, OpenRouter, etc.
/// - **Anthropic**: Claude models via Anthropic API
/// - **Ollama**: Local models via Ollama
/// - **Mock**: Deterministic offline echo, used for demos and tests
///
/// # Example
///
/// ```ignore
/// use dossier_core::config::Config;
/// use dossier_core::llm::{GenerationParams, Provider, LLM};
///
/// let llm = Provider::build_from_config(&Config::load()?.llm)?;
/// let out = llm.generate("Hello!", &GenerationParams::deterministic(64)).await?;
/// println!("{}", out.text);
/// ```
#[async_trait]
pub trait LLM: Send + Sync {
    /// Generate text for a prompt.
    async fn generate(&self, prompt: &str, params: &GenerationParams)
        -> Result<Generation, LLMError>;
}

/// Blanket implementation for boxed trait objects.
#[async_trait]
impl LLM for Box<dyn LLM> {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Generation, LLMError> {
        (**self).generate(prompt, params).await
    }
}

/// Shared trait objects, so one client can back several pipeline stages.
#[async_trait]
impl LLM for Arc<dyn LLM> {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Generation, LLMError> {
        (**self).generate(prompt, params).await
    }
}

/// Borrowed clients, so a caller can keep ownership of a provider.
#[async_trait]
impl<'a, T: LLM + ?Sized> LLM for &'a T {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Generation, LLMError> {
        (**self).generate(prompt, params).await
    }
}

/// Runs a generation call, aborting it once `timeout` elapses.
pub async fn generate_within<L: LLM + ?Sized>(
    llm: &L,
    prompt: &str,
    params: &GenerationParams,
    timeout: Option<Duration>,
) -> Result<Generation, LLMError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, llm.generate(prompt, params))
            .await
            .map_err(|_| LLMError::Timeout(limit.as_secs()))?,
        None => llm.generate(prompt, params).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowLLM;

    #[async_trait]
    impl LLM for SlowLLM {
        async fn generate(
            &self,
            _prompt: &str,
            _params: &GenerationParams,
        ) -> Result<Generation, LLMError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(Generation::new("late", serde_json::Value::Null))
        }
    }

    #[tokio::test]
    async fn test_generate_within_times_out() {
        let params = GenerationParams::deterministic(10);
        let result =
            generate_within(&SlowLLM, "prompt", &params, Some(Duration::from_millis(10))).await;
        assert!(matches!(result, Err(LLMError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_generate_within_unbounded() {
        let llm = MockLLM::new();
        let params = GenerationParams::deterministic(10);
        let result = generate_within(&llm, "hello", &params, None).await.unwrap();
        assert!(result.text.contains("hello"));
    }

    #[tokio::test]
    async fn test_boxed_llm_delegates() {
        let llm: Box<dyn LLM> = Box::new(MockLLM::new());
        let out = llm
            .generate("boxed prompt", &GenerationParams::deterministic(10))
            .await
            .unwrap();
        assert!(out.text.contains("boxed prompt"));
    }

    #[test]
    fn test_params_with_system() {
        let params = GenerationParams::deterministic(20).with_system("be brief");
        assert_eq!(params.max_tokens, 20);
        assert_eq!(params.temperature, 0.0);
        assert_eq!(params.system.as_deref(), Some("be brief"));
    }
}

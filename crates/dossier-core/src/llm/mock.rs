use async_trait::async_trait;
use serde_json::json;

use super::{Generation, GenerationParams, LLMError, LLM};
use crate::config::MOCK_ECHO_CHARS;
use crate::text::truncate_chars;

/// Deterministic offline generator.
///
/// Echoes the head of the prompt back, so runs without credentials still
/// produce a complete (if uninformative) brief.
#[derive(Debug, Clone, Default)]
pub struct MockLLM;

impl MockLLM {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LLM for MockLLM {
    async fn generate(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<Generation, LLMError> {
        let text = format!(
            "[MOCK LLM] Would respond to: {}",
            truncate_chars(prompt, MOCK_ECHO_CHARS)
        );
        Ok(Generation::new(text, json!({ "mock": true })))
    }
}

//! Fakes shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use dossier_core::llm::{Generation, GenerationParams, LLMError, LLM};
use dossier_core::search::{SearchError, SearchProvider};
use dossier_core::ResultRecord;

/// Answers each prompt by its leading phrase and records every prompt.
pub struct ScriptedLLM {
    pub decomposition: String,
    pub summary: String,
    pub conclusion: String,
    pub label: String,
    /// Fail any prompt containing this text
    pub fail_on: Option<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl Default for ScriptedLLM {
    fn default() -> Self {
        Self {
            decomposition: "[]".to_string(),
            summary: "- point one\n- point two".to_string(),
            conclusion: "  The evidence points one way.  ".to_string(),
            label: "FACT".to_string(),
            fail_on: None,
            prompts: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedLLM {
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn count_starting_with(&self, prefix: &str) -> usize {
        self.prompts().iter().filter(|p| p.starts_with(prefix)).count()
    }
}

#[async_trait]
impl LLM for ScriptedLLM {
    async fn generate(&self, prompt: &str, _params: &GenerationParams) -> Result<Generation, LLMError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        if let Some(needle) = &self.fail_on {
            if prompt.contains(needle.as_str()) {
                return Err(LLMError::RequestFailed("scripted failure".to_string()));
            }
        }

        let text = if prompt.starts_with("Break the following") {
            &self.decomposition
        } else if prompt.starts_with("Summarize") {
            &self.summary
        } else if prompt.starts_with("## Task-level summaries") {
            &self.conclusion
        } else if prompt.starts_with("Classify") {
            &self.label
        } else {
            return Err(LLMError::ParseError(format!("unexpected prompt: {prompt}")));
        };
        Ok(Generation::new(text.clone(), serde_json::Value::Null))
    }
}

/// Always fails.
pub struct FailingLLM;

#[async_trait]
impl LLM for FailingLLM {
    async fn generate(&self, _prompt: &str, _params: &GenerationParams) -> Result<Generation, LLMError> {
        Err(LLMError::Network("connection refused".to_string()))
    }
}

/// Returns canned results per query; unknown queries get nothing.
#[derive(Default)]
pub struct StaticSearch {
    pub results: HashMap<String, Vec<ResultRecord>>,
}

impl StaticSearch {
    pub fn with(mut self, query: &str, records: Vec<ResultRecord>) -> Self {
        self.results.insert(query.to_string(), records);
        self
    }
}

#[async_trait]
impl SearchProvider for StaticSearch {
    async fn search(
        &self,
        query: &str,
        n: usize,
        _domain_filters: &[String],
    ) -> Result<Vec<ResultRecord>, SearchError> {
        Ok(self
            .results
            .get(query)
            .map(|records| records.iter().take(n).cloned().collect())
            .unwrap_or_default())
    }
}

/// Always fails.
pub struct FailingSearch;

#[async_trait]
impl SearchProvider for FailingSearch {
    async fn search(
        &self,
        _query: &str,
        _n: usize,
        _domain_filters: &[String],
    ) -> Result<Vec<ResultRecord>, SearchError> {
        Err(SearchError::Api {
            status: 503,
            message: "unavailable".to_string(),
        })
    }
}

pub fn make_result(url: &str, title: &str, snippet: &str) -> ResultRecord {
    ResultRecord::new(url, title, snippet)
}

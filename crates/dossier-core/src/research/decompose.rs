use std::time::Duration;

use serde_json::Value;

use crate::config::{DECOMPOSE_MAX_TOKENS, HEURISTIC_MAX_TASKS};
use crate::llm::{generate_within, GenerationParams, LLM};
use crate::research::prompts::build_decompose_prompt;
use crate::task::Task;

/// Splits a research question into sub-questions.
///
/// Asks the generator for a JSON array first; when that fails or yields
/// nothing usable, splits the question on sentence boundaries instead.
/// Always returns at least one task.
pub struct TaskDecomposer<L: LLM> {
    llm: L,
    timeout: Option<Duration>,
}

impl<L: LLM> TaskDecomposer<L> {
    pub fn new(llm: L) -> Self {
        Self { llm, timeout: None }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn decompose(&self, query: &str, structure_hint: Option<&str>) -> Vec<Task> {
        let prompt = build_decompose_prompt(query, structure_hint);
        let params = GenerationParams::deterministic(DECOMPOSE_MAX_TOKENS);

        let tasks = match generate_within(&self.llm, &prompt, &params, self.timeout).await {
            Ok(response) => parse_tasks(&response.text),
            Err(e) => {
                tracing::warn!(error = %e, "decomposition call failed, using heuristic split");
                Vec::new()
            }
        };

        if tasks.is_empty() {
            tracing::debug!("no tasks from generator, using heuristic split");
            return heuristic_tasks(query);
        }

        tracing::info!(tasks = tasks.len(), "decomposed research question");
        tasks
    }
}

/// Parses a generator response into tasks with ids `t1..tn`.
///
/// Accepts a JSON array, optionally inside a Markdown code fence, whose
/// items are either objects with a `task` string or plain strings. Other
/// items and blank entries are skipped.
pub fn parse_tasks(response: &str) -> Vec<Task> {
    let Ok(Value::Array(items)) = serde_json::from_str::<Value>(extract_json(response)) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(text) => Some(text.as_str()),
            Value::Object(map) => map.get("task").and_then(Value::as_str),
            _ => None,
        })
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .enumerate()
        .map(|(i, text)| Task::numbered(i, text))
        .collect()
}

/// Deterministic split on sentence boundaries, at most six tasks.
///
/// Falls back to the whole query as a single task.
pub fn heuristic_tasks(query: &str) -> Vec<Task> {
    let normalized = query.replace('?', ".");
    let tasks: Vec<Task> = normalized
        .split('.')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .take(HEURISTIC_MAX_TASKS)
        .enumerate()
        .map(|(i, part)| Task::numbered(i, part))
        .collect();

    if tasks.is_empty() {
        vec![Task::numbered(0, query)]
    } else {
        tasks
    }
}

/// Extracts JSON from a response that might be wrapped in markdown code blocks.
fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    // Check for ```json ... ``` or ``` ... ```
    if trimmed.starts_with("```") {
        if let Some(start) = trimmed.find('\n') {
            let rest = &trimmed[start + 1..];
            if let Some(end) = rest.rfind("```") {
                return rest[..end].trim();
            }
        }
    }

    trimmed
}

//! Fact/opinion labelling of evidence claims.
//!
//! Precedence, first match wins:
//! 1. an opinion marker phrase → opinion (even when digits are present)
//! 2. a digit or the word "study" → fact
//! 3. ask the generator; an answer containing "FACT" → fact, else opinion

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ClassifierConfig, CLASSIFY_MAX_TOKENS, DEFAULT_OPINION_MARKERS};
use crate::llm::{generate_within, GenerationParams, LLM};
use crate::record::ResultRecord;
use crate::research::prompts::build_classify_prompt;

/// The label assigned to a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClaimKind {
    Fact,
    Opinion,
}

/// A single attributable statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub url: String,
    pub claim: String,
}

/// Claims split by label, each list in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSet {
    pub facts: Vec<Claim>,
    pub opinions: Vec<Claim>,
}

impl ClaimSet {
    fn push(&mut self, kind: ClaimKind, claim: Claim) {
        match kind {
            ClaimKind::Fact => self.facts.push(claim),
            ClaimKind::Opinion => self.opinions.push(claim),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty() && self.opinions.is_empty()
    }
}

/// Labels claims as fact or opinion.
#[derive(Debug, Clone)]
pub struct ClaimClassifier {
    opinion_markers: Vec<String>,
    timeout: Option<Duration>,
}

impl Default for ClaimClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_OPINION_MARKERS.iter().map(|s| s.to_string()).collect())
    }
}

impl ClaimClassifier {
    /// `opinion_markers` are matched as lowercase substrings.
    pub fn new(opinion_markers: Vec<String>) -> Self {
        Self {
            opinion_markers: opinion_markers
                .into_iter()
                .map(|m| m.to_lowercase())
                .collect(),
            timeout: None,
        }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(config.opinion_markers.clone())
    }

    /// Bounds each fallback generator call.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Labels a claim from its text alone, or `None` when the heuristics
    /// cannot decide.
    pub fn heuristic_label(&self, text: &str) -> Option<ClaimKind> {
        let lower = text.to_lowercase();
        if self.opinion_markers.iter().any(|m| lower.contains(m.as_str())) {
            return Some(ClaimKind::Opinion);
        }
        if text.chars().any(char::is_numeric) || lower.contains("study") {
            return Some(ClaimKind::Fact);
        }
        None
    }

    /// Labels a claim, asking `llm` when the heuristics cannot decide.
    ///
    /// A failed generator call leaves the claim labelled as opinion.
    pub async fn label<L: LLM + ?Sized>(&self, text: &str, llm: &L) -> ClaimKind {
        if let Some(kind) = self.heuristic_label(text) {
            return kind;
        }

        let prompt = build_classify_prompt(text);
        let params = GenerationParams::deterministic(CLASSIFY_MAX_TOKENS);
        match generate_within(llm, &prompt, &params, self.timeout).await {
            Ok(answer) => parse_label(&answer.text),
            Err(e) => {
                tracing::warn!(error = %e, "claim classification fell back to opinion");
                ClaimKind::Opinion
            }
        }
    }

    /// Splits `records` into facts and opinions.
    pub async fn classify<L: LLM + ?Sized>(&self, records: &[ResultRecord], llm: &L) -> ClaimSet {
        let mut claims = ClaimSet::default();
        for record in records {
            let text = record.claim_text();
            let kind = self.label(&text, llm).await;
            claims.push(
                kind,
                Claim {
                    url: record.url.clone(),
                    claim: text,
                },
            );
        }
        claims
    }
}

/// Reads a generator answer: anything mentioning FACT is a fact.
pub fn parse_label(answer: &str) -> ClaimKind {
    if answer.to_uppercase().contains("FACT") {
        ClaimKind::Fact
    } else {
        ClaimKind::Opinion
    }
}

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::config::{CallPolicy, Config, SynthesisConfig, CAVEAT_MARKERS};
use crate::llm::{generate_within, GenerationParams, LLMError, LLM};
use crate::record::ResultRecord;
use crate::research::brief::{Brief, Citation, Section};
use crate::research::classify::ClaimClassifier;
use crate::research::dedup::Deduplicator;
use crate::research::prompts::{build_summary_prompt, build_synthesis_prompt};
use crate::research::scoring::ScoringEngine;
use crate::task::{Task, TaskEvidence};
use crate::text::truncate_chars;

/// Ordered URL → citation id mapping for one assembly run.
///
/// Ids start at 1 and follow first registration. Registering a URL again
/// returns its existing id.
#[derive(Debug, Clone, Default)]
pub struct CitationTable {
    ids: HashMap<String, usize>,
    entries: Vec<Citation>,
}

impl CitationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id for `record`'s URL, assigning the next one if unseen.
    pub fn register(&mut self, record: &ResultRecord) -> usize {
        if let Some(id) = self.ids.get(&record.url) {
            return *id;
        }
        let id = self.entries.len() + 1;
        self.ids.insert(record.url.clone(), id);
        self.entries.push(Citation {
            id,
            url: record.url.clone(),
            title: record.title.clone(),
            domain: record.domain.clone(),
        });
        id
    }

    pub fn get(&self, url: &str) -> Option<usize> {
        self.ids.get(url).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Citation] {
        &self.entries
    }

    pub fn into_citations(self) -> Vec<Citation> {
        self.entries
    }
}

/// Which generation call failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisStage {
    TaskSummary(String),
    FinalSynthesis,
}

impl fmt::Display for SynthesisStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthesisStage::TaskSummary(id) => write!(f, "task summary for {}", id),
            SynthesisStage::FinalSynthesis => write!(f, "final synthesis"),
        }
    }
}

/// Errors that abort brief assembly.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Generation failed during {stage}: {source}")]
    Generation {
        stage: SynthesisStage,
        #[source]
        source: LLMError,
    },
}

impl SynthesisError {
    pub fn stage(&self) -> &SynthesisStage {
        match self {
            SynthesisError::Generation { stage, .. } => stage,
        }
    }
}

/// Turns per-task evidence into a cited [`Brief`].
///
/// Runs strictly in task order: rank and collapse each task's evidence,
/// cite and summarize each task, then one synthesis call across all
/// summaries. Any failed generation call aborts the run.
pub struct BriefAssembler<L: LLM> {
    llm: L,
    config: SynthesisConfig,
    scoring: ScoringEngine,
    dedup: Deduplicator,
    classifier: ClaimClassifier,
    policy: CallPolicy,
}

impl<L: LLM> BriefAssembler<L> {
    /// Creates an assembler with default scoring, dedup, and limits.
    pub fn new(llm: L) -> Self {
        let config = SynthesisConfig::default();
        Self {
            llm,
            dedup: Deduplicator::new(config.dedup_threshold),
            config,
            scoring: ScoringEngine::default(),
            classifier: ClaimClassifier::default()
                .with_timeout(CallPolicy::default().generation_timeout()),
            policy: CallPolicy::default(),
        }
    }

    /// Creates an assembler wired from the full configuration.
    pub fn from_config(llm: L, config: &Config) -> Self {
        Self::new(llm)
            .with_synthesis(config.synthesis.clone())
            .with_scoring(ScoringEngine::from_config(&config.scoring))
            .with_classifier(ClaimClassifier::from_config(&config.classifier))
            .with_policy(config.limits)
    }

    /// Replaces the synthesis settings, including the dedup threshold.
    pub fn with_synthesis(mut self, config: SynthesisConfig) -> Self {
        self.dedup = Deduplicator::new(config.dedup_threshold);
        self.config = config;
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringEngine) -> Self {
        self.scoring = scoring;
        self
    }

    /// The classifier's fallback calls share the generation timeout.
    pub fn with_classifier(mut self, classifier: ClaimClassifier) -> Self {
        self.classifier = classifier.with_timeout(self.policy.generation_timeout());
        self
    }

    pub fn with_policy(mut self, policy: CallPolicy) -> Self {
        self.policy = policy;
        self.classifier = self.classifier.with_timeout(policy.generation_timeout());
        self
    }

    /// Builds the brief for `query` from the ordered task evidence.
    pub async fn assemble(
        &self,
        query: &str,
        evidence: &[TaskEvidence],
    ) -> Result<Brief, SynthesisError> {
        let keywords = query_keywords(query, self.config.max_keywords);
        tracing::info!(tasks = evidence.len(), keywords = keywords.len(), "assembling brief");

        let ranked: Vec<(&Task, Vec<ResultRecord>)> = evidence
            .iter()
            .map(|item| (&item.task, self.rank(&item.results, &keywords)))
            .collect();

        let mut citations = CitationTable::new();
        let mut sections = Vec::with_capacity(ranked.len());
        let mut caveats = Vec::new();
        let mut bullet_records = Vec::new();

        for (index, (task, records)) in ranked.iter().enumerate() {
            let top = &records[..records.len().min(self.config.evidence_per_task)];
            for record in top {
                citations.register(record);
            }

            let bullet_sources = &top[..top.len().min(self.config.bullets_per_task)];
            let bullets = bullet_sources
                .iter()
                .map(|record| self.bullet(record, &citations))
                .collect();
            bullet_records.extend(bullet_sources.iter().cloned());

            let content = self.summarize(task, top).await?;
            if has_caveat(&content) {
                caveats.push(format!(
                    "Task {}: possible contradictions or uncertainties noted.",
                    task.id
                ));
            }

            sections.push(Section {
                order: index + 1,
                task_id: task.id.clone(),
                question: task.text.clone(),
                content,
                bullets,
            });
        }

        let conclusion = self.synthesize(query, &sections).await?;

        let claims = if self.config.classify_claims {
            Some(self.classifier.classify(&bullet_records, &self.llm).await)
        } else {
            None
        };

        tracing::info!(
            sections = sections.len(),
            citations = citations.len(),
            caveats = caveats.len(),
            "brief assembled"
        );

        Ok(Brief {
            query: query.to_string(),
            sections,
            conclusion,
            contradictions_and_uncertainties: caveats,
            citations: citations.into_citations(),
            claims,
        })
    }

    /// Scores and collapses the leading evidence of one task.
    fn rank(&self, results: &[ResultRecord], keywords: &[String]) -> Vec<ResultRecord> {
        let considered: Vec<ResultRecord> = results
            .iter()
            .take(self.config.evidence_per_task)
            .cloned()
            .collect();
        let scored = self.scoring.score(considered, keywords);
        self.dedup.deduplicate(scored)
    }

    fn bullet(&self, record: &ResultRecord, citations: &CitationTable) -> String {
        let id = citations.get(&record.url).unwrap_or_default();
        format!(
            "{} (cite:{}) — {}",
            record.title,
            id,
            truncate_chars(&record.snippet, self.config.snippet_chars)
        )
    }

    async fn summarize(&self, task: &Task, sources: &[ResultRecord]) -> Result<String, SynthesisError> {
        let prompt = build_summary_prompt(&task.text, sources);
        let params = GenerationParams::deterministic(self.config.summary_max_tokens);

        tracing::debug!(task = %task.id, sources = sources.len(), "summarizing task");
        let summary = generate_within(&self.llm, &prompt, &params, self.policy.generation_timeout())
            .await
            .map_err(|source| SynthesisError::Generation {
                stage: SynthesisStage::TaskSummary(task.id.clone()),
                source,
            })?;

        Ok(truncate_chars(&summary.text, self.config.section_chars).to_string())
    }

    async fn synthesize(&self, query: &str, sections: &[Section]) -> Result<String, SynthesisError> {
        let summaries: Vec<(&str, &str)> = sections
            .iter()
            .map(|s| (s.question.as_str(), s.content.as_str()))
            .collect();
        let prompt = build_synthesis_prompt(query, &summaries);
        let params = GenerationParams::deterministic(self.config.synthesis_max_tokens);

        tracing::debug!(sections = sections.len(), "synthesizing conclusion");
        let synthesis = generate_within(&self.llm, &prompt, &params, self.policy.generation_timeout())
            .await
            .map_err(|source| SynthesisError::Generation {
                stage: SynthesisStage::FinalSynthesis,
                source,
            })?;

        Ok(truncate_chars(synthesis.text.trim(), self.config.conclusion_chars).to_string())
    }
}

/// The first `max_keywords` whitespace-separated words of `query`.
pub fn query_keywords(query: &str, max_keywords: usize) -> Vec<String> {
    query
        .split_whitespace()
        .take(max_keywords)
        .map(str::to_string)
        .collect()
}

fn has_caveat(summary: &str) -> bool {
    let lower = summary.to_lowercase();
    CAVEAT_MARKERS.iter().any(|marker| lower.contains(marker))
}

use std::sync::Arc;

use thiserror::Error;

use crate::config::{CallPolicy, Config};
use crate::llm::{LLMError, Provider, LLM};
use crate::research::assembler::{BriefAssembler, SynthesisError};
use crate::research::brief::Brief;
use crate::research::decompose::TaskDecomposer;
use crate::search::{search_within, MockSearch, SearchBackend, SearchError, SearchProvider};
use crate::task::{Task, TaskEvidence};

/// Errors that can occur during a research run.
#[derive(Debug, Error)]
pub enum ResearchError {
    #[error("Synthesis error: {0}")]
    Synthesis(#[from] SynthesisError),

    #[error("Search provider error: {0}")]
    Search(#[from] SearchError),

    #[error("LLM provider error: {0}")]
    LLM(#[from] LLMError),
}

/// Runs a full research pass: decompose, retrieve, assemble.
///
/// Retrieval failures never abort a run; the task gets offline results
/// instead. Generation failures during assembly do.
pub struct ResearchAgent {
    decomposer: TaskDecomposer<Arc<dyn LLM>>,
    assembler: BriefAssembler<Arc<dyn LLM>>,
    search: Box<dyn SearchProvider>,
    fallback: MockSearch,
    results_per_task: usize,
    domain_filters: Vec<String>,
    policy: CallPolicy,
}

impl ResearchAgent {
    /// Creates an agent from explicit providers, taking every other
    /// setting from `config`.
    pub fn new(llm: Arc<dyn LLM>, search: Box<dyn SearchProvider>, config: &Config) -> Self {
        let policy = config.limits;
        Self {
            decomposer: TaskDecomposer::new(Arc::clone(&llm))
                .with_timeout(policy.generation_timeout()),
            assembler: BriefAssembler::from_config(llm, config),
            search,
            fallback: MockSearch::new(),
            results_per_task: config.search.results_per_task,
            domain_filters: config.search.domain_filters.clone(),
            policy,
        }
    }

    /// Builds both providers from configuration.
    ///
    /// Fails when a selected provider lacks credentials.
    pub fn from_config(config: &Config) -> Result<Self, ResearchError> {
        let llm: Arc<dyn LLM> = Arc::from(Provider::build_from_config(&config.llm)?);
        let search = SearchBackend::build_from_config(&config.search)?;
        tracing::debug!(
            llm = %config.llm.provider,
            search = %config.search.provider,
            "research agent configured"
        );
        Ok(Self::new(llm, search, config))
    }

    /// Researches `query` and returns the assembled brief.
    pub async fn run(&self, query: &str, structure_hint: Option<&str>) -> Result<Brief, ResearchError> {
        tracing::info!(query, "starting research run");

        let tasks = self.decomposer.decompose(query, structure_hint).await;
        let evidence = self.gather(tasks).await;
        let brief = self.assembler.assemble(query, &evidence).await?;

        Ok(brief)
    }

    /// Retrieves evidence for each task in order.
    pub async fn gather(&self, tasks: Vec<Task>) -> Vec<TaskEvidence> {
        let mut evidence = Vec::with_capacity(tasks.len());
        for task in tasks {
            let results = match search_within(
                self.search.as_ref(),
                &task.text,
                self.results_per_task,
                &self.domain_filters,
                self.policy.retrieval_timeout(),
            )
            .await
            {
                Ok(results) => {
                    tracing::debug!(task = %task.id, results = results.len(), "retrieved evidence");
                    results
                }
                Err(e) => {
                    tracing::warn!(task = %task.id, error = %e, "retrieval failed, using offline results");
                    self.fallback.results(&task.text, self.results_per_task)
                }
            };
            evidence.push(TaskEvidence::new(task, results));
        }
        evidence
    }
}

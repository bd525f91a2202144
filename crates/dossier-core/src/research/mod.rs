mod agent;
mod assembler;
mod brief;
mod classify;
mod decompose;
mod dedup;
pub mod prompts;
pub mod scoring;

pub use agent::{ResearchAgent, ResearchError};
pub use assembler::{query_keywords, BriefAssembler, CitationTable, SynthesisError, SynthesisStage};
pub use brief::{Brief, Citation, Section};
pub use classify::{parse_label, Claim, ClaimClassifier, ClaimKind, ClaimSet};
pub use decompose::{heuristic_tasks, parse_tasks, TaskDecomposer};
pub use dedup::Deduplicator;
pub use scoring::{ReliabilityTable, ScoreWeights, ScoringEngine};

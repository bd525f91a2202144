pub mod config;
pub mod llm;
pub mod record;
pub mod research;
pub mod search;
pub mod task;
pub mod text;

pub use config::Config;
pub use record::ResultRecord;
pub use research::{Brief, BriefAssembler, ResearchAgent};
pub use task::{Task, TaskEvidence};

use serde::{Deserialize, Serialize};

use crate::record::ResultRecord;

/// One decomposed research sub-question.
///
/// Created once by the decomposer and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier, unique within one decomposition (`t1`, `t2`, ...).
    pub id: String,
    /// The sub-question.
    #[serde(alias = "task")]
    pub text: String,
}

impl Task {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }

    /// Builds the positional id used for the `index`-th task (0-based).
    pub fn numbered(index: usize, text: impl Into<String>) -> Self {
        Self::new(format!("t{}", index + 1), text)
    }
}

/// A task paired with the raw evidence retrieved for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskEvidence {
    pub task: Task,
    pub results: Vec<ResultRecord>,
}

impl TaskEvidence {
    pub fn new(task: Task, results: Vec<ResultRecord>) -> Self {
        Self { task, results }
    }
}

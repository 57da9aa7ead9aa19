//! Error types for query result aggregation.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Phase {phase} is not tracked (tracked phases: {tracked:?})")]
    UntrackedPhase { phase: usize, tracked: Vec<usize> },
}

pub type Result<T> = std::result::Result<T, QueryError>;

//! Error kinds surfaced by a tally run

use std::io;
use thiserror::Error;

/// Errors raised by the word tally core
#[derive(Debug, Error)]
pub enum TallyError {
    /// The source could not be opened, or a read failed partway through.
    #[error("failed to read source '{source_name}': {source}")]
    SourceUnreadable {
        source_name: String,
        #[source]
        source: io::Error,
    },

    /// Worker count was zero or negative.
    #[error("invalid worker count {requested}: at least one worker is required")]
    InvalidConcurrency { requested: i64 },

    /// The bounded wait expired with jobs still pending.
    ///
    /// Never returned as `Err`; it is logged and carried in the report outcome.
    #[error("worker pool did not drain within {timeout_secs}s; {abandoned} line(s) abandoned")]
    PartialCompletion { abandoned: usize, timeout_secs: u64 },

    /// The OS refused to start a worker thread.
    #[error("failed to spawn worker thread: {0}")]
    WorkerSpawn(#[source] io::Error),
}

impl TallyError {
    /// Stable machine-readable code used in rendered error items
    pub fn code(&self) -> &'static str {
        match self {
            TallyError::SourceUnreadable { .. } => "SOURCE_UNREADABLE",
            TallyError::InvalidConcurrency { .. } => "INVALID_CONCURRENCY",
            TallyError::PartialCompletion { .. } => "PARTIAL_COMPLETION",
            TallyError::WorkerSpawn(_) => "WORKER_SPAWN",
        }
    }

    pub(crate) fn unreadable(source_name: impl Into<String>, source: io::Error) -> Self {
        TallyError::SourceUnreadable {
            source_name: source_name.into(),
            source,
        }
    }
}

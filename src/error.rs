//! Error types for cron operations.

use thiserror::Error;

/// Result type for cron operations.
pub type CronResult<T> = Result<T, CronError>;

/// Cron-specific errors.
#[derive(Debug, Error)]
pub enum CronError {
    /// Schedule expression did not have exactly 5 fields
    #[error("expected 5 cron fields in '{expression}', found {found}")]
    FieldCountMismatch { expression: String, found: usize },

    /// Schedule field was not a bare integer or the `*` wildcard
    #[error("invalid cron field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    /// Reserved alias name with no expansion
    #[error("schedule alias '{0}' is reserved and has no expansion")]
    ReservedAlias(String),

    /// Job not found
    #[error("job not found: {0}")]
    JobNotFound(String),

    /// Job already exists
    #[error("job already exists: {0}")]
    JobAlreadyExists(String),

    /// Job execution failed
    #[error("job execution failed: {0}")]
    ExecutionFailed(String),

    /// Scheduler not running
    #[error("scheduler not running")]
    SchedulerNotRunning,

    /// Scheduler already running
    #[error("scheduler already running")]
    SchedulerAlreadyRunning,
}

//! What a command hands back to its processor

use crate::LogEntry;

/// Outcome of one `Execute::execute` call
///
/// The variant decides what lands in the activity log:
/// - `Logged` for an applied mutation (add or delete), carrying its entry
/// - `Unlogged` for list and summary reads, which leave no trace
/// - `Failed` for a rejected call. Mutations attach an entry whose output is
///   `{"error": message}` so rejected attempts show up in the log as well;
///   reads pass `None`.
pub enum ExecutionResult<T, E> {
    Logged { value: T, log_entry: LogEntry },
    Unlogged { value: T },
    Failed {
        error: E,
        log_entry: Option<LogEntry>,
    },
}

impl<T, E> ExecutionResult<T, E> {
    /// Drop the log entry, keeping only the caller-facing outcome
    pub fn into_result(self) -> Result<T, E> {
        self.split().0
    }

    /// Separate the outcome from the entry a processor should record
    pub fn split(self) -> (Result<T, E>, Option<LogEntry>) {
        match self {
            Self::Logged { value, log_entry } => (Ok(value), Some(log_entry)),
            Self::Unlogged { value } => (Ok(value), None),
            Self::Failed { error, log_entry } => (Err(error), log_entry),
        }
    }
}

//! Operation processors run operations and record their log entries

use crate::Execute;
use async_trait::async_trait;
use serde_json::Value;

/// Runs operations against a context and takes care of logging
///
/// Implementations decide where log entries go (activity log, per-entity
/// logs) and may stamp them with an actor before storing.
#[async_trait]
pub trait OperationProcessor<C, E>: Send + Sync
where
    C: Send + Sync,
    E: Send,
{
    /// Execute the operation, record its log entry if any, return the outcome
    async fn process<O>(&self, operation: &O, ctx: &C) -> Result<Value, E>
    where
        O: Execute<C, E>;
}

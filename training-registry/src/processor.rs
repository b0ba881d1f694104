//! Operation processor that records activity on the context

use crate::context::RegistryContext;
use crate::error::{RegistryError, Result};
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use training_operations::{
    async_trait, Execute, ExecutionResult, LogEntry, Operation, OperationProcessor,
};

/// Runs registry operations and appends their log entries to the activity log
#[derive(Debug, Clone, Default)]
pub struct RegistryOperationProcessor {
    actor: Option<String>,
}

impl RegistryOperationProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute every logged entry to `actor`
    pub fn with_actor(actor: impl Into<String>) -> Self {
        Self {
            actor: Some(actor.into()),
        }
    }
}

#[async_trait]
impl OperationProcessor<RegistryContext, RegistryError> for RegistryOperationProcessor {
    async fn process<O>(&self, operation: &O, ctx: &RegistryContext) -> Result<Value>
    where
        O: Execute<RegistryContext, RegistryError>,
    {
        let (result, log_entry) = operation.execute(ctx).await.split();

        if let Some(mut entry) = log_entry {
            if let Some(actor) = &self.actor {
                entry = entry.with_actor(actor.clone());
            }
            ctx.append_activity(entry).await;
        }

        result
    }
}

/// Wrap a mutation's outcome, logging failures as well as successes
pub(crate) fn logged<O>(
    op: &O,
    started: Instant,
    result: Result<Value>,
) -> ExecutionResult<Value, RegistryError>
where
    O: Operation + Serialize,
{
    let input = serde_json::to_value(op).unwrap_or(Value::Null);
    let duration_ms = started.elapsed().as_millis() as u64;

    match result {
        Ok(value) => ExecutionResult::Logged {
            value: value.clone(),
            log_entry: LogEntry::new(op.op_string(), input, value, None, duration_ms),
        },
        Err(error) => {
            let error_msg = error.to_string();
            ExecutionResult::Failed {
                error,
                log_entry: Some(LogEntry::new(
                    op.op_string(),
                    input,
                    serde_json::json!({ "error": error_msg }),
                    None,
                    duration_ms,
                )),
            }
        }
    }
}

/// Wrap a read's outcome; reads are never logged
pub(crate) fn unlogged(result: Result<Value>) -> ExecutionResult<Value, RegistryError> {
    match result {
        Ok(value) => ExecutionResult::Unlogged { value },
        Err(error) => ExecutionResult::Failed {
            error,
            log_entry: None,
        },
    }
}

//! AddBatch command

use crate::context::RegistryContext;
use crate::error::RegistryError;
use crate::processor::logged;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use training_operations::{async_trait, operation, Execute, ExecutionResult, Operation};

/// Schedule a batch for a course
#[operation(
    verb = "add",
    noun = "batch",
    description = "Schedule a batch for a course without overlapping its other batches"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct AddBatch {
    /// The batch name (unique, case-insensitive)
    pub name: String,
    /// Course the batch belongs to
    pub course: String,
    /// Start time, HH:MM
    pub start: String,
    /// End time, HH:MM (exclusive)
    pub end: String,
}

impl AddBatch {
    pub fn new(
        name: impl Into<String>,
        course: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            course: course.into(),
            start: start.into(),
            end: end.into(),
        }
    }
}

#[async_trait]
impl Execute<RegistryContext, RegistryError> for AddBatch {
    async fn execute(&self, ctx: &RegistryContext) -> ExecutionResult<Value, RegistryError> {
        let started = Instant::now();

        let result = async {
            let batch = ctx
                .mutate(self.op_string(), |r| {
                    r.add_batch(&self.name, &self.course, &self.start, &self.end)
                })
                .await?;
            Ok::<_, RegistryError>(serde_json::to_value(&batch)?)
        }
        .await;

        logged(self, started, result)
    }
}

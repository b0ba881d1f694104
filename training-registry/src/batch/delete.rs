//! DeleteBatch command

use crate::context::RegistryContext;
use crate::error::RegistryError;
use crate::processor::logged;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use training_operations::{async_trait, operation, Execute, ExecutionResult, Operation};

/// Delete a batch and the students enrolled in it
#[operation(
    verb = "delete",
    noun = "batch",
    description = "Delete a batch and remove the students enrolled in it"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteBatch {
    /// The batch to delete
    pub name: String,
}

impl DeleteBatch {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl Execute<RegistryContext, RegistryError> for DeleteBatch {
    async fn execute(&self, ctx: &RegistryContext) -> ExecutionResult<Value, RegistryError> {
        let start = Instant::now();

        let result = ctx
            .mutate(self.op_string(), |r| r.delete_batch(&self.name))
            .await
            .map(|removal| {
                serde_json::json!({
                    "deleted": removal.deleted,
                    "name": self.name.trim(),
                    "students_removed": removal.students_removed,
                })
            });

        logged(self, start, result)
    }
}

//! DeleteStudent command

use crate::context::RegistryContext;
use crate::error::RegistryError;
use crate::processor::logged;
use crate::types::StudentId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use training_operations::{async_trait, operation, Execute, ExecutionResult, Operation};

/// Remove one student
#[operation(verb = "delete", noun = "student", description = "Remove a student by id")]
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteStudent {
    /// The student id
    pub id: StudentId,
}

impl DeleteStudent {
    pub fn new(id: impl Into<StudentId>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl Execute<RegistryContext, RegistryError> for DeleteStudent {
    async fn execute(&self, ctx: &RegistryContext) -> ExecutionResult<Value, RegistryError> {
        let start = Instant::now();

        let result = ctx
            .mutate(self.op_string(), |r| r.delete_student(&self.id))
            .await
            .map(|removal| {
                serde_json::json!({
                    "deleted": removal.deleted,
                    "id": self.id,
                })
            });

        logged(self, start, result)
    }
}

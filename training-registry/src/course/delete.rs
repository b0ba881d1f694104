//! DeleteCourse command

use crate::context::RegistryContext;
use crate::error::RegistryError;
use crate::processor::logged;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use training_operations::{async_trait, operation, Execute, ExecutionResult, Operation};

/// Delete a course along with its batches and enrolled students
#[operation(
    verb = "delete",
    noun = "course",
    description = "Delete a course with its batches and students"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteCourse {
    /// The course to delete
    pub name: String,
}

impl DeleteCourse {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl Execute<RegistryContext, RegistryError> for DeleteCourse {
    async fn execute(&self, ctx: &RegistryContext) -> ExecutionResult<Value, RegistryError> {
        let start = Instant::now();

        let result = ctx
            .mutate(self.op_string(), |r| r.delete_course(&self.name))
            .await
            .map(|removal| {
                serde_json::json!({
                    "deleted": removal.deleted,
                    "name": self.name.trim(),
                    "batches_removed": removal.batches_removed,
                    "students_removed": removal.students_removed,
                })
            });

        logged(self, start, result)
    }
}

//! DeleteSubject command

use crate::context::RegistryContext;
use crate::error::RegistryError;
use crate::processor::logged;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use training_operations::{async_trait, operation, Execute, ExecutionResult, Operation};

/// Delete a subject (removes it from all courses)
#[operation(
    verb = "delete",
    noun = "subject",
    description = "Delete a subject and remove it from every course"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteSubject {
    /// The subject to delete
    pub name: String,
}

impl DeleteSubject {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl Execute<RegistryContext, RegistryError> for DeleteSubject {
    async fn execute(&self, ctx: &RegistryContext) -> ExecutionResult<Value, RegistryError> {
        let start = Instant::now();

        let result = ctx
            .mutate(self.op_string(), |r| r.delete_subject(&self.name))
            .await
            .map(|removal| {
                serde_json::json!({
                    "deleted": removal.deleted,
                    "name": self.name.trim(),
                    "courses_updated": removal.courses_updated,
                })
            });

        logged(self, start, result)
    }
}

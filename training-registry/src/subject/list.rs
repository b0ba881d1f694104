//! ListSubjects command

use crate::context::RegistryContext;
use crate::error::RegistryError;
use crate::processor::unlogged;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use training_operations::{async_trait, operation, Execute, ExecutionResult};

/// List all subjects
#[operation(verb = "list", noun = "subjects", description = "List all subjects")]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ListSubjects {}

impl ListSubjects {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl Execute<RegistryContext, RegistryError> for ListSubjects {
    async fn execute(&self, ctx: &RegistryContext) -> ExecutionResult<Value, RegistryError> {
        let subjects = ctx
            .read(|r| r.subjects().cloned().collect::<Vec<_>>())
            .await;

        unlogged(Ok(serde_json::json!({
            "count": subjects.len(),
            "subjects": subjects,
        })))
    }
}

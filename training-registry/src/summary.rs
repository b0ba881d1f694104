//! GetSummary command: entity totals for the dashboard

use crate::context::RegistryContext;
use crate::error::RegistryError;
use crate::processor::unlogged;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use training_operations::{async_trait, operation, Execute, ExecutionResult};

/// Count subjects, courses, batches and students
#[operation(
    verb = "get",
    noun = "summary",
    description = "Total subjects, courses, batches and students"
)]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GetSummary {}

impl GetSummary {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl Execute<RegistryContext, RegistryError> for GetSummary {
    async fn execute(&self, ctx: &RegistryContext) -> ExecutionResult<Value, RegistryError> {
        let summary = ctx.read(|r| r.summary()).await;
        unlogged(serde_json::to_value(summary).map_err(RegistryError::from))
    }
}

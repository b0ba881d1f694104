//! ListCourses command

use crate::context::RegistryContext;
use crate::error::RegistryError;
use crate::processor::unlogged;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use training_operations::{async_trait, operation, Execute, ExecutionResult};

/// List all courses with their subjects
#[operation(verb = "list", noun = "courses", description = "List all courses")]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ListCourses {}

impl ListCourses {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl Execute<RegistryContext, RegistryError> for ListCourses {
    async fn execute(&self, ctx: &RegistryContext) -> ExecutionResult<Value, RegistryError> {
        let courses = ctx.read(|r| r.courses().cloned().collect::<Vec<_>>()).await;

        unlogged(Ok(serde_json::json!({
            "count": courses.len(),
            "courses": courses,
        })))
    }
}

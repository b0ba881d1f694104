//! AddStudent command

use crate::context::RegistryContext;
use crate::error::RegistryError;
use crate::processor::logged;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use training_operations::{async_trait, operation, Execute, ExecutionResult, Operation};

/// Enroll a student in a course and one of its batches
#[operation(
    verb = "add",
    noun = "student",
    description = "Enroll a student in a course and batch"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct AddStudent {
    /// Student name
    pub name: String,
    /// Course to enroll in
    pub course: String,
    /// Batch (section) within the course
    #[serde(alias = "batch")]
    pub section: String,
}

impl AddStudent {
    pub fn new(
        name: impl Into<String>,
        course: impl Into<String>,
        section: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            course: course.into(),
            section: section.into(),
        }
    }
}

#[async_trait]
impl Execute<RegistryContext, RegistryError> for AddStudent {
    async fn execute(&self, ctx: &RegistryContext) -> ExecutionResult<Value, RegistryError> {
        let start = Instant::now();

        let result = async {
            let student = ctx
                .mutate(self.op_string(), |r| {
                    r.add_student(&self.name, &self.course, &self.section)
                })
                .await?;
            Ok::<_, RegistryError>(serde_json::to_value(&student)?)
        }
        .await;

        logged(self, start, result)
    }
}

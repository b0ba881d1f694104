//! ListStudents command

use crate::context::RegistryContext;
use crate::error::RegistryError;
use crate::processor::unlogged;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use training_operations::{async_trait, operation, Execute, ExecutionResult};

/// List students, optionally only those of one course
#[operation(
    verb = "list",
    noun = "students",
    description = "List students, optionally filtered by course"
)]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ListStudents {
    /// Only students enrolled in this course
    pub course: Option<String>,
}

impl ListStudents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_course(course: impl Into<String>) -> Self {
        Self {
            course: Some(course.into()),
        }
    }
}

#[async_trait]
impl Execute<RegistryContext, RegistryError> for ListStudents {
    async fn execute(&self, ctx: &RegistryContext) -> ExecutionResult<Value, RegistryError> {
        let students = ctx
            .read(|r| match &self.course {
                Some(course) => r
                    .students_for_course(course)
                    .into_iter()
                    .cloned()
                    .collect::<Vec<_>>(),
                None => r.students().cloned().collect::<Vec<_>>(),
            })
            .await;

        unlogged(Ok(serde_json::json!({
            "count": students.len(),
            "students": students,
        })))
    }
}

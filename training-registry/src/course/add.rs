//! AddCourse command

use crate::context::RegistryContext;
use crate::error::RegistryError;
use crate::processor::logged;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use training_operations::{async_trait, operation, Execute, ExecutionResult, Operation};

/// Create a course from at least two existing subjects
#[operation(
    verb = "add",
    noun = "course",
    description = "Create a course bundling at least two subjects"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct AddCourse {
    /// The course name (unique, case-insensitive)
    pub name: String,
    /// Names of the subjects the course covers
    #[serde(default)]
    pub subjects: Vec<String>,
}

impl AddCourse {
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        subjects: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            subjects: subjects.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl Execute<RegistryContext, RegistryError> for AddCourse {
    async fn execute(&self, ctx: &RegistryContext) -> ExecutionResult<Value, RegistryError> {
        let start = Instant::now();

        let result = async {
            let course = ctx
                .mutate(self.op_string(), |r| r.add_course(&self.name, &self.subjects))
                .await?;
            Ok::<_, RegistryError>(serde_json::to_value(&course)?)
        }
        .await;

        logged(self, start, result)
    }
}

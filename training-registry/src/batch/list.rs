//! ListBatches command

use crate::context::RegistryContext;
use crate::error::RegistryError;
use crate::processor::unlogged;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use training_operations::{async_trait, operation, Execute, ExecutionResult};

/// List batches, optionally only those of one course
#[operation(
    verb = "list",
    noun = "batches",
    description = "List batches, optionally filtered by course"
)]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ListBatches {
    /// Only batches of this course
    pub course: Option<String>,
}

impl ListBatches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Batches of one course, for populating a section picker
    pub fn for_course(course: impl Into<String>) -> Self {
        Self {
            course: Some(course.into()),
        }
    }
}

#[async_trait]
impl Execute<RegistryContext, RegistryError> for ListBatches {
    async fn execute(&self, ctx: &RegistryContext) -> ExecutionResult<Value, RegistryError> {
        let batches = ctx
            .read(|r| match &self.course {
                Some(course) => r
                    .batches_for_course(course)
                    .into_iter()
                    .cloned()
                    .collect::<Vec<_>>(),
                None => r.batches().cloned().collect::<Vec<_>>(),
            })
            .await;

        unlogged(Ok(serde_json::json!({
            "count": batches.len(),
            "batches": batches,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::AddBatch;
    use crate::config::RegistryConfig;
    use crate::course::AddCourse;
    use crate::subject::AddSubject;

    #[tokio::test]
    async fn test_list_batches_for_course_keeps_insertion_order() {
        let ctx = RegistryContext::in_memory(&RegistryConfig::default()).await;
        for name in ["Math", "Physics", "Art"] {
            AddSubject::new(name).execute(&ctx).await.into_result().unwrap();
        }
        AddCourse::new("Sci", ["Math", "Physics"])
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        AddCourse::new("Arts", ["Art", "Physics"])
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        for (name, course, start, end) in [
            ("Late", "Sci", "15:00", "16:00"),
            ("Paint", "Arts", "09:00", "10:00"),
            ("Early", "Sci", "08:00", "09:00"),
        ] {
            AddBatch::new(name, course, start, end)
                .execute(&ctx)
                .await
                .into_result()
                .unwrap();
        }

        let all = ListBatches::new().execute(&ctx).await.into_result().unwrap();
        assert_eq!(all["count"], 3);

        let sci = ListBatches::for_course("sci")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(sci["count"], 2);
        assert_eq!(sci["batches"][0]["name"], "Late");
        assert_eq!(sci["batches"][1]["name"], "Early");
    }
}

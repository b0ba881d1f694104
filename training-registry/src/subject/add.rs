//! AddSubject command

use crate::context::RegistryContext;
use crate::error::RegistryError;
use crate::processor::logged;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use training_operations::{async_trait, operation, Execute, ExecutionResult, Operation};

/// Add a new subject
#[operation(verb = "add", noun = "subject", description = "Add a new subject")]
#[derive(Debug, Deserialize, Serialize)]
pub struct AddSubject {
    /// The subject name (unique, case-insensitive)
    pub name: String,
}

impl AddSubject {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl Execute<RegistryContext, RegistryError> for AddSubject {
    async fn execute(&self, ctx: &RegistryContext) -> ExecutionResult<Value, RegistryError> {
        let start = Instant::now();

        let result = async {
            let subject = ctx
                .mutate(self.op_string(), |r| r.add_subject(&self.name))
                .await?;
            Ok::<_, RegistryError>(serde_json::to_value(&subject)?)
        }
        .await;

        logged(self, start, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegistryConfig;
    use crate::error::ValidationError;

    #[tokio::test]
    async fn test_add_subject() {
        let ctx = RegistryContext::in_memory(&RegistryConfig::default()).await;

        let result = AddSubject::new(" Math ")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result, "Math");
        assert_eq!(ctx.read(|r| r.summary().subjects).await, 1);
    }

    #[tokio::test]
    async fn test_add_duplicate_subject_is_logged_as_failure() {
        let ctx = RegistryContext::in_memory(&RegistryConfig::default()).await;
        AddSubject::new("Math").execute(&ctx).await.into_result().unwrap();

        let (result, log_entry) = AddSubject::new("MATH").execute(&ctx).await.split();
        assert!(matches!(
            result,
            Err(RegistryError::Validation(ValidationError::DuplicateSubject { .. }))
        ));
        let log_entry = log_entry.unwrap();
        assert_eq!(log_entry.op, "add subject");
        assert_eq!(log_entry.input["name"], "MATH");
        assert_eq!(log_entry.output["error"], "Duplicate subject not allowed");
        assert_eq!(ctx.read(|r| r.summary().subjects).await, 1);
    }
}

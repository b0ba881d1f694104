//! The `Operation` metadata trait and the `Execute` trait

use crate::{ExecutionResult, ParamMeta};
use async_trait::async_trait;
use serde_json::Value;

/// Metadata every operation exposes, normally derived by `#[operation]`
pub trait Operation {
    /// Action word, e.g. "add"
    fn verb(&self) -> &'static str;

    /// Target entity, e.g. "subject"
    fn noun(&self) -> &'static str;

    /// Human readable summary
    fn description(&self) -> &'static str;

    /// Parameters in declaration order
    fn parameters(&self) -> &'static [ParamMeta];

    /// Canonical "verb noun" string used in logs and intents
    fn op_string(&self) -> String {
        format!("{} {}", self.verb(), self.noun())
    }
}

/// Run an operation against a context `C`, failing with `E`
#[async_trait]
pub trait Execute<C, E>: Operation + Send + Sync
where
    C: Send + Sync,
    E: Send,
{
    async fn execute(&self, ctx: &C) -> ExecutionResult<Value, E>;
}

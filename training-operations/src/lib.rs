//! # Training Operations
//!
//! This crate provides the `Operation` trait for defining registry operations.
//! Operations are structs where the fields ARE the parameters, so a form for an
//! operation can be rendered straight from its [`ParamMeta`] list.
//!
//! ## Example
//!
//! ```ignore
//! use training_operations::*;
//!
//! #[operation(verb = "add", noun = "subject", description = "Add a new subject")]
//! #[derive(Debug, Deserialize, Serialize)]
//! pub struct AddSubject {
//!     /// The subject name
//!     pub name: String,
//! }
//!
//! #[async_trait]
//! impl Execute<RegistryContext, RegistryError> for AddSubject {
//!     async fn execute(&self, ctx: &RegistryContext) -> ExecutionResult<Value, RegistryError> {
//!         // mutations return ExecutionResult::Logged, reads ExecutionResult::Unlogged
//!     }
//! }
//! ```

// Lets `#[operation]` expand to `::training_operations::...` inside this crate's own tests
extern crate self as training_operations;

mod execution_result;
mod log;
mod operation;
mod parameter;
mod processor;

pub use execution_result::ExecutionResult;
pub use log::LogEntry;
pub use operation::{Execute, Operation};
pub use parameter::{ParamMeta, ParamType};
pub use processor::OperationProcessor;

// Re-export proc macros
pub use training_operations_macros::operation;

// Re-export for use in implementations
pub use async_trait::async_trait;
pub use serde_json::Value;

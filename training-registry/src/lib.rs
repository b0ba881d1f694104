//! Training program registry with referential integrity
//!
//! This crate keeps subjects, courses, batches and students consistent with
//! each other in memory and persists each collection as one JSON document per
//! key between sessions.
//!
//! ## Overview
//!
//! - **Validate, then mutate** - every operation either applies completely or
//!   is rejected with a [`ValidationError`] whose message is shown verbatim
//! - **Cascading deletes** - removing a subject, course or batch never leaves a
//!   dangling reference behind
//! - **Half-open scheduling** - batches of one course may touch but not overlap
//!   on `[start, end)`
//! - **Fire-and-forget saves** - a background writer persists whatever a
//!   mutation changed; [`RegistryContext::flush`] waits for it
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use training_registry::{
//!     course::AddCourse, subject::AddSubject, Execute, RegistryConfig, RegistryContext,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RegistryConfig::load()?;
//! let ctx = RegistryContext::open_dir(&config).await;
//!
//! AddSubject::new("Math").execute(&ctx).await.into_result()?;
//! AddSubject::new("Physics").execute(&ctx).await.into_result()?;
//! let course = AddCourse::new("Sci", ["Math", "Physics"])
//!     .execute(&ctx)
//!     .await
//!     .into_result()?;
//!
//! println!("Created course: {}", course["name"]);
//! ctx.flush().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Storage Layout
//!
//! ```text
//! .training/
//! ├── training.toml     # optional config
//! ├── subjects.json     # ["Math", "Physics"]
//! ├── courses.json      # [{"name": "Sci", "subjects": [...]}]
//! ├── batches.json      # [{"name": "A", "course": "Sci", "start": "09:00", "end": "10:00"}]
//! └── students.json     # [{"id": "...", "name": "Ann", "course": "Sci", "batch": "A"}]
//! ```

pub mod config;
mod context;
mod error;
pub mod parse;
mod processor;
mod registry;
pub mod store;
pub mod types;
mod writer;

// Command modules
pub mod batch;
pub mod course;
pub mod student;
pub mod subject;
pub mod summary;

// Re-export Execute trait and types from operations crate
pub use training_operations::{
    async_trait, Execute, ExecutionResult, LogEntry, Operation, OperationProcessor,
};

pub use config::{MissingDeletePolicy, RegistryConfig, RegistryPolicy, SectionPolicy};
pub use context::{RegistryContext, RegistryEvent};
pub use error::{RegistryError, Result, ValidationError};
pub use processor::RegistryOperationProcessor;
pub use registry::{Registry, Removal, Snapshot, Summary, MIN_COURSE_SUBJECTS};
pub use store::{load_snapshot, JsonFileStore, MemoryStore, SnapshotStore};

// Re-export commonly used types
pub use types::{
    Batch, ClockTime, Collection, Course, NameKey, Student, StudentId, Subject, TimeSlot,
};

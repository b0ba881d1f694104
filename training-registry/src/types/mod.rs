//! Core types for the training registry

mod entities;
mod ids;
mod name;
mod schedule;

// Re-export all types
pub use entities::{Batch, Collection, Course, Student, Subject};
pub use ids::StudentId;
pub use name::{non_blank, NameKey};
pub use schedule::{ClockTime, TimeSlot};

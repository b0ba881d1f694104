//! Error types for the training registry

use crate::registry::MIN_COURSE_SUBJECTS;
use thiserror::Error;

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// A rejected mutation. The `Display` text is meant to be shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Subject name required")]
    SubjectNameRequired,

    #[error("Duplicate subject not allowed")]
    DuplicateSubject { name: String },

    #[error("Course name required")]
    CourseNameRequired,

    /// Fewer subjects exist system-wide than a course needs
    #[error("Create at least {} subjects first", MIN_COURSE_SUBJECTS)]
    NotEnoughSubjects { available: usize },

    /// Fewer subjects selected than a course needs
    #[error("Minimum {} subjects required", MIN_COURSE_SUBJECTS)]
    TooFewSubjectsSelected { selected: usize },

    #[error("Duplicate course name")]
    DuplicateCourse { name: String },

    #[error("Unknown subject: {name}")]
    UnknownSubject { name: String },

    #[error("Unknown course: {name}")]
    UnknownCourse { name: String },

    /// A required batch or student field was blank
    #[error("All fields required")]
    MissingFields,

    #[error("Invalid time: {value}")]
    InvalidTime { value: String },

    #[error("Start time must be before end time")]
    StartNotBeforeEnd,

    #[error("Batch timing overlaps")]
    Overlap { existing: String },

    #[error("Duplicate batch name")]
    DuplicateBatch { name: String },

    #[error("Batch {batch} does not belong to course {course}")]
    SectionNotInCourse { batch: String, course: String },
}

/// Errors that can occur in registry operations
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Input rejected before any mutation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Delete target missing (only under the strict delete policy)
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    /// Intent could not be parsed
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Configuration could not be extracted
    #[error("configuration error: {source}")]
    Config {
        #[from]
        source: figment::Error,
    },

    /// The background persistence task is gone
    #[error("persistence writer stopped")]
    WriterClosed,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RegistryError {
    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// The validation failure, if this is one
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.as_validation().is_some()
    }
}

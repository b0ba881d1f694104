//! Entity records: Subject, Course, Batch, Student
//!
//! These are also the persisted shapes, one JSON array per collection.

use super::ids::StudentId;
use super::name::NameKey;
use super::schedule::{ClockTime, TimeSlot};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An atomic unit of curriculum content. Stored as a bare string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Subject {
    pub name: String,
}

impl Subject {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn key(&self) -> NameKey {
        NameKey::of(&self.name)
    }
}

/// A named bundle of subjects
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Course {
    pub name: String,
    #[serde(default)]
    pub subjects: Vec<String>,
}

impl Course {
    pub fn new(name: impl Into<String>, subjects: Vec<String>) -> Self {
        Self {
            name: name.into(),
            subjects,
        }
    }

    pub fn key(&self) -> NameKey {
        NameKey::of(&self.name)
    }

    pub fn has_subject(&self, subject: &NameKey) -> bool {
        self.subjects.iter().any(|s| subject.matches(s))
    }
}

/// A scheduled time slot under one course
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Batch {
    pub name: String,
    pub course: String,
    pub start: ClockTime,
    pub end: ClockTime,
}

impl Batch {
    pub fn key(&self) -> NameKey {
        NameKey::of(&self.name)
    }

    pub fn course_key(&self) -> NameKey {
        NameKey::of(&self.course)
    }

    /// `None` only for records loaded with `start >= end`
    pub fn slot(&self) -> Option<TimeSlot> {
        TimeSlot::new(self.start, self.end)
    }
}

/// An enrollee in one course and one section (batch)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Student {
    #[serde(default)]
    pub id: StudentId,
    pub name: String,
    pub course: String,
    /// Section reference. Persisted as `batch`.
    #[serde(rename = "batch")]
    pub section: String,
}

impl Student {
    pub fn new(
        name: impl Into<String>,
        course: impl Into<String>,
        section: impl Into<String>,
    ) -> Self {
        Self {
            id: StudentId::new(),
            name: name.into(),
            course: course.into(),
            section: section.into(),
        }
    }

    pub fn course_key(&self) -> NameKey {
        NameKey::of(&self.course)
    }

    pub fn section_key(&self) -> NameKey {
        NameKey::of(&self.section)
    }
}

/// The four persisted collections, each under its own storage key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Subjects,
    Courses,
    Batches,
    Students,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Subjects,
        Collection::Courses,
        Collection::Batches,
        Collection::Students,
    ];

    /// Storage key
    pub fn key(&self) -> &'static str {
        match self {
            Self::Subjects => "subjects",
            Self::Courses => "courses",
            Self::Batches => "batches",
            Self::Students => "students",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

//! The in-memory registry and its integrity rules
//!
//! `Registry` owns the four collections and is the only thing that mutates
//! them. Every mutating method validates its input completely before touching
//! any collection, so a rejected call leaves the registry exactly as it was.
//! Successful mutations record which collections changed; the context drains
//! that set with [`Registry::take_changes`] to decide what to persist.

use crate::config::{MissingDeletePolicy, RegistryPolicy, SectionPolicy};
use crate::error::{RegistryError, Result, ValidationError};
use crate::types::{
    non_blank, Batch, ClockTime, Collection, Course, NameKey, Student, StudentId, Subject,
    TimeSlot,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Fewest subjects a course may be created with
pub const MIN_COURSE_SUBJECTS: usize = 2;

/// A full copy of the registry contents, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub subjects: Vec<Subject>,
    pub courses: Vec<Course>,
    pub batches: Vec<Batch>,
    pub students: Vec<Student>,
}

/// Entity totals, as shown on the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub subjects: usize,
    pub courses: usize,
    pub batches: usize,
    pub students: usize,
}

/// What a delete removed, including its cascade
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Removal {
    pub deleted: bool,
    /// Courses that lost a subject
    pub courses_updated: usize,
    pub batches_removed: usize,
    pub students_removed: usize,
}

impl Removal {
    fn none() -> Self {
        Self::default()
    }
}

/// Subjects, courses, batches and students kept mutually consistent
#[derive(Debug, Clone, Default)]
pub struct Registry {
    subjects: IndexMap<NameKey, Subject>,
    courses: IndexMap<NameKey, Course>,
    batches: IndexMap<NameKey, Batch>,
    students: Vec<Student>,
    policy: RegistryPolicy,
    changed: BTreeSet<Collection>,
}

impl Registry {
    pub fn new(policy: RegistryPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Rebuild from persisted collections
    ///
    /// Stored data is trusted for ordering but not for integrity. Duplicate
    /// names keep their first occurrence. Records pointing at a course that no
    /// longer exists are dropped, as are batches with an empty or overlapping
    /// slot. The active policy is applied too: unknown course subjects are
    /// stripped and students outside their course's batches are dropped.
    /// Anything repaired is logged and marks its collection changed so the
    /// cleaned state gets saved.
    pub fn from_snapshot(snapshot: Snapshot, policy: RegistryPolicy) -> Self {
        let mut registry = Self::new(policy);

        for subject in snapshot.subjects {
            let Some(name) = non_blank(&subject.name) else {
                warn!("Dropping stored subject with a blank name");
                registry.mark(Collection::Subjects);
                continue;
            };
            let key = NameKey::of(name);
            if registry.subjects.contains_key(&key) {
                warn!(subject = %name, "Dropping duplicate stored subject");
                registry.mark(Collection::Subjects);
                continue;
            }
            registry.subjects.insert(key, Subject::new(name));
        }

        for mut course in snapshot.courses {
            let key = course.key();
            if key.as_str().is_empty() || registry.courses.contains_key(&key) {
                warn!(course = %course.name, "Dropping blank or duplicate stored course");
                registry.mark(Collection::Courses);
                continue;
            }
            if registry.policy.require_known_subjects {
                let resolved = registry.known_subjects(&course.subjects);
                if resolved != course.subjects {
                    warn!(course = %course.name, stored = ?course.subjects, kept = ?resolved, "Repairing stored course subjects");
                    course.subjects = resolved;
                    registry.mark(Collection::Courses);
                }
            }
            registry.courses.insert(key, course);
        }

        for batch in snapshot.batches {
            let key = batch.key();
            if key.as_str().is_empty() || registry.batches.contains_key(&key) {
                warn!(batch = %batch.name, "Dropping blank or duplicate stored batch");
                registry.mark(Collection::Batches);
                continue;
            }
            if !registry.courses.contains_key(&batch.course_key()) {
                warn!(batch = %batch.name, course = %batch.course, "Dropping stored batch of unknown course");
                registry.mark(Collection::Batches);
                continue;
            }
            let Some(slot) = batch.slot() else {
                warn!(batch = %batch.name, start = %batch.start, end = %batch.end, "Dropping stored batch that does not start before it ends");
                registry.mark(Collection::Batches);
                continue;
            };
            if let Some(existing) = registry.overlapping(&batch.course_key(), &slot) {
                warn!(batch = %batch.name, existing = %existing.name, "Dropping stored batch that overlaps another");
                registry.mark(Collection::Batches);
                continue;
            }
            registry.batches.insert(key, batch);
        }

        for mut student in snapshot.students {
            let course_key = student.course_key();
            if !registry.courses.contains_key(&course_key) {
                warn!(student = %student.name, course = %student.course, "Dropping stored student of unknown course");
                registry.mark(Collection::Students);
                continue;
            }
            if registry.policy.sections == SectionPolicy::Batch {
                let Some(batch) = registry.section_batch(&course_key, &student.section) else {
                    warn!(student = %student.name, batch = %student.section, "Dropping stored student outside the course's batches");
                    registry.mark(Collection::Students);
                    continue;
                };
                if batch.name != student.section {
                    student.section = batch.name.clone();
                    registry.mark(Collection::Students);
                }
            }
            registry.students.push(student);
        }

        debug!(summary = ?registry.summary(), "Registry rebuilt from snapshot");
        registry
    }

    /// Canonical spellings of the named subjects that exist, repeats collapsed
    fn known_subjects(&self, names: &[String]) -> Vec<String> {
        let mut known: Vec<String> = Vec::new();
        for name in names {
            if let Some(subject) = self.subjects.get(&NameKey::of(name)) {
                if !known.contains(&subject.name) {
                    known.push(subject.name.clone());
                }
            }
        }
        known
    }

    /// First batch of the course whose slot overlaps `slot`
    fn overlapping(&self, course_key: &NameKey, slot: &TimeSlot) -> Option<&Batch> {
        self.batches.values().find(|b| {
            &b.course_key() == course_key && b.slot().is_some_and(|other| other.overlaps(slot))
        })
    }

    /// The batch named `section`, if it belongs to the course
    fn section_batch(&self, course_key: &NameKey, section: &str) -> Option<&Batch> {
        self.batches
            .get(&NameKey::of(section))
            .filter(|batch| &batch.course_key() == course_key)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn subjects(&self) -> impl Iterator<Item = &Subject> {
        self.subjects.values()
    }

    pub fn courses(&self) -> impl Iterator<Item = &Course> {
        self.courses.values()
    }

    pub fn batches(&self) -> impl Iterator<Item = &Batch> {
        self.batches.values()
    }

    pub fn students(&self) -> impl Iterator<Item = &Student> {
        self.students.iter()
    }

    pub fn subject(&self, name: &str) -> Option<&Subject> {
        self.subjects.get(&NameKey::of(name))
    }

    pub fn course(&self, name: &str) -> Option<&Course> {
        self.courses.get(&NameKey::of(name))
    }

    pub fn batch(&self, name: &str) -> Option<&Batch> {
        self.batches.get(&NameKey::of(name))
    }

    pub fn student(&self, id: &StudentId) -> Option<&Student> {
        self.students.iter().find(|s| &s.id == id)
    }

    /// Batches of one course, in insertion order
    pub fn batches_for_course(&self, course: &str) -> Vec<&Batch> {
        let key = NameKey::of(course);
        self.batches
            .values()
            .filter(|b| b.course_key() == key)
            .collect()
    }

    /// Students enrolled in one course, in insertion order
    pub fn students_for_course(&self, course: &str) -> Vec<&Student> {
        let key = NameKey::of(course);
        self.students
            .iter()
            .filter(|s| s.course_key() == key)
            .collect()
    }

    pub fn summary(&self) -> Summary {
        Summary {
            subjects: self.subjects.len(),
            courses: self.courses.len(),
            batches: self.batches.len(),
            students: self.students.len(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            subjects: self.subjects.values().cloned().collect(),
            courses: self.courses.values().cloned().collect(),
            batches: self.batches.values().cloned().collect(),
            students: self.students.clone(),
        }
    }

    /// Serialize one collection in its persisted shape
    pub fn encode(&self, collection: Collection) -> Result<String> {
        let json = match collection {
            Collection::Subjects => {
                serde_json::to_string_pretty(&self.subjects.values().collect::<Vec<_>>())?
            }
            Collection::Courses => {
                serde_json::to_string_pretty(&self.courses.values().collect::<Vec<_>>())?
            }
            Collection::Batches => {
                serde_json::to_string_pretty(&self.batches.values().collect::<Vec<_>>())?
            }
            Collection::Students => serde_json::to_string_pretty(&self.students)?,
        };
        Ok(json)
    }

    /// Collections changed since the last call, in `Collection` order
    pub fn take_changes(&mut self) -> Vec<Collection> {
        std::mem::take(&mut self.changed).into_iter().collect()
    }

    fn mark(&mut self, collection: Collection) {
        self.changed.insert(collection);
    }

    fn missing(&self, kind: &'static str, name: &str) -> Result<Removal> {
        match self.policy.missing_delete {
            MissingDeletePolicy::Ignore => {
                debug!(kind, name, "Delete target not found, nothing to do");
                Ok(Removal::none())
            }
            MissingDeletePolicy::Error => Err(RegistryError::not_found(kind, name)),
        }
    }

    // =========================================================================
    // Subjects
    // =========================================================================

    pub fn add_subject(&mut self, name: &str) -> Result<Subject> {
        let name = non_blank(name).ok_or(ValidationError::SubjectNameRequired)?;
        let key = NameKey::of(name);
        if self.subjects.contains_key(&key) {
            return Err(ValidationError::DuplicateSubject { name: name.into() }.into());
        }

        let subject = Subject::new(name);
        self.subjects.insert(key, subject.clone());
        self.mark(Collection::Subjects);
        debug!(subject = %subject.name, "Added subject");
        Ok(subject)
    }

    /// Remove a subject and strip it from every course
    ///
    /// Courses are kept even when this leaves them with fewer than
    /// [`MIN_COURSE_SUBJECTS`] subjects.
    pub fn delete_subject(&mut self, name: &str) -> Result<Removal> {
        let key = NameKey::of(name);
        if self.subjects.shift_remove(&key).is_none() {
            return self.missing("subject", name);
        }
        self.mark(Collection::Subjects);

        let mut removal = Removal {
            deleted: true,
            ..Removal::none()
        };
        for course in self.courses.values_mut().filter(|c| c.has_subject(&key)) {
            course.subjects.retain(|s| !key.matches(s));
            removal.courses_updated += 1;
        }
        if removal.courses_updated > 0 {
            self.mark(Collection::Courses);
        }

        debug!(subject = %key, ?removal, "Deleted subject");
        Ok(removal)
    }

    // =========================================================================
    // Courses
    // =========================================================================

    pub fn add_course(&mut self, name: &str, subjects: &[String]) -> Result<Course> {
        let name = non_blank(name).ok_or(ValidationError::CourseNameRequired)?;
        if self.subjects.len() < MIN_COURSE_SUBJECTS {
            return Err(ValidationError::NotEnoughSubjects {
                available: self.subjects.len(),
            }
            .into());
        }

        // Collapse blanks and repeats so two spellings of one subject count once
        let mut selected: IndexMap<NameKey, String> = IndexMap::new();
        for subject in subjects.iter().filter_map(|s| non_blank(s)) {
            selected
                .entry(NameKey::of(subject))
                .or_insert_with(|| subject.to_string());
        }
        if selected.len() < MIN_COURSE_SUBJECTS {
            return Err(ValidationError::TooFewSubjectsSelected {
                selected: selected.len(),
            }
            .into());
        }

        let key = NameKey::of(name);
        if self.courses.contains_key(&key) {
            return Err(ValidationError::DuplicateCourse { name: name.into() }.into());
        }

        let subjects = if self.policy.require_known_subjects {
            selected
                .iter()
                .map(|(key, raw)| {
                    self.subjects
                        .get(key)
                        .map(|s| s.name.clone())
                        .ok_or_else(|| ValidationError::UnknownSubject { name: raw.clone() })
                })
                .collect::<std::result::Result<Vec<_>, _>>()?
        } else {
            selected.into_values().collect()
        };

        let course = Course::new(name, subjects);
        self.courses.insert(key, course.clone());
        self.mark(Collection::Courses);
        debug!(course = %course.name, subjects = ?course.subjects, "Added course");
        Ok(course)
    }

    /// Remove a course with all of its batches and students
    pub fn delete_course(&mut self, name: &str) -> Result<Removal> {
        let key = NameKey::of(name);
        if self.courses.shift_remove(&key).is_none() {
            return self.missing("course", name);
        }
        self.mark(Collection::Courses);

        let batches_before = self.batches.len();
        self.batches.retain(|_, b| b.course_key() != key);
        let students_before = self.students.len();
        self.students.retain(|s| s.course_key() != key);

        let removal = Removal {
            deleted: true,
            courses_updated: 0,
            batches_removed: batches_before - self.batches.len(),
            students_removed: students_before - self.students.len(),
        };
        if removal.batches_removed > 0 {
            self.mark(Collection::Batches);
        }
        if removal.students_removed > 0 {
            self.mark(Collection::Students);
        }

        debug!(course = %key, ?removal, "Deleted course");
        Ok(removal)
    }

    // =========================================================================
    // Batches
    // =========================================================================

    pub fn add_batch(&mut self, name: &str, course: &str, start: &str, end: &str) -> Result<Batch> {
        let (Some(name), Some(course), Some(start), Some(end)) = (
            non_blank(name),
            non_blank(course),
            non_blank(start),
            non_blank(end),
        ) else {
            return Err(ValidationError::MissingFields.into());
        };

        let start = parse_time(start)?;
        let end = parse_time(end)?;
        let slot = TimeSlot::new(start, end).ok_or(ValidationError::StartNotBeforeEnd)?;

        let course = self
            .courses
            .get(&NameKey::of(course))
            .ok_or_else(|| ValidationError::UnknownCourse {
                name: course.into(),
            })?;
        let course_key = course.key();

        let key = NameKey::of(name);
        if self.batches.contains_key(&key) {
            return Err(ValidationError::DuplicateBatch { name: name.into() }.into());
        }

        if let Some(existing) = self.overlapping(&course_key, &slot) {
            return Err(ValidationError::Overlap {
                existing: existing.name.clone(),
            }
            .into());
        }

        let batch = Batch {
            name: name.into(),
            course: course.name.clone(),
            start,
            end,
        };
        self.batches.insert(key, batch.clone());
        self.mark(Collection::Batches);
        debug!(batch = %batch.name, course = %batch.course, start = %start, end = %end, "Added batch");
        Ok(batch)
    }

    /// Remove a batch and every student whose section names it
    pub fn delete_batch(&mut self, name: &str) -> Result<Removal> {
        let key = NameKey::of(name);
        if self.batches.shift_remove(&key).is_none() {
            return self.missing("batch", name);
        }
        self.mark(Collection::Batches);

        let students_before = self.students.len();
        self.students.retain(|s| s.section_key() != key);
        let removal = Removal {
            deleted: true,
            students_removed: students_before - self.students.len(),
            ..Removal::none()
        };
        if removal.students_removed > 0 {
            self.mark(Collection::Students);
        }

        debug!(batch = %key, ?removal, "Deleted batch");
        Ok(removal)
    }

    // =========================================================================
    // Students
    // =========================================================================

    pub fn add_student(&mut self, name: &str, course: &str, section: &str) -> Result<Student> {
        let (Some(name), Some(course), Some(section)) =
            (non_blank(name), non_blank(course), non_blank(section))
        else {
            return Err(ValidationError::MissingFields.into());
        };

        let course = self
            .courses
            .get(&NameKey::of(course))
            .ok_or_else(|| ValidationError::UnknownCourse {
                name: course.into(),
            })?;

        let section = match self.policy.sections {
            SectionPolicy::Loose => section.to_string(),
            SectionPolicy::Batch => match self.section_batch(&course.key(), section) {
                Some(batch) => batch.name.clone(),
                None => {
                    return Err(ValidationError::SectionNotInCourse {
                        batch: section.into(),
                        course: course.name.clone(),
                    }
                    .into())
                }
            },
        };

        let student = Student::new(name, course.name.clone(), section);
        self.students.push(student.clone());
        self.mark(Collection::Students);
        debug!(student = %student.name, id = %student.id, course = %student.course, "Added student");
        Ok(student)
    }

    pub fn delete_student(&mut self, id: &StudentId) -> Result<Removal> {
        let before = self.students.len();
        self.students.retain(|s| &s.id != id);
        if self.students.len() == before {
            return self.missing("student", id.as_str());
        }
        self.mark(Collection::Students);

        debug!(student = %id, "Deleted student");
        Ok(Removal {
            deleted: true,
            students_removed: 1,
            ..Removal::none()
        })
    }
}

fn parse_time(raw: &str) -> Result<ClockTime> {
    raw.parse::<ClockTime>().map_err(|_| {
        ValidationError::InvalidTime {
            value: raw.to_string(),
        }
        .into()
    })
}

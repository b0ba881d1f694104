//! Name normalization
//!
//! Subjects, courses and batches are identified by name, compared
//! case-insensitively after trimming. The stored name keeps the spelling it
//! was first entered with.

use std::fmt;

/// Normalized identity of a named entity: trimmed and lowercased
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NameKey(String);

impl NameKey {
    pub fn of(name: &str) -> Self {
        Self(name.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `name` normalizes to this key
    pub fn matches(&self, name: &str) -> bool {
        *self == Self::of(name)
    }
}

impl fmt::Display for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trim `input`, returning `None` when nothing is left
pub fn non_blank(input: &str) -> Option<&str> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

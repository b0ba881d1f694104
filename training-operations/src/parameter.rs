//! Parameter metadata for form rendering
//!
//! This metadata is derived from struct fields, not duplicated.

use serde::Serialize;

/// Parameter type for schema generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Boolean,
    Array,
}

/// Metadata about a parameter - derived from struct fields
#[derive(Debug, Clone, Serialize)]
pub struct ParamMeta {
    /// Field name
    pub name: &'static str,
    /// Description (from doc comment)
    pub description: &'static str,
    /// Parameter type
    #[serde(rename = "type")]
    pub param_type: ParamType,
    /// Whether required (non-Option field without a serde default)
    pub required: bool,
}

impl ParamMeta {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            description: "",
            param_type: ParamType::String,
            required: false,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn description(mut self, desc: &'static str) -> Self {
        self.description = desc;
        self
    }

    pub const fn param_type(mut self, t: ParamType) -> Self {
        self.param_type = t;
        self
    }
}

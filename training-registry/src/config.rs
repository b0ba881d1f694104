//! Registry configuration loaded with figment
//!
//! Sources, later ones override earlier ones:
//! 1. Built-in defaults
//! 2. `training.toml`, `training.yaml`, `training.json` in the data directory
//! 3. `TRAINING_`-prefixed environment variables, `__` separating nested keys
//!    (e.g. `TRAINING_POLICY__SECTIONS=loose`)

use crate::error::Result;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default directory for the JSON file store
pub const DEFAULT_DATA_DIR: &str = ".training";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "TRAINING_";

/// How a student's section reference is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionPolicy {
    /// Must name an existing batch of the student's course
    #[default]
    Batch,
    /// Any non-blank value is accepted
    Loose,
}

/// What deleting a missing entity does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingDeletePolicy {
    /// Silent no-op, reported as `deleted: false`
    #[default]
    Ignore,
    /// Fails with `RegistryError::NotFound`
    Error,
}

/// Which integrity checks beyond the core rules are enforced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryPolicy {
    /// Courses may only reference subjects that exist
    pub require_known_subjects: bool,
    pub sections: SectionPolicy,
    pub missing_delete: MissingDeletePolicy,
}

impl Default for RegistryPolicy {
    fn default() -> Self {
        Self {
            require_known_subjects: true,
            sections: SectionPolicy::default(),
            missing_delete: MissingDeletePolicy::default(),
        }
    }
}

impl RegistryPolicy {
    /// No subject or section checks; missing deletes are ignored
    pub fn permissive() -> Self {
        Self {
            require_known_subjects: false,
            sections: SectionPolicy::Loose,
            missing_delete: MissingDeletePolicy::Ignore,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Where `JsonFileStore` keeps one file per collection
    pub data_dir: PathBuf,
    /// Activity entries kept in memory
    pub activity_limit: usize,
    pub policy: RegistryPolicy,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            activity_limit: 500,
            policy: RegistryPolicy::default(),
        }
    }
}

impl RegistryConfig {
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_policy(mut self, policy: RegistryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Load from the default data directory
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_DATA_DIR)
    }

    /// Load using config files found in `data_dir`
    pub fn load_from(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        debug!("Loading registry configuration from {}", data_dir.display());

        let config: Self = Self::figment(data_dir).extract()?;
        debug!(
            data_dir = %config.data_dir.display(),
            activity_limit = config.activity_limit,
            "Registry configuration loaded"
        );
        Ok(config)
    }

    /// Build the layered figment without extracting it
    pub fn figment(data_dir: &Path) -> Figment {
        let defaults = Self::default().with_data_dir(data_dir);

        Figment::new()
            .merge(Serialized::defaults(defaults))
            .merge(Toml::file(data_dir.join("training.toml")))
            .merge(Yaml::file(data_dir.join("training.yaml")))
            .merge(Json::file(data_dir.join("training.json")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

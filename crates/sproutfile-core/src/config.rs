//! Materialization configuration types.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// What to do when a file already exists where a leaf is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExistingFilePolicy {
    /// Truncate and rewrite the file with the declared payload.
    #[default]
    Overwrite,
    /// Leave the existing file and its content untouched.
    Keep,
    /// Abort with a path conflict.
    Fail,
}

impl std::fmt::Display for ExistingFilePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overwrite => write!(f, "overwrite"),
            Self::Keep => write!(f, "keep"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

/// Configuration for materialization runs.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, PartialEq, Eq)]
#[builder(setter(into))]
pub struct MaterializeConfig {
    /// Policy for files that already exist.
    #[builder(default)]
    #[serde(default)]
    pub existing_files: ExistingFilePolicy,

    /// Create missing ancestors of the base path.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub create_parents: bool,

    /// Flush every written file to stable storage before closing it.
    #[builder(default = "false")]
    #[serde(default)]
    pub sync_files: bool,
}

fn default_true() -> bool {
    true
}

impl MaterializeConfig {
    /// Create a new config builder.
    pub fn builder() -> MaterializeConfigBuilder {
        MaterializeConfigBuilder::default()
    }

    /// Create a config with default settings.
    pub fn new() -> Self {
        Self {
            existing_files: ExistingFilePolicy::Overwrite,
            create_parents: true,
            sync_files: false,
        }
    }
}

impl Default for MaterializeConfig {
    fn default() -> Self {
        Self::new()
    }
}

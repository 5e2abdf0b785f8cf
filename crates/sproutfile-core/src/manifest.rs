//! Loading tree descriptions from TOML and JSON manifests.
//!
//! A table (object) is a directory and a string is a file whose content is
//! the string's UTF-8 bytes. Keys keep their document order.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ManifestError;
use crate::node::Container;
use crate::tree::Tree;

/// Supported manifest formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManifestFormat {
    Toml,
    Json,
}

impl ManifestFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// A parsed tree description without a base location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    root: Container,
}

impl Manifest {
    /// Parse a manifest from a string.
    pub fn parse(content: &str, format: ManifestFormat) -> Result<Self, ManifestError> {
        let root = match format {
            ManifestFormat::Toml => toml::from_str::<Container>(content)?,
            ManifestFormat::Json => serde_json::from_str::<Container>(content)?,
        };
        Ok(Self { root })
    }

    /// Read and parse a manifest file, choosing the format by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let format = ManifestFormat::from_path(path).ok_or_else(|| {
            ManifestError::UnsupportedFormat {
                path: path.to_path_buf(),
            }
        })?;
        let content = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, format)
    }

    pub fn root(&self) -> &Container {
        &self.root
    }

    /// Pair the description with a base location.
    pub fn into_tree(self, base: impl Into<PathBuf>) -> Tree {
        Tree::new(base, self.root)
    }
}

impl From<Container> for Manifest {
    fn from(root: Container) -> Self {
        Self { root }
    }
}

//! Error types for tree construction, manifests and materialization.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building a tree in memory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    /// The child name cannot be used as a single path component.
    #[error("Invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// A sibling with the same name already exists.
    #[error("Duplicate name {name:?} in container")]
    DuplicateName { name: String },
}

/// Errors raised while loading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("Failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML document is malformed or describes an invalid tree.
    #[error("Invalid TOML manifest: {0}")]
    Toml(#[from] toml::de::Error),

    /// The JSON document is malformed or describes an invalid tree.
    #[error("Invalid JSON manifest: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension does not name a supported format.
    #[error("Unsupported manifest format: {path}")]
    UnsupportedFormat { path: PathBuf },
}

/// The kind of entity found at a path that does not match the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictKind {
    /// A file exists where a directory is declared, or where the
    /// existing-file policy forbids touching it.
    FileExists,
    /// A directory exists where a file is declared.
    DirectoryExists,
    /// A symbolic link exists at the path.
    Symlink,
    /// A socket, fifo, device or other special file exists at the path.
    Other,
}

impl std::fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileExists => write!(f, "File already exists"),
            Self::DirectoryExists => write!(f, "Directory already exists"),
            Self::Symlink => write!(f, "Symbolic link exists"),
            Self::Other => write!(f, "Special file exists"),
        }
    }
}

/// Errors that abort a materialization run.
#[derive(Debug, Error)]
pub enum MaterializeError {
    /// An existing entity has the wrong kind for the node.
    #[error("Path conflict at {path}: {kind}")]
    PathConflict { path: PathBuf, kind: ConflictKind },

    /// Permission denied while creating or writing.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MaterializeError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create a path conflict error.
    pub fn conflict(path: impl Into<PathBuf>, kind: ConflictKind) -> Self {
        Self::PathConflict {
            path: path.into(),
            kind,
        }
    }

    /// The path the error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::PathConflict { path, .. } | Self::PermissionDenied { path } | Self::Io { path, .. } => {
                path
            }
        }
    }

    /// Check if this is a path conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::PathConflict { .. })
    }
}

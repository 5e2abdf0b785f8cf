//! Classification of existing filesystem entities.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sproutfile_core::{ConflictKind, MaterializeError};

/// What currently occupies a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Existing {
    /// Nothing exists at the path.
    Absent,
    /// A real directory (not a link to one).
    Directory,
    /// A regular file.
    File,
    /// A symbolic link, whatever it points to.
    Symlink,
    /// A socket, fifo, device or similar.
    Other,
}

impl Existing {
    /// The conflict this entity causes for a declared directory, if any.
    pub fn conflict_for_directory(self) -> Option<ConflictKind> {
        match self {
            Self::Absent | Self::Directory => None,
            Self::File => Some(ConflictKind::FileExists),
            Self::Symlink => Some(ConflictKind::Symlink),
            Self::Other => Some(ConflictKind::Other),
        }
    }

    /// The conflict this entity causes for a declared file, if any.
    ///
    /// An existing regular file is not a conflict here; whether it may be
    /// replaced is decided by the existing-file policy.
    pub fn conflict_for_file(self) -> Option<ConflictKind> {
        match self {
            Self::Absent | Self::File => None,
            Self::Directory => Some(ConflictKind::DirectoryExists),
            Self::Symlink => Some(ConflictKind::Symlink),
            Self::Other => Some(ConflictKind::Other),
        }
    }
}

/// Inspect a path without following symbolic links.
pub fn probe(path: &Path) -> Result<Existing, MaterializeError> {
    match fs::symlink_metadata(path) {
        Ok(meta) => {
            let file_type = meta.file_type();
            let existing = if file_type.is_symlink() {
                Existing::Symlink
            } else if file_type.is_dir() {
                Existing::Directory
            } else if file_type.is_file() {
                Existing::File
            } else {
                Existing::Other
            };
            Ok(existing)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Existing::Absent),
        Err(e) => Err(MaterializeError::io(path, e)),
    }
}

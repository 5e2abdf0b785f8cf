//! Result summary of a materialization run.

use serde::{Deserialize, Serialize};

/// Counts of what a successful run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterializeReport {
    /// Directories that did not exist and were created.
    pub directories_created: usize,
    /// Directories that already existed and were left as-is.
    pub directories_existing: usize,
    /// Files that did not exist and were written.
    pub files_created: usize,
    /// Files that existed and were truncated and rewritten.
    pub files_overwritten: usize,
    /// Files that existed and were left untouched.
    pub files_kept: usize,
    /// Total payload bytes written.
    pub bytes_written: u64,
}

impl MaterializeReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files written, new or overwritten.
    pub fn files_written(&self) -> usize {
        self.files_created + self.files_overwritten
    }

    /// Number of entities visited.
    pub fn total(&self) -> usize {
        self.directories_created
            + self.directories_existing
            + self.files_created
            + self.files_overwritten
            + self.files_kept
    }

    /// Check if the run created anything new.
    pub fn created_anything(&self) -> bool {
        self.directories_created > 0 || self.files_created > 0
    }

    /// Get a human-readable summary of the run.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Created {} directories and {} files",
            self.directories_created, self.files_created
        );
        if self.files_overwritten > 0 {
            summary.push_str(&format!(", overwrote {} files", self.files_overwritten));
        }
        if self.files_kept > 0 {
            summary.push_str(&format!(", kept {} existing files", self.files_kept));
        }
        if self.directories_existing > 0 {
            summary.push_str(&format!(
                " ({} directories already present)",
                self.directories_existing
            ));
        }
        summary
    }
}

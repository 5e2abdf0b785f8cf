//! Dry-run planning of a materialization.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sproutfile_core::{
    ConflictKind, Container, EntryKind, ExistingFilePolicy, MaterializeError, Tree, Walk,
};
use tracing::debug;

use crate::conflict::{Existing, probe};
use crate::materialize::Materializer;

/// What materialization does at a single path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    CreateDirectory,
    KeepDirectory,
    CreateFile,
    OverwriteFile,
    KeepFile,
    /// The path is occupied by something incompatible.
    Conflict(ConflictKind),
}

impl Action {
    /// Decide the action for a declared directory.
    pub fn for_directory(existing: Existing) -> Self {
        if let Some(kind) = existing.conflict_for_directory() {
            return Self::Conflict(kind);
        }
        match existing {
            Existing::Directory => Self::KeepDirectory,
            _ => Self::CreateDirectory,
        }
    }

    /// Decide the action for a declared file under a policy.
    pub fn for_file(existing: Existing, policy: ExistingFilePolicy) -> Self {
        if let Some(kind) = existing.conflict_for_file() {
            return Self::Conflict(kind);
        }
        match (existing, policy) {
            (Existing::File, ExistingFilePolicy::Overwrite) => Self::OverwriteFile,
            (Existing::File, ExistingFilePolicy::Keep) => Self::KeepFile,
            (Existing::File, ExistingFilePolicy::Fail) => Self::Conflict(ConflictKind::FileExists),
            _ => Self::CreateFile,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Check if the action mutates the filesystem.
    pub fn is_change(&self) -> bool {
        matches!(
            self,
            Self::CreateDirectory | Self::CreateFile | Self::OverwriteFile
        )
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateDirectory => write!(f, "create dir"),
            Self::KeepDirectory => write!(f, "keep dir"),
            Self::CreateFile => write!(f, "create file"),
            Self::OverwriteFile => write!(f, "overwrite"),
            Self::KeepFile => write!(f, "keep file"),
            Self::Conflict(kind) => write!(f, "conflict: {kind}"),
        }
    }
}

/// A single step of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedAction {
    /// Absolute or caller-resolved path.
    pub path: PathBuf,
    pub action: Action,
    /// Payload size for files, 0 for directories.
    pub bytes: u64,
}

/// Ordered actions a run would take, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub base: PathBuf,
    pub actions: Vec<PlannedAction>,
}

impl Plan {
    /// Check if the run would fail on a conflict.
    pub fn has_conflicts(&self) -> bool {
        self.actions.iter().any(|a| a.action.is_conflict())
    }

    /// Iterate over conflicting steps.
    pub fn conflicts(&self) -> impl Iterator<Item = &PlannedAction> {
        self.actions.iter().filter(|a| a.action.is_conflict())
    }

    /// Number of steps that would touch the filesystem.
    pub fn change_count(&self) -> usize {
        self.actions.iter().filter(|a| a.action.is_change()).count()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl Materializer {
    /// Plan a tree without touching the filesystem.
    pub fn plan(&self, tree: &Tree) -> Result<Plan, MaterializeError> {
        self.plan_at(tree.base(), tree.root())
    }

    /// Plan a container rooted at `base` without touching the filesystem.
    ///
    /// Conflicts are recorded rather than returned; nothing below a
    /// conflicting directory is listed. Only failures to inspect a path
    /// are errors.
    pub fn plan_at(&self, base: &Path, root: &Container) -> Result<Plan, MaterializeError> {
        let mut plan = Plan {
            base: base.to_path_buf(),
            actions: Vec::new(),
        };

        let mut walk = Walk::new(root);
        while let Some(entry) = walk.next() {
            let path = entry.resolve(base);
            let existing = probe(&path)?;
            let (action, bytes) = match entry.kind {
                EntryKind::Directory(_) => (Action::for_directory(existing), 0),
                EntryKind::File(leaf) => (
                    Action::for_file(existing, self.config().existing_files),
                    leaf.len() as u64,
                ),
            };
            if action.is_conflict() && entry.is_dir() {
                walk.skip_subtree();
            }
            debug!(path = %path.display(), %action, "Planned");
            plan.actions.push(PlannedAction {
                path,
                action,
                bytes,
            });
        }

        Ok(plan)
    }
}

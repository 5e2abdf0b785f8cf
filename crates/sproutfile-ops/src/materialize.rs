//! Writing a tree description to disk.

use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::Path;

use sproutfile_core::{
    ConflictKind, Container, EntryKind, Leaf, MaterializeConfig, MaterializeError, Tree, Walk,
};
use tracing::{debug, info, warn};

use crate::conflict::{Existing, probe};
use crate::plan::Action;
use crate::report::MaterializeReport;

/// Materialize `root` under `base` with the default configuration.
///
/// `base` need not exist yet. Existing directories are accepted, existing
/// files are overwritten, anything else in the way is a
/// [`MaterializeError::PathConflict`].
pub fn materialize(
    base: impl AsRef<Path>,
    root: &Container,
) -> Result<MaterializeReport, MaterializeError> {
    Materializer::new().materialize_at(base.as_ref(), root)
}

/// Synchronous, fail-fast tree materializer.
#[derive(Debug, Clone, Default)]
pub struct Materializer {
    config: MaterializeConfig,
}

impl Materializer {
    /// Create a materializer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MaterializeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MaterializeConfig {
        &self.config
    }

    /// Materialize a tree at its base location.
    pub fn materialize(&self, tree: &Tree) -> Result<MaterializeReport, MaterializeError> {
        self.materialize_at(tree.base(), tree.root())
    }

    /// Materialize a container rooted at `base`.
    ///
    /// Entries are created in pre-order, so every parent exists before its
    /// children. The first error aborts the run; entities created before it
    /// stay on disk.
    pub fn materialize_at(
        &self,
        base: &Path,
        root: &Container,
    ) -> Result<MaterializeReport, MaterializeError> {
        info!(base = %base.display(), policy = %self.config.existing_files, "Materializing tree");

        let mut report = MaterializeReport::new();
        for entry in Walk::new(root) {
            let path = entry.resolve(base);
            match entry.kind {
                EntryKind::Directory(_) => {
                    self.ensure_directory(&path, entry.is_root(), &mut report)?
                }
                EntryKind::File(leaf) => self.write_file(&path, leaf, &mut report)?,
            }
        }

        info!(base = %base.display(), "{}", report.summary());
        Ok(report)
    }

    fn ensure_directory(
        &self,
        path: &Path,
        is_root: bool,
        report: &mut MaterializeReport,
    ) -> Result<(), MaterializeError> {
        match Action::for_directory(probe(path)?) {
            Action::Conflict(kind) => Err(conflict(path, kind)),
            Action::KeepDirectory => {
                debug!(path = %path.display(), "Directory exists");
                report.directories_existing += 1;
                Ok(())
            }
            _ => {
                // Children only ever need `create_dir`: their parent was
                // handled by an earlier step.
                let result = if is_root && self.config.create_parents {
                    fs::create_dir_all(path)
                } else {
                    fs::create_dir(path)
                };

                match result {
                    Ok(()) => {
                        debug!(path = %path.display(), "Created directory");
                        report.directories_created += 1;
                        Ok(())
                    }
                    // Appeared since the probe.
                    Err(e) if e.kind() == ErrorKind::AlreadyExists => match probe(path)? {
                        Existing::Directory => {
                            report.directories_existing += 1;
                            Ok(())
                        }
                        other => Err(conflict(
                            path,
                            other
                                .conflict_for_directory()
                                .unwrap_or(ConflictKind::Other),
                        )),
                    },
                    Err(e) => Err(MaterializeError::io(path, e)),
                }
            }
        }
    }

    fn write_file(
        &self,
        path: &Path,
        leaf: &Leaf,
        report: &mut MaterializeReport,
    ) -> Result<(), MaterializeError> {
        let action = Action::for_file(probe(path)?, self.config.existing_files);
        match action {
            Action::Conflict(kind) => Err(conflict(path, kind)),
            Action::KeepFile => {
                debug!(path = %path.display(), "Keeping existing file");
                report.files_kept += 1;
                Ok(())
            }
            _ => {
                write_payload(path, leaf.as_bytes(), self.config.sync_files)
                    .map_err(|e| MaterializeError::io(path, e))?;

                if action == Action::OverwriteFile {
                    debug!(path = %path.display(), bytes = leaf.len(), "Overwrote file");
                    report.files_overwritten += 1;
                } else {
                    debug!(path = %path.display(), bytes = leaf.len(), "Created file");
                    report.files_created += 1;
                }
                report.bytes_written += leaf.len() as u64;
                Ok(())
            }
        }
    }
}

fn conflict(path: &Path, kind: ConflictKind) -> MaterializeError {
    warn!(path = %path.display(), %kind, "Path conflict");
    MaterializeError::conflict(path, kind)
}

/// Truncate-or-create `path` and write `bytes`. The handle is closed on
/// every return path when `file` drops.
fn write_payload(path: &Path, bytes: &[u8], sync: bool) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    file.write_all(bytes)?;
    if sync {
        file.sync_all()?;
    }
    Ok(())
}

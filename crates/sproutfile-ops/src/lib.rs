//! Materialization engine for sproutfile.
//!
//! This crate turns a [`Tree`] description into real directories and files.
//! Runs are synchronous and fail-fast: the first conflict or I/O error aborts
//! the run and nothing already written is rolled back. Re-running after the
//! cause is fixed converges, because existing directories are accepted as-is.
//!
//! # Example
//!
//! ```rust,no_run
//! use sproutfile_ops::{Container, materialize};
//!
//! let root = Container::new()
//!     .with_dir("a", Container::new().with_file("b.txt", "hello")?)?;
//!
//! let report = materialize("/tmp/x", &root)?;
//! println!("{}", report.summary());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod conflict;
mod materialize;
mod plan;
mod report;

pub use conflict::{Existing, probe};
pub use materialize::{Materializer, materialize};
pub use plan::{Action, Plan, PlannedAction};
pub use report::MaterializeReport;

// Re-export core types for convenience
pub use sproutfile_core::{
    ConflictKind, Container, ExistingFilePolicy, Leaf, MaterializeConfig, MaterializeError, Node,
    Tree,
};

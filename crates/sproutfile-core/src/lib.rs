//! Core types for sproutfile.
//!
//! This crate provides the declarative tree model used throughout the
//! sproutfile ecosystem: containers and leaves, the pre-order walk,
//! manifest loading, materialization configuration, and error types.

mod config;
mod error;
mod manifest;
mod node;
mod tree;

pub use config::{ExistingFilePolicy, MaterializeConfig, MaterializeConfigBuilder};
pub use error::{ConflictKind, ManifestError, MaterializeError, NodeError};
pub use manifest::{Manifest, ManifestFormat};
pub use node::{Container, Leaf, Node, validate_name};
pub use tree::{Entry, EntryKind, Tree, TreeStats, Walk};

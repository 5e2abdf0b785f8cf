//! Tree container, pre-order walk and statistics.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::node::{Container, Leaf, Node};

/// A root container paired with the base location it materializes into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    base: PathBuf,
    root: Container,
}

impl Tree {
    /// Create a new tree rooted at `base`.
    pub fn new(base: impl Into<PathBuf>, root: Container) -> Self {
        Self {
            base: base.into(),
            root,
        }
    }

    /// Base filesystem location of the root container.
    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn root(&self) -> &Container {
        &self.root
    }

    /// Walk every node in depth-first pre-order.
    pub fn walk(&self) -> Walk<'_> {
        Walk::new(&self.root)
    }

    /// Compute summary statistics.
    pub fn stats(&self) -> TreeStats {
        TreeStats::from_container(&self.root)
    }

    /// Split the tree into its base and root container.
    pub fn into_parts(self) -> (PathBuf, Container) {
        (self.base, self.root)
    }
}

/// What a walk entry refers to.
#[derive(Debug, Clone, Copy)]
pub enum EntryKind<'a> {
    Directory(&'a Container),
    File(&'a Leaf),
}

impl<'a> EntryKind<'a> {
    fn of(node: &'a Node) -> Self {
        match node {
            Node::Container(container) => Self::Directory(container),
            Node::Leaf(leaf) => Self::File(leaf),
        }
    }
}

/// A single node visited by [`Walk`].
#[derive(Debug, Clone)]
pub struct Entry<'a> {
    /// Path relative to the root container. Empty for the root itself.
    pub path: PathBuf,
    /// Nesting depth, 0 for the root.
    pub depth: u32,
    pub kind: EntryKind<'a>,
}

impl Entry<'_> {
    /// Check if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self.kind, EntryKind::Directory(_))
    }

    /// Check if this entry is a file.
    pub fn is_file(&self) -> bool {
        matches!(self.kind, EntryKind::File(_))
    }

    /// Check if this entry is the root container.
    pub fn is_root(&self) -> bool {
        self.depth == 0
    }

    /// Resolve the entry against a base location.
    ///
    /// The root resolves to `base` itself, without a trailing separator.
    pub fn resolve(&self, base: &Path) -> PathBuf {
        if self.path.as_os_str().is_empty() {
            base.to_path_buf()
        } else {
            base.join(&self.path)
        }
    }
}

/// Depth-first pre-order iterator over a container and its descendants.
///
/// Driven by an explicit stack, so nesting depth is bounded by memory rather
/// than the call stack. A directory's children are expanded lazily when the
/// next entry is requested, which lets callers prune with
/// [`Walk::skip_subtree`].
#[derive(Debug)]
pub struct Walk<'a> {
    stack: Vec<Entry<'a>>,
    pending: Option<(PathBuf, u32, &'a Container)>,
}

impl<'a> Walk<'a> {
    /// Start a walk at `root`.
    pub fn new(root: &'a Container) -> Self {
        Self {
            stack: vec![Entry {
                path: PathBuf::new(),
                depth: 0,
                kind: EntryKind::Directory(root),
            }],
            pending: None,
        }
    }

    /// Do not descend into the directory most recently yielded.
    pub fn skip_subtree(&mut self) {
        self.pending = None;
    }

    fn expand_pending(&mut self) {
        if let Some((path, depth, container)) = self.pending.take() {
            // Reverse so the first child is popped first.
            for (name, node) in container.iter().rev() {
                self.stack.push(Entry {
                    path: path.join(name),
                    depth: depth + 1,
                    kind: EntryKind::of(node),
                });
            }
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = Entry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.expand_pending();
        let entry = self.stack.pop()?;
        if let EntryKind::Directory(container) = entry.kind {
            self.pending = Some((entry.path.clone(), entry.depth, container));
        }
        Some(entry)
    }
}

/// Summary statistics for a tree description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Number of containers, including the root.
    pub directories: u64,
    /// Number of leaves.
    pub files: u64,
    /// Sum of all leaf payload sizes.
    pub total_bytes: u64,
    /// Deepest nesting level reached.
    pub max_depth: u32,
}

impl TreeStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute stats for a container and everything below it.
    pub fn from_container(root: &Container) -> Self {
        let mut stats = Self::new();
        for entry in Walk::new(root) {
            stats.max_depth = stats.max_depth.max(entry.depth);
            match entry.kind {
                EntryKind::Directory(_) => stats.directories += 1,
                EntryKind::File(leaf) => {
                    stats.files += 1;
                    stats.total_bytes += leaf.len() as u64;
                }
            }
        }
        stats
    }

    /// Total number of nodes.
    pub fn total_nodes(&self) -> u64 {
        self.directories + self.files
    }
}

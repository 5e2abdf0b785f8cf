//! Container and leaf node types.

use compact_str::CompactString;
use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};

use crate::error::NodeError;

/// A node of a declarative tree: either a directory or a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A directory holding named children.
    Container(Container),
    /// A file holding literal content.
    Leaf(Leaf),
}

impl Node {
    /// Create a leaf node from a payload.
    pub fn leaf(content: impl Into<Vec<u8>>) -> Self {
        Self::Leaf(Leaf::new(content))
    }

    /// Check if this node is a directory.
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Container(_))
    }

    /// Check if this node is a file.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    pub fn as_container(&self) -> Option<&Container> {
        match self {
            Self::Container(container) => Some(container),
            Self::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Container(_) => None,
        }
    }
}

impl From<Container> for Node {
    fn from(container: Container) -> Self {
        Self::Container(container)
    }
}

impl From<Leaf> for Node {
    fn from(leaf: Leaf) -> Self {
        Self::Leaf(leaf)
    }
}

/// Exact file content. The bytes are written as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaf {
    content: Vec<u8>,
}

impl Leaf {
    /// Create a leaf from raw bytes or text.
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Create a leaf from text.
    pub fn text(content: &str) -> Self {
        Self::new(content.as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// An ordered mapping from child name to child node.
///
/// Names are validated on insertion and unique among siblings. Iteration
/// follows insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    children: IndexMap<CompactString, Node>,
}

impl Container {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a named child.
    pub fn insert(
        &mut self,
        name: impl Into<CompactString>,
        node: impl Into<Node>,
    ) -> Result<(), NodeError> {
        let name = name.into();
        if let Err(reason) = validate_name(&name) {
            return Err(NodeError::InvalidName {
                name: name.into_string(),
                reason,
            });
        }
        if self.children.contains_key(&name) {
            return Err(NodeError::DuplicateName {
                name: name.into_string(),
            });
        }
        self.children.insert(name, node.into());
        Ok(())
    }

    /// Add a child directory, consuming and returning the container.
    pub fn with_dir(
        mut self,
        name: impl Into<CompactString>,
        dir: Container,
    ) -> Result<Self, NodeError> {
        self.insert(name, dir)?;
        Ok(self)
    }

    /// Add a child file, consuming and returning the container.
    pub fn with_file(
        mut self,
        name: impl Into<CompactString>,
        content: impl Into<Vec<u8>>,
    ) -> Result<Self, NodeError> {
        self.insert(name, Leaf::new(content))?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Iterate over children in insertion order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, &Node)> + ExactSizeIterator {
        self.children.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Child names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(CompactString::as_str)
    }
}

/// Validate that a name is usable as a single path component.
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".into());
    }

    if name.len() > 255 {
        return Err("Name is too long (max 255 bytes)".into());
    }

    let invalid_chars = ['/', '\0'];
    for c in invalid_chars {
        if name.contains(c) {
            return Err(format!("Name cannot contain {c:?}"));
        }
    }

    #[cfg(target_os = "windows")]
    {
        if name.contains('\\') {
            return Err("Name cannot contain '\\'".into());
        }
    }

    if name == "." || name == ".." {
        return Err("'.' and '..' are reserved names".into());
    }

    Ok(())
}

impl<'de> Deserialize<'de> for Container {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ContainerVisitor)
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct ContainerVisitor;

impl<'de> Visitor<'de> for ContainerVisitor {
    type Value = Container;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a table of named entries")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Container, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut container = Container::new();
        while let Some(name) = map.next_key::<String>()? {
            let node: Node = map.next_value()?;
            container.insert(name, node).map_err(de::Error::custom)?;
        }
        Ok(container)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a string (file content) or a table (directory)")
    }

    fn visit_str<E>(self, value: &str) -> Result<Node, E>
    where
        E: de::Error,
    {
        Ok(Node::Leaf(Leaf::text(value)))
    }

    fn visit_string<E>(self, value: String) -> Result<Node, E>
    where
        E: de::Error,
    {
        Ok(Node::Leaf(Leaf::new(value)))
    }

    fn visit_map<A>(self, map: A) -> Result<Node, A::Error>
    where
        A: MapAccess<'de>,
    {
        ContainerVisitor.visit_map(map).map(Node::Container)
    }
}

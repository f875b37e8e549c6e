//! Tree model: directories own their children, files own their text.

use std::collections::BTreeMap;
use std::collections::btree_map;

use crate::error::VfsError;
use crate::path::{DEFAULT_DIR_PERMISSIONS, DEFAULT_FILE_PERMISSIONS, validate_name};

// ── Kinds ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Directory,
    File,
}

impl NodeKind {
    /// Element tag used for this kind in the XML document.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Directory => "directory",
            Self::File => "file",
        }
    }

    /// Leading character of an `ls` line.
    pub fn type_char(&self) -> char {
        match self {
            Self::Directory => 'd',
            Self::File => '-',
        }
    }
}

// ── Node ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Directory(Directory),
    File(File),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Self::Directory(d) => d.name(),
            Self::File(f) => f.name(),
        }
    }

    pub fn permissions(&self) -> &str {
        match self {
            Self::Directory(d) => d.permissions(),
            Self::File(f) => f.permissions(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Directory(_) => NodeKind::Directory,
            Self::File(_) => NodeKind::File,
        }
    }

    /// Borrowed view of this node.
    pub fn entry(&self) -> Entry<'_> {
        match self {
            Self::Directory(d) => Entry::Directory(d),
            Self::File(f) => Entry::File(f),
        }
    }
}

impl From<Directory> for Node {
    fn from(dir: Directory) -> Self {
        Self::Directory(dir)
    }
}

impl From<File> for Node {
    fn from(file: File) -> Self {
        Self::File(file)
    }
}

/// A resolved node, borrowed from the tree.
#[derive(Debug, Clone, Copy)]
pub enum Entry<'a> {
    Directory(&'a Directory),
    File(&'a File),
}

impl<'a> Entry<'a> {
    pub fn name(&self) -> &'a str {
        match *self {
            Self::Directory(d) => d.name(),
            Self::File(f) => f.name(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Directory(_) => NodeKind::Directory,
            Self::File(_) => NodeKind::File,
        }
    }
}

// ── Directory ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    name: String,
    permissions: String,
    children: BTreeMap<String, Node>,
}

impl Directory {
    pub fn new(name: impl Into<String>, permissions: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            permissions: permissions.into(),
            children: BTreeMap::new(),
        }
    }

    /// The unnamed root directory.
    pub fn new_root() -> Self {
        Self::new("", DEFAULT_DIR_PERMISSIONS)
    }

    /// Drop the name so this directory can serve as a tree root.
    pub fn into_root(mut self) -> Self {
        self.name.clear();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn permissions(&self) -> &str {
        &self.permissions
    }

    pub fn set_permissions(&mut self, permissions: impl Into<String>) {
        self.permissions = permissions.into();
    }

    /// Insert `child` under its own name. An existing child with the same
    /// name is replaced and returned.
    pub fn attach(&mut self, child: impl Into<Node>) -> Result<Option<Node>, VfsError> {
        let child = child.into();
        if let Some(err) = validate_name(child.name()) {
            return Err(VfsError::InvalidArgument(err));
        }
        Ok(self.children.insert(child.name().to_string(), child))
    }

    pub fn detach(&mut self, name: &str) -> Option<Node> {
        self.children.remove(name)
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children.get_mut(name)
    }

    /// Children in name order.
    pub fn children(&self) -> btree_map::Values<'_, String, Node> {
        self.children.values()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Default for Directory {
    fn default() -> Self {
        Self::new_root()
    }
}

// ── File ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    name: String,
    permissions: String,
    content: String,
}

impl File {
    pub fn new(
        name: impl Into<String>,
        permissions: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            permissions: permissions.into(),
            content: content.into(),
        }
    }

    /// A file with the default `644` permissions.
    pub fn with_content(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(name, DEFAULT_FILE_PERMISSIONS, content)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn permissions(&self) -> &str {
        &self.permissions
    }

    pub fn set_permissions(&mut self, permissions: impl Into<String>) {
        self.permissions = permissions.into();
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Byte length of the content.
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

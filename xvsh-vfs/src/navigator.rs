//! Path resolution against the tree and the `cd` cursor.
//!
//! Resolution walks segments left to right. `.` and empty segments are
//! skipped, a name descends into a child, and `..` jumps back to the root.
//! Resolving through `..` also resets the cursor to `/`.

use std::fmt;

use crate::error::VfsError;
use crate::node::{Directory, Entry, File, Node, NodeKind};
use crate::path::{CURRENT_DIR, PARENT_DIR, ROOT_PATH, append_to_cursor, is_absolute, segments};
use crate::vfs::Vfs;

// ── Listing ─────────────────────────────────────────────────────────────────

/// One line of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: NodeKind,
    pub permissions: String,
}

impl DirEntry {
    fn from_node(node: &Node) -> Self {
        Self {
            name: node.name().to_string(),
            kind: node.kind(),
            permissions: node.permissions().to_string(),
        }
    }
}

impl fmt::Display for DirEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} {}", self.kind.type_char(), self.permissions, self.name)
    }
}

// ── Walk ────────────────────────────────────────────────────────────────────

/// Outcome of resolving one path.
struct Walk<'a> {
    /// `None` when some segment did not resolve.
    found: Option<Entry<'a>>,
    /// Child names from the root down to `found`.
    trail: Vec<&'a str>,
    /// A `..` segment of the path itself was reached.
    crossed_parent: bool,
}

struct Walker<'a> {
    root: &'a Directory,
    at: Entry<'a>,
    trail: Vec<&'a str>,
}

impl<'a> Walker<'a> {
    fn new(root: &'a Directory) -> Self {
        Self {
            root,
            at: Entry::Directory(root),
            trail: Vec::new(),
        }
    }

    /// Apply one segment. Returns false when it does not resolve.
    fn step(&mut self, segment: &str) -> bool {
        match segment {
            CURRENT_DIR => true,
            PARENT_DIR => {
                self.at = Entry::Directory(self.root);
                self.trail.clear();
                true
            }
            name => {
                let Entry::Directory(dir) = self.at else {
                    return false;
                };
                match dir.child(name) {
                    Some(child) => {
                        self.at = child.entry();
                        self.trail.push(child.name());
                        true
                    }
                    None => false,
                }
            }
        }
    }
}

/// Resolve `path` against `root`. Relative paths start from the node the
/// cursor text names; walking the cursor itself never reports a `..`.
fn walk<'a>(root: &'a Directory, cursor: &str, path: &str) -> Walk<'a> {
    let mut walker = Walker::new(root);
    let not_found = |crossed_parent| Walk {
        found: None,
        trail: Vec::new(),
        crossed_parent,
    };

    if !is_absolute(path) {
        for segment in segments(cursor) {
            if !walker.step(segment) {
                return not_found(false);
            }
        }
    }

    let mut crossed_parent = false;
    for segment in segments(path) {
        crossed_parent |= segment == PARENT_DIR;
        if !walker.step(segment) {
            return not_found(crossed_parent);
        }
    }

    Walk {
        found: Some(walker.at),
        trail: walker.trail,
        crossed_parent,
    }
}

/// Descend `root` along child names that are known to resolve.
fn descend_mut<'a>(root: &'a mut Directory, trail: &[String]) -> Option<NodeMut<'a>> {
    let Some((last, parents)) = trail.split_last() else {
        return Some(NodeMut::Directory(root));
    };
    let mut dir = root;
    for name in parents {
        match dir.child_mut(name)? {
            Node::Directory(child) => dir = child,
            Node::File(_) => return None,
        }
    }
    match dir.child_mut(last)? {
        Node::Directory(child) => Some(NodeMut::Directory(child)),
        Node::File(file) => Some(NodeMut::File(file)),
    }
}

enum NodeMut<'a> {
    Directory(&'a mut Directory),
    File(&'a mut File),
}

// ── Navigation ──────────────────────────────────────────────────────────────

impl Vfs {
    /// Resolve `path` (absolute, or relative to the cursor).
    ///
    /// Reaching a `..` segment resets the cursor to `/`, even when a later
    /// segment fails to resolve.
    pub fn resolve(&mut self, path: &str) -> Option<Entry<'_>> {
        let walk = walk(&self.root, &self.current_path, path);
        if walk.crossed_parent {
            reset_cursor(&mut self.current_path);
        }
        walk.found
    }

    /// Move the cursor to the directory named by `path`.
    ///
    /// On failure the cursor is left exactly as it was, `..` included.
    pub fn cd(&mut self, path: &str) -> Result<(), VfsError> {
        let walk = walk(&self.root, &self.current_path, path);
        match walk.found {
            Some(Entry::Directory(_)) => {}
            Some(Entry::File(_)) => return Err(VfsError::NotADirectory(path.to_string())),
            None => return Err(VfsError::NotFound(path.to_string())),
        }

        if walk.crossed_parent {
            reset_cursor(&mut self.current_path);
        }
        self.current_path = append_to_cursor(&self.current_path, path);
        tracing::debug!(path, cursor = %self.current_path, "Changed directory");
        Ok(())
    }

    /// List the children of the directory at `path`, or of the cursor.
    pub fn list_directory(&mut self, path: Option<&str>) -> Result<Vec<DirEntry>, VfsError> {
        let target = path.unwrap_or("");
        match self.resolve(target) {
            Some(Entry::Directory(dir)) => Ok(dir.children().map(DirEntry::from_node).collect()),
            _ => Err(VfsError::NotFound(display_target(path))),
        }
    }

    /// Content of the file at `path`.
    pub fn read_file(&mut self, path: &str) -> Result<&str, VfsError> {
        match self.resolve(path) {
            Some(Entry::File(file)) => Ok(file.content()),
            _ => Err(VfsError::NotFound(path.to_string())),
        }
    }

    /// Mutable access to the directory at `path`.
    pub fn directory_mut(&mut self, path: &str) -> Result<&mut Directory, VfsError> {
        match self.lookup_mut(path)? {
            NodeMut::Directory(dir) => Ok(dir),
            NodeMut::File(_) => Err(VfsError::NotADirectory(path.to_string())),
        }
    }

    /// Mutable access to the file at `path`.
    pub fn file_mut(&mut self, path: &str) -> Result<&mut File, VfsError> {
        match self.lookup_mut(path)? {
            NodeMut::File(file) => Ok(file),
            NodeMut::Directory(_) => Err(VfsError::NotAFile(path.to_string())),
        }
    }

    /// Insert `node` into the directory at `dir_path`, replacing any child
    /// with the same name.
    pub fn attach(
        &mut self,
        dir_path: &str,
        node: impl Into<Node>,
    ) -> Result<Option<Node>, VfsError> {
        self.directory_mut(dir_path)?.attach(node)
    }

    /// Remove the child `name` from the directory at `dir_path`.
    pub fn detach(&mut self, dir_path: &str, name: &str) -> Result<Node, VfsError> {
        self.directory_mut(dir_path)?
            .detach(name)
            .ok_or_else(|| VfsError::NotFound(format!("{} in {}", name, dir_path)))
    }

    fn lookup_mut(&mut self, path: &str) -> Result<NodeMut<'_>, VfsError> {
        let walk = walk(&self.root, &self.current_path, path);
        let crossed_parent = walk.crossed_parent;
        let trail: Option<Vec<String>> = walk
            .found
            .map(|_| walk.trail.iter().map(|name| name.to_string()).collect());

        if crossed_parent {
            reset_cursor(&mut self.current_path);
        }
        let trail = trail.ok_or_else(|| VfsError::NotFound(path.to_string()))?;
        descend_mut(&mut self.root, &trail).ok_or_else(|| VfsError::NotFound(path.to_string()))
    }
}

fn reset_cursor(cursor: &mut String) {
    if cursor.as_str() != ROOT_PATH {
        tracing::debug!(from = %cursor, "Cursor reset to root by '..'");
        *cursor = ROOT_PATH.to_string();
    }
}

fn display_target(path: Option<&str>) -> String {
    match path {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => ".".to_string(),
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

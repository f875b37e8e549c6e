// ---------------------------------------------------------------------------
// VFS instance: one owned tree plus the current-directory cursor
// ---------------------------------------------------------------------------

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::codec;
use crate::error::VfsError;
use crate::node::{Directory, Node};
use crate::path::ROOT_PATH;

#[derive(Debug)]
pub struct Vfs {
    pub(crate) root: Directory,
    pub(crate) current_path: String,
    source: Option<PathBuf>,
}

impl Default for Vfs {
    fn default() -> Self {
        Self::new()
    }
}

impl Vfs {
    // -- Constructors -----------------------------------------------------

    /// An empty tree with the cursor at `/`.
    pub fn new() -> Self {
        Self::with_root(Directory::new_root())
    }

    pub fn with_root(root: Directory) -> Self {
        Self {
            root,
            current_path: ROOT_PATH.to_string(),
            source: None,
        }
    }

    /// Build a VFS from an XML document. A root `directory` loses its name;
    /// a root `file` is placed under a fresh root directory.
    pub fn from_document(xml: &str) -> Result<Self, VfsError> {
        let root = match codec::decode(xml)? {
            Node::Directory(dir) => dir.into_root(),
            Node::File(file) => {
                let mut root = Directory::new_root();
                root.attach(file).map_err(|e| {
                    VfsError::MalformedDocument(format!("Root file element: {}", e))
                })?;
                root
            }
        };
        Ok(Self::with_root(root))
    }

    /// Load from an XML file on disk and remember it as the save target.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, VfsError> {
        let path = path.as_ref();
        let xml = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => VfsError::NotFound(path.display().to_string()),
            ErrorKind::InvalidData => VfsError::MalformedDocument(format!(
                "{} is not valid UTF-8",
                path.display()
            )),
            _ => VfsError::Io(e),
        })?;

        let mut vfs = Self::from_document(&xml).inspect_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Rejected VFS document");
        })?;
        vfs.source = Some(path.to_path_buf());

        tracing::info!(
            path = %path.display(),
            entries = vfs.root.len(),
            "Loaded VFS"
        );
        Ok(vfs)
    }

    /// Serialize the whole tree.
    pub fn to_document(&self) -> Result<String, VfsError> {
        codec::encode_directory(&self.root)
    }

    /// Write the tree to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), VfsError> {
        let path = path.as_ref();
        let xml = self.to_document()?;
        fs::write(path, xml)?;
        tracing::info!(path = %path.display(), "Saved VFS");
        Ok(())
    }

    /// Write the tree back to the file it was loaded from.
    pub fn save_to_source(&self) -> Result<PathBuf, VfsError> {
        let path = self.source.clone().ok_or_else(|| {
            VfsError::InvalidArgument(
                "No save path given and VFS was not loaded from a file".to_string(),
            )
        })?;
        self.save(&path)?;
        Ok(path)
    }

    // -- Accessors --------------------------------------------------------

    pub fn root(&self) -> &Directory {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Directory {
        &mut self.root
    }

    /// Absolute path of the cursor, as last written by `cd`.
    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    /// File this VFS was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

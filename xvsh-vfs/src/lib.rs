//! In-memory virtual filesystem for the xvsh shell.
//!
//! - [`node`]: the tree model (directories own children, files own text)
//! - [`codec`]: lossless XML persistence, file content stored as Base64
//! - [`navigator`]: path resolution and the `cd` cursor
//! - [`vfs`]: the instance tying a tree to its cursor and source file

pub mod codec;
pub mod error;
pub mod navigator;
pub mod node;
pub mod path;
pub mod vfs;

pub use error::VfsError;
pub use navigator::DirEntry;
pub use node::{Directory, Entry, File, Node, NodeKind};
pub use vfs::Vfs;

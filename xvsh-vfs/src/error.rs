use thiserror::Error;

#[derive(Debug, Error)]
pub enum VfsError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Malformed document: {0}")]
    MalformedDocument(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Not a directory: {0}")]
    NotADirectory(String),
    #[error("Not a file: {0}")]
    NotAFile(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VfsError {
    pub fn code(&self) -> &str {
        match self {
            Self::NotFound(_) => "VFS_NOT_FOUND",
            Self::MalformedDocument(_) => "VFS_MALFORMED_DOCUMENT",
            Self::InvalidArgument(_) => "VFS_INVALID_ARGUMENT",
            Self::NotADirectory(_) => "VFS_NOT_DIRECTORY",
            Self::NotAFile(_) => "VFS_NOT_FILE",
            Self::Io(_) => "VFS_IO_ERROR",
        }
    }

    /// Path of a lookup that found nothing of the required kind.
    pub fn missing_path(&self) -> Option<&str> {
        match self {
            Self::NotFound(path) | Self::NotADirectory(path) | Self::NotAFile(path) => Some(path),
            _ => None,
        }
    }
}

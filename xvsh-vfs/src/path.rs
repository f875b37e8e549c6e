// ── Constants ───────────────────────────────────────────────────────────────

pub const ROOT_PATH: &str = "/";
pub const SEPARATOR: char = '/';
pub const CURRENT_DIR: &str = ".";
pub const PARENT_DIR: &str = "..";

pub const DEFAULT_DIR_PERMISSIONS: &str = "755";
pub const DEFAULT_FILE_PERMISSIONS: &str = "644";

// ── Path functions ──────────────────────────────────────────────────────────

/// A leading `/` marks an absolute path.
pub fn is_absolute(path: &str) -> bool {
    path.starts_with(SEPARATOR)
}

/// Split a path into its non-empty segments. Repeated and trailing slashes
/// produce no segments.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR).filter(|s| !s.is_empty())
}

/// Textual cursor update after a successful `cd`.
///
/// Absolute paths replace the cursor verbatim. Relative paths are appended
/// with a single separating slash; `.` and `..` are kept as written.
pub fn append_to_cursor(cursor: &str, path: &str) -> String {
    if is_absolute(path) {
        path.to_string()
    } else if cursor.ends_with(SEPARATOR) {
        format!("{}{}", cursor, path)
    } else {
        format!("{}{}{}", cursor, SEPARATOR, path)
    }
}

/// Validate a child name. Returns `Some(error_message)` if invalid.
pub fn validate_name(name: &str) -> Option<String> {
    if name.is_empty() {
        return Some("Name cannot be empty".to_string());
    }
    if name == CURRENT_DIR || name == PARENT_DIR {
        return Some(format!("Name is reserved: {}", name));
    }
    if name.contains(SEPARATOR) {
        return Some(format!("Name contains a path separator: {}", name));
    }
    None
}

// ── Tests ───────────────────────────────────────────────────────────────────

//! Error types for the VFS crate.

use std::fmt;
use std::sync::Arc;

use befuddle_model::DecodeError;

/// Errors that can occur during VFS operations.
#[derive(Debug)]
pub enum VfsError {
    /// Inode not found.
    InodeNotFound(u64),

    /// Not a directory.
    NotADirectory(u64),

    /// Not a file.
    NotAFile(u64),

    /// No child with this name.
    NotFound { parent: u64, name: String },

    /// Expanding a directory failed; the subtree is unreadable.
    Expansion {
        inode: u64,
        source: Arc<DecodeError>,
    },

    /// Input could not be decoded at load time.
    Decode(DecodeError),

    /// Mount operation failed.
    MountFailed(String),

    /// IO error.
    Io(std::io::Error),
}

impl fmt::Display for VfsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VfsError::InodeNotFound(id) => write!(f, "Inode not found: {}", id),
            VfsError::NotADirectory(id) => write!(f, "Not a directory: {}", id),
            VfsError::NotAFile(id) => write!(f, "Not a file: {}", id),
            VfsError::NotFound { parent, name } => {
                write!(f, "No entry '{}' in directory {}", name, parent)
            }
            VfsError::Expansion { inode, source } => {
                write!(f, "Failed to expand directory {}: {}", inode, source)
            }
            VfsError::Decode(e) => write!(f, "Decode error: {}", e),
            VfsError::MountFailed(msg) => write!(f, "Mount failed: {}", msg),
            VfsError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for VfsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VfsError::Expansion { source, .. } => Some(source.as_ref()),
            VfsError::Decode(e) => Some(e),
            VfsError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for VfsError {
    fn from(e: std::io::Error) -> Self {
        VfsError::Io(e)
    }
}

impl From<DecodeError> for VfsError {
    fn from(e: DecodeError) -> Self {
        VfsError::Decode(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expansion_error_keeps_source() {
        let err: VfsError = VfsError::Expansion {
            inode: 3,
            source: Arc::new(DecodeError::UnsupportedType {
                field: "x".to_string(),
                tag: 0x42,
            }),
        };
        assert_eq!(
            err.to_string(),
            "Failed to expand directory 3: Unsupported BSON type 0x42 for field 'x'"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_not_found_display() {
        let err: VfsError = VfsError::NotFound {
            parent: 1,
            name: "z".to_string(),
        };
        assert_eq!(err.to_string(), "No entry 'z' in directory 1");
    }
}

//! Error types for zip extraction.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`ExtractError`].
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors that can occur while extracting a zip archive.
///
/// Every variant is fatal to the session that produced it: extraction
/// stops at the first error and resolves with exactly that error. Output
/// already written before the failing entry is left on disk.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The configured target directory is not an absolute path.
    ///
    /// Raised before any filesystem mutation takes place.
    #[error("target directory is expected to be absolute: {}", path.display())]
    RelativeTargetDir {
        /// The rejected target directory as configured.
        path: PathBuf,
    },

    /// The underlying reader reported a malformed or unreadable archive.
    #[error("invalid archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// An entry's resolved destination escapes the target root.
    #[error("out of bound path {:?} found while processing file {entry}", resolved.display())]
    OutOfBoundPath {
        /// Archive-internal name of the offending entry.
        entry: String,
        /// The canonical on-disk path that triggered the violation.
        resolved: PathBuf,
    },

    /// A filesystem operation failed while materializing an entry.
    #[error("failed to extract {entry}: {source}")]
    Entry {
        /// Archive-internal name of the entry in progress.
        entry: String,
        /// The underlying filesystem error.
        source: io::Error,
    },

    /// An I/O operation outside any particular entry failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ExtractError {
    /// Returns `true` if this error represents a security violation
    /// rather than an environmental failure.
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(self, Self::OutOfBoundPath { .. })
    }

    /// Returns the archive-internal name of the entry this error
    /// identifies, if any.
    #[must_use]
    pub fn entry_name(&self) -> Option<&str> {
        match self {
            Self::OutOfBoundPath { entry, .. } | Self::Entry { entry, .. } => Some(entry),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bound_display_names_entry_and_path() {
        let err = ExtractError::OutOfBoundPath {
            entry: "evil/../../passwd".to_string(),
            resolved: PathBuf::from("/etc"),
        };
        let message = err.to_string();
        assert!(message.contains("out of bound path"));
        assert!(message.contains("/etc"));
        assert!(message.contains("evil/../../passwd"));
        assert!(err.is_security_violation());
    }

    #[test]
    fn relative_target_dir_display() {
        let err = ExtractError::RelativeTargetDir {
            path: PathBuf::from("./out"),
        };
        assert!(err.to_string().contains("expected to be absolute"));
        assert!(!err.is_security_violation());
    }

    #[test]
    fn entry_error_carries_name() {
        let err = ExtractError::Entry {
            entry: "a/foo.txt".to_string(),
            source: io::Error::new(io::ErrorKind::AlreadyExists, "exists"),
        };
        assert_eq!(err.entry_name(), Some("a/foo.txt"));
        assert!(err.to_string().contains("a/foo.txt"));
    }

    #[test]
    fn io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: ExtractError = io_err.into();
        assert!(matches!(err, ExtractError::Io(_)));
        assert_eq!(err.entry_name(), None);
    }
}

//! Validated extraction root.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ExtractError, Result};

/// The canonical directory every write of a session must resolve under.
///
/// Construction validates the configured path, creates the directory if
/// missing, and canonicalizes it. The canonical form is the basis for all
/// containment checks, so symlinks in the configured path are resolved
/// exactly once, up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRoot(PathBuf);

impl TargetRoot {
    /// Validates and establishes the extraction root.
    ///
    /// Relative paths are rejected unconditionally before any filesystem
    /// mutation; this is a usability guard, not a security one. The
    /// directory and missing ancestors are created, then the path is
    /// canonicalized. On Unix the directory's writability is verified
    /// with `access(2)`.
    pub fn ensure<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(dir = %path.display(), "creating target directory");

        if !path.is_absolute() {
            return Err(ExtractError::RelativeTargetDir {
                path: path.to_path_buf(),
            });
        }

        fs::create_dir_all(path)?;
        let canonical = path.canonicalize()?;

        #[cfg(unix)]
        Self::check_writable(&canonical)?;

        Ok(Self(canonical))
    }

    #[cfg(unix)]
    fn check_writable(canonical: &Path) -> Result<()> {
        use std::ffi::CString;
        use std::os::unix::ffi::OsStrExt;

        let path_cstring = CString::new(canonical.as_os_str().as_bytes()).map_err(|_| {
            ExtractError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "path contains null byte",
            ))
        })?;

        // SAFETY: access() only reads the C string for the duration of
        // the call and returns immediately.
        #[allow(unsafe_code)]
        let rc = unsafe { libc::access(path_cstring.as_ptr(), libc::W_OK) };
        if rc != 0 {
            return Err(ExtractError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("target directory is not writable: {}", canonical.display()),
            )));
        }
        Ok(())
    }

    /// The canonical root path.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Joins an archive-internal name onto the root without resolving
    /// anything.
    ///
    /// Leading separators are stripped so an absolute-looking name lands
    /// inside the root rather than replacing it; `..` segments are kept
    /// verbatim for the path guard to judge after canonicalization.
    #[must_use]
    pub fn join_entry(&self, entry_name: &str) -> PathBuf {
        let relative = entry_name.trim_start_matches(['/', '\\']);
        self.0.join(relative)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn rejects_relative_path_without_touching_fs() {
        let result = TargetRoot::ensure("relative/target");
        assert!(matches!(
            result,
            Err(ExtractError::RelativeTargetDir { .. })
        ));
        assert!(!Path::new("relative").exists());
    }

    #[test]
    fn creates_missing_directories() {
        let temp = TempDir::new().expect("temp dir");
        let nested = temp.path().join("a").join("b");
        let root = TargetRoot::ensure(&nested).expect("root should be created");
        assert!(nested.is_dir());
        assert!(root.as_path().is_absolute());
    }

    #[test]
    fn canonicalizes_existing_root() {
        let temp = TempDir::new().expect("temp dir");
        let dotted = temp.path().join("sub").join("..");
        fs::create_dir_all(temp.path().join("sub")).unwrap();
        let root = TargetRoot::ensure(&dotted).expect("root");
        assert_eq!(root.as_path(), temp.path().canonicalize().unwrap());
    }

    #[test]
    fn join_strips_leading_separators() {
        let temp = TempDir::new().expect("temp dir");
        let root = TargetRoot::ensure(temp.path()).expect("root");
        let joined = root.join_entry("/etc/passwd");
        assert!(joined.starts_with(root.as_path()));
        assert!(joined.ends_with("etc/passwd"));
    }

    #[test]
    fn join_keeps_parent_segments_verbatim() {
        let temp = TempDir::new().expect("temp dir");
        let root = TargetRoot::ensure(temp.path()).expect("root");
        let joined = root.join_entry("a/../../x");
        assert_eq!(joined, root.as_path().join("a/../../x"));
    }

    #[test]
    #[cfg(unix)]
    fn resolves_symlinked_root() {
        use std::os::unix::fs::symlink;

        let temp = TempDir::new().expect("temp dir");
        let real = temp.path().join("real");
        fs::create_dir(&real).unwrap();
        let link = temp.path().join("link");
        symlink(&real, &link).unwrap();

        let root = TargetRoot::ensure(&link).expect("root");
        assert_eq!(root.as_path(), real.canonicalize().unwrap());
    }
}

//! Zip-slip containment checks.

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{ExtractError, Result};
use crate::root::TargetRoot;

/// Produces the verified absolute destination for one entry.
///
/// The entry name is joined naively onto the root and the parent of the
/// result is created, then canonicalized and checked for containment.
/// Running the check after physical creation means symlinks already on
/// disk, including ones planted by earlier entries of the same archive,
/// cannot redirect the destination outside the root undetected.
///
/// Directories created before a violation is detected are left on disk;
/// each of them was inside the root at the moment of creation, and only
/// entries that would write through an escaped directory are blocked.
pub fn guard_destination(root: &TargetRoot, entry_name: &str) -> Result<PathBuf> {
    let dest = root.join_entry(entry_name);
    let dest_dir = dest.parent().map_or_else(|| dest.clone(), PathBuf::from);

    fs::create_dir_all(&dest_dir).map_err(|source| ExtractError::Entry {
        entry: entry_name.to_string(),
        source,
    })?;

    let canonical_dest_dir = dest_dir
        .canonicalize()
        .map_err(|source| ExtractError::Entry {
            entry: entry_name.to_string(),
            source,
        })?;

    if canonical_dest_dir.strip_prefix(root.as_path()).is_err() {
        debug!(
            entry = entry_name,
            resolved = %canonical_dest_dir.display(),
            "destination escapes target root"
        );
        return Err(ExtractError::OutOfBoundPath {
            entry: entry_name.to_string(),
            resolved: canonical_dest_dir,
        });
    }

    Ok(dest)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn root(temp: &TempDir) -> TargetRoot {
        TargetRoot::ensure(temp.path()).expect("root")
    }

    #[test]
    fn plain_entry_passes() {
        let temp = TempDir::new().unwrap();
        let root = root(&temp);
        let dest = guard_destination(&root, "a/b/file.txt").expect("contained");
        assert_eq!(dest, root.as_path().join("a/b/file.txt"));
        assert!(root.as_path().join("a/b").is_dir());
    }

    #[test]
    fn top_level_entry_passes() {
        let temp = TempDir::new().unwrap();
        let root = root(&temp);
        let dest = guard_destination(&root, "file.txt").expect("contained");
        assert_eq!(dest, root.as_path().join("file.txt"));
    }

    #[test]
    fn parent_traversal_rejected() {
        let temp = TempDir::new().unwrap();
        let inner = temp.path().join("inner");
        std::fs::create_dir(&inner).unwrap();
        let root = TargetRoot::ensure(&inner).unwrap();

        let err = guard_destination(&root, "a/../../escape.txt").unwrap_err();
        match err {
            ExtractError::OutOfBoundPath { entry, resolved } => {
                assert_eq!(entry, "a/../../escape.txt");
                assert!(resolved.strip_prefix(root.as_path()).is_err());
            }
            other => panic!("expected OutOfBoundPath, got {other:?}"),
        }
        assert!(!temp.path().join("escape.txt").exists());
        // The in-root prefix directory was created before detection and
        // stays behind.
        assert!(inner.join("a").is_dir());
    }

    #[test]
    #[cfg(unix)]
    fn symlink_redirect_rejected() {
        use std::os::unix::fs::symlink;

        let temp = TempDir::new().unwrap();
        let inner = temp.path().join("inner");
        std::fs::create_dir(&inner).unwrap();
        let root = TargetRoot::ensure(&inner).unwrap();

        // A symlink already on disk pointing outside the root.
        symlink(temp.path(), inner.join("sneaky")).unwrap();

        let err = guard_destination(&root, "sneaky/file.txt").unwrap_err();
        assert!(matches!(err, ExtractError::OutOfBoundPath { .. }));
        assert!(!temp.path().join("file.txt").exists());
    }

    #[test]
    #[cfg(unix)]
    fn symlink_inside_root_passes() {
        use std::os::unix::fs::symlink;

        let temp = TempDir::new().unwrap();
        let root = root(&temp);
        std::fs::create_dir(temp.path().join("real")).unwrap();
        symlink(temp.path().join("real"), temp.path().join("alias")).unwrap();

        let dest = guard_destination(&root, "alias/file.txt").expect("still inside root");
        assert!(dest.starts_with(root.as_path()));
    }
}

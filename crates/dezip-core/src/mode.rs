//! Decoding of per-entry type and permission metadata.
//!
//! Zip entries store Unix file type and permission bits in the upper half
//! of the central directory's external attribute word. Archives written on
//! DOS-family systems use the word differently, and some packers omit the
//! metadata entirely, so classification falls back to name- and
//! platform-based heuristics.

/// File type mask within a Unix mode word.
const S_IFMT: u32 = 0o170_000;
/// Type bits for a directory.
const S_IFDIR: u32 = 0o040_000;
/// Type bits for a symbolic link.
const S_IFLNK: u32 = 0o120_000;

/// Made-by platform tag for DOS-family systems.
const MADE_BY_DOS: u8 = 0;
/// The DOS external attribute value that marks a directory.
const DOS_DIRECTORY_ATTR: u32 = 16;

/// Semantic type of an archive entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link; the entry payload is the link target text.
    Symlink,
}

/// Decoded type and permission metadata for one entry.
///
/// Produced deterministically from the entry's raw attribute word; every
/// input yields a definite result. Entries with no usable metadata decode
/// as a regular file with a zero mode word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedMode {
    /// Semantic entry type.
    pub kind: EntryKind,
    /// The 16-bit Unix mode word extracted from the attribute word.
    /// Zero means the entry carries no usable permission info.
    pub unix_mode: u32,
}

impl DecodedMode {
    /// Decodes an entry's raw attribute word into a semantic type and
    /// permission bits.
    ///
    /// `made_by` is the platform half of the entry's "version made by"
    /// field and `trailing_slash` reports whether the archive-internal
    /// name ends with `/`.
    ///
    /// Classification uses the standard file type mask on the upper 16
    /// bits. Two fallbacks promote an entry to a directory when the type
    /// bits do not already say so: a trailing slash in the name (some
    /// packers write directories as zero-byte files), and the DOS
    /// directory attribute on DOS-made entries.
    #[must_use]
    pub fn decode(external_attributes: u32, made_by: u8, trailing_slash: bool) -> Self {
        let unix_mode = (external_attributes >> 16) & 0xFFFF;

        let mut kind = match unix_mode & S_IFMT {
            S_IFLNK => EntryKind::Symlink,
            S_IFDIR => EntryKind::Directory,
            _ => EntryKind::File,
        };

        // A directory verdict from either fallback wins over whatever
        // the type bits claimed, symlink included.
        if kind != EntryKind::Directory {
            if trailing_slash {
                kind = EntryKind::Directory;
            } else if made_by == MADE_BY_DOS && external_attributes == DOS_DIRECTORY_ATTR {
                kind = EntryKind::Directory;
            }
        }

        Self { kind, unix_mode }
    }

    /// Returns `true` if the entry carries usable permission info.
    ///
    /// A zero mode word is the signal for the materializer to apply the
    /// configured default instead.
    #[must_use]
    pub const fn has_mode(&self) -> bool {
        self.unix_mode != 0
    }

    /// Permission bits of the mode word, masked to `0o777`.
    #[must_use]
    pub const fn permission_bits(&self) -> u32 {
        self.unix_mode & 0o777
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_regular_file() {
        let decoded = DecodedMode::decode(0o100_644 << 16, 3, false);
        assert_eq!(decoded.kind, EntryKind::File);
        assert_eq!(decoded.permission_bits(), 0o644);
        assert!(decoded.has_mode());
    }

    #[test]
    fn unix_directory() {
        let decoded = DecodedMode::decode(0o040_755 << 16, 3, false);
        assert_eq!(decoded.kind, EntryKind::Directory);
        assert_eq!(decoded.permission_bits(), 0o755);
    }

    #[test]
    fn unix_symlink() {
        let decoded = DecodedMode::decode(0o120_777 << 16, 3, false);
        assert_eq!(decoded.kind, EntryKind::Symlink);
        assert_eq!(decoded.permission_bits(), 0o777);
    }

    #[test]
    fn trailing_slash_forces_directory() {
        let decoded = DecodedMode::decode(0, 3, true);
        assert_eq!(decoded.kind, EntryKind::Directory);
        assert!(!decoded.has_mode());
    }

    #[test]
    fn trailing_slash_overrides_symlink_bits() {
        let decoded = DecodedMode::decode(0o120_777 << 16, 3, true);
        assert_eq!(decoded.kind, EntryKind::Directory);
    }

    #[test]
    fn dos_directory_attribute() {
        let decoded = DecodedMode::decode(16, 0, false);
        assert_eq!(decoded.kind, EntryKind::Directory);
        assert!(!decoded.has_mode());
    }

    #[test]
    fn dos_attribute_ignored_for_other_platforms() {
        let decoded = DecodedMode::decode(16, 3, false);
        assert_eq!(decoded.kind, EntryKind::File);
    }

    #[test]
    fn unknown_metadata_defaults_to_file() {
        let decoded = DecodedMode::decode(0, 3, false);
        assert_eq!(decoded.kind, EntryKind::File);
        assert!(!decoded.has_mode());
        assert_eq!(decoded.permission_bits(), 0);
    }

    #[test]
    fn symlink_with_zero_permission_bits() {
        // Type bits alone make the word nonzero, so no default kicks in
        // even though the permission bits are empty.
        let decoded = DecodedMode::decode(S_IFLNK << 16, 3, false);
        assert_eq!(decoded.kind, EntryKind::Symlink);
        assert!(decoded.has_mode());
        assert_eq!(decoded.permission_bits(), 0);
    }
}

//! Per-entry metadata records.

use crate::encoding::NameEncoding;

/// Archive-internal prefix used by some packagers to store
/// platform-specific resource fork data. Entries under it are consumed
/// without producing any filesystem effect.
pub const METADATA_PREFIX: &str = "__MACOSX/";

/// One record from the archive's central directory.
///
/// Immutable snapshot of the metadata the session needs to process an
/// entry, and what an [`on_entry`](crate::ExtractOptions::on_entry)
/// observer gets to inspect.
#[derive(Debug, Clone)]
pub struct EntryRecord {
    /// Position of the entry in central directory order.
    pub index: usize,
    /// Archive-internal path, decoded per the configured name encoding.
    /// Uses forward slashes regardless of platform.
    pub name: String,
    /// Raw, undecoded name bytes as stored in the archive.
    pub raw_name: Vec<u8>,
    /// Raw platform attribute word from the central directory.
    pub external_attributes: u32,
    /// Platform half of the entry's "version made by" field.
    pub made_by: u8,
    /// Uncompressed size in bytes.
    pub size: u64,
    /// Compressed size in bytes.
    pub compressed_size: u64,
}

impl EntryRecord {
    /// Returns `true` if the archive-internal name ends with a path
    /// separator.
    #[must_use]
    pub fn has_trailing_slash(&self) -> bool {
        self.name.ends_with('/')
    }

    /// Returns `true` if the entry lives under the reserved
    /// archive-metadata prefix and must be skipped.
    #[must_use]
    pub fn is_metadata(&self) -> bool {
        self.name.starts_with(METADATA_PREFIX)
    }

    pub(crate) fn decode_name(raw: &[u8], default_name: &str, encoding: NameEncoding) -> String {
        encoding.decode(raw, default_name)
    }
}

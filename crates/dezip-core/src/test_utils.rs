//! Test utilities for building in-memory zip archives.
//!
//! # Panics
//!
//! Functions here may panic on I/O errors; they are designed for test
//! use only, where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Builder for in-memory zip archives with various entry types.
///
/// Entries are appended in call order, which is the central directory
/// order a reader will observe.
///
/// # Examples
///
/// ```
/// use dezip_core::test_utils::ZipTestBuilder;
///
/// let data = ZipTestBuilder::new()
///     .add_file("file.txt", b"content")
///     .add_directory("dir/")
///     .add_symlink("link", "file.txt")
///     .build();
/// ```
pub struct ZipTestBuilder {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    modeless_entries: Vec<String>,
}

impl ZipTestBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            modeless_entries: Vec::new(),
        }
    }

    /// Adds a regular file stored uncompressed with mode `0o644`.
    #[must_use]
    pub fn add_file(self, path: &str, data: &[u8]) -> Self {
        self.add_file_with_mode(path, data, 0o644)
    }

    /// Adds a regular file with the given permission bits. A zero mode
    /// produces an entry with no usable permission info.
    #[must_use]
    pub fn add_file_with_mode(mut self, path: &str, data: &[u8], mode: u32) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .unix_permissions(mode);
        self.zip.start_file(path, options).unwrap();
        self.zip.write_all(data).unwrap();
        if mode == 0 {
            self.modeless_entries.push(path.to_owned());
        }
        self
    }

    /// Adds an explicit directory entry.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        let options = SimpleFileOptions::default().unix_permissions(0o755);
        self.zip.add_directory(path, options).unwrap();
        self
    }

    /// Adds a directory entry carrying no permission info, written as a
    /// zero-byte file whose name ends with a slash.
    #[must_use]
    pub fn add_bare_directory(mut self, path: &str) -> Self {
        assert!(path.ends_with('/'), "bare directory name must end with /");
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .unix_permissions(0);
        self.zip.start_file(path, options).unwrap();
        self.modeless_entries.push(path.to_owned());
        self
    }

    /// Adds a symlink entry whose payload is the target text.
    #[must_use]
    pub fn add_symlink(mut self, path: &str, target: &str) -> Self {
        let options = SimpleFileOptions::default();
        self.zip.add_symlink(path, target, options).unwrap();
        self
    }

    /// Finishes the archive and returns its bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        let mut data = self.zip.finish().unwrap().into_inner();
        clear_external_attributes(&mut data, &self.modeless_entries);
        data
    }
}

/// Zeroes the central directory external attribute word for the named
/// entries. The zip writer unconditionally stamps a Unix file type bit
/// into the word, so a mode-zero entry would otherwise still carry a
/// nonzero mode word and look like it has permission info.
fn clear_external_attributes(data: &mut [u8], names: &[String]) {
    const CENTRAL_HEADER_SIG: [u8; 4] = [0x50, 0x4b, 0x01, 0x02];
    const EOCD_SIG: [u8; 4] = [0x50, 0x4b, 0x05, 0x06];

    if names.is_empty() {
        return;
    }

    let eocd = (0..data.len().saturating_sub(3))
        .rev()
        .find(|&i| data[i..i + 4] == EOCD_SIG)
        .unwrap();
    let entries = u16::from_le_bytes([data[eocd + 10], data[eocd + 11]]);
    let mut offset =
        u32::from_le_bytes([data[eocd + 16], data[eocd + 17], data[eocd + 18], data[eocd + 19]])
            as usize;

    for _ in 0..entries {
        assert_eq!(data[offset..offset + 4], CENTRAL_HEADER_SIG);
        let name_len = u16::from_le_bytes([data[offset + 28], data[offset + 29]]) as usize;
        let extra_len = u16::from_le_bytes([data[offset + 30], data[offset + 31]]) as usize;
        let comment_len = u16::from_le_bytes([data[offset + 32], data[offset + 33]]) as usize;
        let name = &data[offset + 46..offset + 46 + name_len];
        if names.iter().any(|n| n.as_bytes() == name) {
            data[offset + 38..offset + 42].fill(0);
        }
        offset += 46 + name_len + extra_len + comment_len;
    }
}

impl Default for ZipTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_produces_nonempty_archive() {
        let data = ZipTestBuilder::new()
            .add_file("file.txt", b"content")
            .add_directory("dir/")
            .build();
        assert!(!data.is_empty());
    }

    #[test]
    fn entries_round_trip_through_reader() {
        let data = ZipTestBuilder::new()
            .add_file("a.txt", b"aaa")
            .add_file("sub/b.txt", b"bbb")
            .build();

        let mut archive = zip::ZipArchive::new(Cursor::new(data)).unwrap();
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.by_index(0).unwrap().name(), "a.txt");
        assert_eq!(archive.by_index(1).unwrap().name(), "sub/b.txt");
    }
}

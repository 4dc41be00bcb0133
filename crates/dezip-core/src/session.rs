//! Session control flow: sequencing, cancellation, and the public
//! entry points.

use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use tracing::debug;
use zip::read::HasZipMetadata;
use zip::ZipArchive;

use crate::error::Result;
use crate::guard::guard_destination;
use crate::materialize::materialize;
use crate::mode::DecodedMode;
use crate::options::ExtractOptions;
use crate::record::EntryRecord;
use crate::root::TargetRoot;

/// One extraction run over an open archive.
///
/// The session owns the archive handle for its whole lifetime and
/// processes entries strictly in central directory order, one at a time:
/// entry N+1 is not requested until entry N has fully completed or
/// failed. The first failure cancels the session and becomes its single
/// terminal outcome; the handle is closed when the session resolves,
/// successfully or not.
pub struct ExtractionSession<R: Read + Seek> {
    archive: ZipArchive<R>,
    opts: ExtractOptions,
}

impl<R: Read + Seek> ExtractionSession<R> {
    /// Opens the archive's central directory.
    ///
    /// A malformed archive fails here, before any entry is looked at and
    /// before the target directory is touched.
    pub fn new(reader: R, opts: ExtractOptions) -> Result<Self> {
        let archive = ZipArchive::new(reader)?;
        Ok(Self { archive, opts })
    }

    /// Runs the session to completion.
    ///
    /// Establishes the target root, then materializes every entry in
    /// order. Resolves with the first error encountered; output already
    /// written at that point is left in place.
    pub fn run(mut self) -> Result<()> {
        let root = TargetRoot::ensure(&self.opts.target_dir)?;

        for index in 0..self.archive.len() {
            self.process_entry(index, &root)?;
        }

        debug!("zip extraction complete");
        Ok(())
    }

    fn process_entry(&mut self, index: usize, root: &TargetRoot) -> Result<()> {
        let mut file = self.archive.by_index(index)?;

        let record = {
            let md = file.get_metadata();
            let name =
                EntryRecord::decode_name(&md.file_name_raw, &md.file_name, self.opts.name_encoding);
            EntryRecord {
                index,
                name,
                raw_name: md.file_name_raw.to_vec(),
                external_attributes: md.external_attributes,
                made_by: md.system.into(),
                size: md.uncompressed_size,
                compressed_size: md.compressed_size,
            }
        };
        debug!(entry = %record.name, "zipfile entry");

        // The observer sees every yielded record, in yield order, before
        // any filesystem effect; it cannot alter or cancel extraction.
        if let Some(observer) = self.opts.on_entry.as_mut() {
            observer(&record);
        }

        if record.is_metadata() {
            debug!(entry = %record.name, "skipping metadata entry");
            return Ok(());
        }

        let decoded = DecodedMode::decode(
            record.external_attributes,
            record.made_by,
            record.has_trailing_slash(),
        );
        debug!(
            entry = %record.name,
            kind = ?decoded.kind,
            mode = format_args!("{:#o}", decoded.unix_mode),
            "decoded entry"
        );

        let dest = guard_destination(root, &record.name)?;
        materialize(&mut file, &record.name, decoded, &dest, &self.opts)
    }
}

/// Extracts a zip archive file into `opts.target_dir`.
///
/// Resolves once: either success, or the first error encountered (see
/// [`ExtractError`](crate::ExtractError)). Output written before a
/// failure is not rolled back.
///
/// # Examples
///
/// ```no_run
/// use dezip_core::ExtractOptions;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// dezip_core::extract("cats.zip", ExtractOptions::new("/tmp/cats"))?;
/// # Ok(())
/// # }
/// ```
pub fn extract<P: AsRef<Path>>(archive_path: P, opts: ExtractOptions) -> Result<()> {
    let path = archive_path.as_ref();
    debug!(archive = %path.display(), opts = ?opts, "extracting file");
    let file = File::open(path)?;
    ExtractionSession::new(file, opts)?.run()
}

/// Extracts a zip archive held in memory into `opts.target_dir`.
pub fn extract_buffer(data: &[u8], opts: ExtractOptions) -> Result<()> {
    debug!(len = data.len(), opts = ?opts, "extracting buffer");
    ExtractionSession::new(Cursor::new(data), opts)?.run()
}

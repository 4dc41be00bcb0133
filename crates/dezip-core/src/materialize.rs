//! Filesystem effects for decoded entries.

use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{ExtractError, Result};
use crate::mode::{DecodedMode, EntryKind};
use crate::options::ExtractOptions;

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Performs the concrete filesystem effect for one entry.
///
/// `dest` is the guarded destination path and `reader` yields the entry's
/// decompressed bytes. Directories never open the reader; symlinks consume
/// it entirely as the link-target text.
pub fn materialize<R: Read>(
    reader: &mut R,
    entry_name: &str,
    decoded: DecodedMode,
    dest: &Path,
    opts: &ExtractOptions,
) -> Result<()> {
    let entry_err = |source: io::Error| ExtractError::Entry {
        entry: entry_name.to_string(),
        source,
    };

    match decoded.kind {
        EntryKind::Directory => {
            let mode = resolved_mode(decoded, opts.default_dir_mode);
            debug!(dir = %dest.display(), mode = format_args!("{mode:#o}"), "creating directory");
            create_dir_with_mode(dest, mode).map_err(entry_err)
        }
        EntryKind::File => {
            let mode = resolved_mode(decoded, opts.default_file_mode);
            debug!(file = %dest.display(), mode = format_args!("{mode:#o}"), "writing file");
            write_file(reader, dest, mode).map_err(entry_err)
        }
        EntryKind::Symlink => {
            let mut target = String::new();
            reader.read_to_string(&mut target).map_err(entry_err)?;
            debug!(link = %dest.display(), target = %target, "creating symlink");
            create_symlink(&target, dest).map_err(entry_err)
        }
    }
}

/// Entry permission bits when present, else the configured default,
/// masked to `0o777`.
fn resolved_mode(decoded: DecodedMode, default_mode: u32) -> u32 {
    if decoded.has_mode() {
        decoded.permission_bits()
    } else {
        default_mode & 0o777
    }
}

#[cfg(unix)]
fn create_dir_with_mode(dest: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new().recursive(true).mode(mode).create(dest)
}

#[cfg(not(unix))]
fn create_dir_with_mode(dest: &Path, _mode: u32) -> io::Result<()> {
    fs::create_dir_all(dest)
}

fn write_file<R: Read>(reader: &mut R, dest: &Path, mode: u32) -> io::Result<()> {
    let file = open_with_mode(dest, mode)?;
    let mut writer = BufWriter::with_capacity(COPY_BUFFER_SIZE, file);
    io::copy(reader, &mut writer)?;
    writer.flush()
}

#[cfg(unix)]
fn open_with_mode(dest: &Path, mode: u32) -> io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;

    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(mode)
        .open(dest)
}

#[cfg(not(unix))]
fn open_with_mode(dest: &Path, _mode: u32) -> io::Result<fs::File> {
    fs::File::create(dest)
}

#[cfg(unix)]
fn create_symlink(target: &str, dest: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, dest)
}

#[cfg(not(unix))]
fn create_symlink(_target: &str, _dest: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symbolic links are not supported on this platform",
    ))
}

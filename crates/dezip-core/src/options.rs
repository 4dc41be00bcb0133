//! Extraction configuration.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::encoding::NameEncoding;
use crate::record::EntryRecord;

/// Default mode for directories whose entries carry no permission info.
pub const DEFAULT_DIR_MODE: u32 = 0o755;
/// Default mode for files whose entries carry no permission info.
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// Advisory observer invoked with each entry record before it is
/// materialized. Observers can inspect entries but cannot alter or
/// cancel extraction.
pub type EntryObserver = Box<dyn FnMut(&EntryRecord)>;

/// Configuration for one extraction session.
///
/// # Examples
///
/// ```no_run
/// use dezip_core::ExtractOptions;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let opts = ExtractOptions::new("/tmp/output")
///     .default_file_mode(0o600)
///     .on_entry(|entry| println!("{}", entry.name));
/// dezip_core::extract("archive.zip", opts)?;
/// # Ok(())
/// # }
/// ```
pub struct ExtractOptions {
    pub(crate) target_dir: PathBuf,
    pub(crate) default_dir_mode: u32,
    pub(crate) default_file_mode: u32,
    pub(crate) name_encoding: NameEncoding,
    pub(crate) on_entry: Option<EntryObserver>,
}

impl ExtractOptions {
    /// Creates options targeting `target_dir`.
    ///
    /// The target directory must be absolute; this is checked when
    /// extraction starts, before anything touches the filesystem.
    #[must_use]
    pub fn new<P: AsRef<Path>>(target_dir: P) -> Self {
        Self {
            target_dir: target_dir.as_ref().to_path_buf(),
            default_dir_mode: DEFAULT_DIR_MODE,
            default_file_mode: DEFAULT_FILE_MODE,
            name_encoding: NameEncoding::default(),
            on_entry: None,
        }
    }

    /// Sets the mode applied to directories whose entries carry no
    /// permission info. Defaults to `0o755`.
    #[must_use]
    pub fn default_dir_mode(mut self, mode: u32) -> Self {
        self.default_dir_mode = mode;
        self
    }

    /// Sets the mode applied to regular files whose entries carry no
    /// permission info. Defaults to `0o644`.
    #[must_use]
    pub fn default_file_mode(mut self, mode: u32) -> Self {
        self.default_file_mode = mode;
        self
    }

    /// Sets the encoding used to decode archive-internal entry names.
    #[must_use]
    pub fn name_encoding(mut self, encoding: NameEncoding) -> Self {
        self.name_encoding = encoding;
        self
    }

    /// Installs an observer invoked once per yielded entry, in yield
    /// order, before that entry's filesystem effect. Metadata entries
    /// that are otherwise skipped are still reported.
    #[must_use]
    pub fn on_entry<F: FnMut(&EntryRecord) + 'static>(mut self, observer: F) -> Self {
        self.on_entry = Some(Box::new(observer));
        self
    }

    /// The configured target directory.
    #[must_use]
    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }
}

impl fmt::Debug for ExtractOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractOptions")
            .field("target_dir", &self.target_dir)
            .field("default_dir_mode", &format_args!("{:#o}", self.default_dir_mode))
            .field("default_file_mode", &format_args!("{:#o}", self.default_file_mode))
            .field("name_encoding", &self.name_encoding)
            .field("on_entry", &self.on_entry.as_ref().map(|_| "<observer>"))
            .finish()
    }
}

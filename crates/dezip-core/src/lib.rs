//! Safe zip extraction with zip-slip protection.
//!
//! `dezip-core` materializes the contents of a zip archive onto the
//! filesystem while defending against archives that try to write outside
//! the target directory, forge symbolic links, or encode ambiguous
//! permission and type metadata. Entries are processed one at a time, in
//! central directory order, and the first failure cancels the session.
//!
//! # Examples
//!
//! ```no_run
//! use dezip_core::ExtractOptions;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! dezip_core::extract("archive.zip", ExtractOptions::new("/tmp/output"))?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod encoding;
pub mod error;
pub mod guard;
pub mod materialize;
pub mod mode;
pub mod options;
pub mod record;
pub mod root;
pub mod session;
pub mod test_utils;

pub use encoding::NameEncoding;
pub use error::ExtractError;
pub use error::Result;
pub use mode::DecodedMode;
pub use mode::EntryKind;
pub use options::ExtractOptions;
pub use record::EntryRecord;
pub use root::TargetRoot;
pub use session::extract;
pub use session::extract_buffer;
pub use session::ExtractionSession;

//! Library export discovery and parsing.

/// Enumeration of `*_library.json` export files.
pub mod discovery;
/// Conversion of export documents into canonical records.
pub mod extractor;
/// Optional-path helpers over untyped JSON.
pub mod json_path;

pub use discovery::{library_files, LIBRARY_FILE_SUFFIX};
pub use extractor::{extract_records, parse_record};

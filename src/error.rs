//! Error types for combining and splitting.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that abort a combine or split operation.
///
/// Per-file ingestion problems are not in here; those are reported as
/// [`EntryError`] values so one bad file does not sink the batch.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Combine was called on an empty collection.
    #[error("no files to combine")]
    EmptyCollection,

    /// Split input has no manifest and no recognizable start delimiters.
    #[error("not a combined document: no manifest and no start delimiters found")]
    UnrecognizedFormat,

    /// An archive could not be opened at all.
    #[error("failed to open archive '{archive}': {source}")]
    ZipOpen {
        archive: String,
        #[source]
        source: zip::result::ZipError,
    },

    /// Writing the split output archive failed.
    #[error("failed to write archive: {0}")]
    ZipWrite(#[from] zip::result::ZipError),

    /// An exclusion pattern did not compile.
    #[error("invalid exclusion pattern: {0}")]
    Pattern(#[from] globset::Error),

    /// Manifest serialization or deserialization failed.
    #[error("manifest JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure tied to a single archive member.
///
/// Collected and reported per entry while the rest of the archive is
/// still processed.
#[derive(Error, Debug)]
#[error("'{path}' in '{archive}': {reason}")]
pub struct EntryError {
    pub archive: String,
    pub path: String,
    pub reason: String,
}

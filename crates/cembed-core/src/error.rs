//! Error types for the cembed-core library.
//!
//! This module provides error handling using the `thiserror` crate, with
//! detailed error variants for different failure modes. No variant is
//! recoverable: every error aborts the current run.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for cembed operations
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error type for all cembed operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A scan root given to the spec builder does not exist
    #[error("directory '{path}' not found")]
    MissingDirectory {
        /// The nonexistent root directory
        path: PathBuf,
    },

    /// Directory traversal failed partway through a scan
    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// Failed to open an input file listed in the spec
    #[error("could not open file '{path}': {source}")]
    FileOpen {
        /// Path to the file that failed to open
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to read an input file partway through encoding
    #[error("failed to read file '{path}' at byte {offset}: {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: PathBuf,
        /// Byte offset where the read failed
        offset: u64,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to write an output file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        /// Path to the file that failed to write
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a spec document
    #[error("failed to parse spec document: {0}")]
    SpecParse(#[source] serde_json::Error),

    /// Failed to serialize a spec document
    #[error("failed to serialize spec document: {0}")]
    SpecSerialize(#[source] serde_json::Error),

    /// Two independent size observations of the same file disagree
    ///
    /// Raised when the byte count read from a file does not match the size
    /// probed from filesystem metadata at the start of the run, e.g. because
    /// the file was truncated or extended while it was being encoded.
    #[error("file size and count of read bytes mismatch ({expected} != {actual}) for file '{path}'")]
    SizeMismatch {
        /// Path to the file whose observations disagree
        path: PathBuf,
        /// Size reported by filesystem metadata
        expected: u64,
        /// Number of bytes actually read
        actual: u64,
    },

    /// I/O failure while emitting generated source
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a new missing directory error
    pub fn missing_directory(path: impl Into<PathBuf>) -> Self {
        Self::MissingDirectory { path: path.into() }
    }

    /// Creates a new file open error
    pub fn file_open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileOpen {
            path: path.into(),
            source,
        }
    }

    /// Creates a new file read error
    pub fn file_read(path: impl Into<PathBuf>, offset: u64, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            offset,
            source,
        }
    }

    /// Creates a new file write error
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates a new size mismatch error
    pub fn size_mismatch(path: impl Into<PathBuf>, expected: u64, actual: u64) -> Self {
        Self::SizeMismatch {
            path: path.into(),
            expected,
            actual,
        }
    }

    /// Returns true if this error indicates an internal-consistency fault
    /// rather than bad user input or a plain I/O failure
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::SizeMismatch { .. })
    }
}

//! Error taxonomy for the analysis pipeline.
//!
//! File-scoped failures (`FilenameFormat`, `InvalidConfiguration`,
//! `EmptySample`, `InvalidSample`, `InvalidEncoding`) are recoverable at the
//! result store: the store skips the file and keeps going unless strict mode
//! is on.
//! Directory-level failures abort the run.
//!
//! Degenerate histograms and duplicate configurations are warnings, not
//! errors. They are logged and recorded as data on the values involved.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur while analyzing a latency result directory.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// File name matches neither `<datatype>_<N>` nor `<datatype>_el<N>_par<M>`.
    #[error("malformed configuration file name `{name}`: {reason}")]
    FilenameFormat {
        /// Offending file name.
        name: String,
        /// What did not match.
        reason: String,
    },

    /// Configuration fields violate an invariant (empty datatype, zero counts).
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Violated invariant.
        reason: String,
    },

    /// Sample array had zero elements.
    #[error("sample array is empty; mean and standard deviation are undefined")]
    EmptySample,

    /// A token in a sample file is not a finite number.
    #[error("invalid latency sample `{token}` on line {line}")]
    InvalidSample {
        /// Token as it appeared in the file.
        token: String,
        /// 1-based line number.
        line: usize,
    },

    /// Sample file contents are not UTF-8 text.
    #[error("sample file is not valid UTF-8: {source}")]
    InvalidEncoding {
        /// Decoder error, with the offset of the first bad byte.
        #[source]
        source: std::str::Utf8Error,
    },

    /// Input directory does not exist or is not a directory.
    #[error("input directory `{}` does not exist or is not a directory", .path.display())]
    MissingDirectory {
        /// Directory that was requested.
        path: PathBuf,
    },

    /// Two files resolve to the same configuration under the `reject` policy.
    #[error("`{first}` and `{second}` both resolve to configuration {configuration}")]
    DuplicateConfiguration {
        /// Display form of the colliding configuration.
        configuration: String,
        /// File processed first.
        first: String,
        /// File processed second.
        second: String,
    },

    /// A file-scoped error, tagged with the file that produced it.
    #[error("failed to analyze `{}`: {source}", .file.display())]
    File {
        /// File being analyzed.
        file: PathBuf,
        /// Underlying error.
        #[source]
        source: Box<AnalysisError>,
    },

    /// Filesystem failure.
    #[error("I/O error on `{}`: {source}", .path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Image encoding failure in the PNG backend.
    #[error("failed to render `{}`: {source}", .path.display())]
    Render {
        /// Artifact path.
        path: PathBuf,
        /// Underlying encoder error.
        #[source]
        source: png::EncodingError,
    },

    /// Summary serialization failure.
    #[error("failed to serialize summary: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalysisError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        AnalysisError::Io {
            path: path.into(),
            source,
        }
    }

    /// Tag a file-scoped error with its file. Already-tagged errors pass through.
    pub fn in_file(self, file: impl Into<PathBuf>) -> Self {
        match self {
            AnalysisError::File { .. } => self,
            other => AnalysisError::File {
                file: file.into(),
                source: Box::new(other),
            },
        }
    }

    /// Whether the error only concerns one input file.
    pub fn is_file_scoped(&self) -> bool {
        match self {
            AnalysisError::FilenameFormat { .. }
            | AnalysisError::InvalidConfiguration { .. }
            | AnalysisError::EmptySample
            | AnalysisError::InvalidSample { .. }
            | AnalysisError::InvalidEncoding { .. } => true,
            AnalysisError::File { source, .. } => source.is_file_scoped(),
            _ => false,
        }
    }
}

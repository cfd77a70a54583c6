//! Error types for the gradient-wind-analysis crate.
use std::path::PathBuf;

/// Error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// A line had the wrong number of fields.
    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        /// 1-based line number in the input.
        line: usize,
        /// Number of fields required.
        expected: usize,
        /// Number of fields actually present.
        found: usize,
    },
    /// The timestamp field could not be parsed.
    #[error("line {line}: invalid timestamp '{value}'")]
    InvalidTimestamp {
        /// 1-based line number in the input.
        line: usize,
        /// The offending text.
        value: String,
    },
    /// A numeric field could not be parsed.
    #[error("line {line}: invalid {field} '{value}'")]
    InvalidNumber {
        /// 1-based line number in the input.
        line: usize,
        /// Name of the field.
        field: &'static str,
        /// The offending text.
        value: String,
    },
    /// The gradient wind or temperature was missing, only the surface wind may be.
    #[error("line {line}: missing {field}")]
    MissingValue {
        /// 1-based line number in the input.
        line: usize,
        /// Name of the field.
        field: &'static str,
    },
    /// Strict cluster lookup found no cluster containing the point.
    #[error("No matching cluster.")]
    NoMatchingCluster,
    /// The requested station is not part of the archive.
    #[error("unknown station '{0}'")]
    UnknownStation(String),
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Failure reading a data file.
    #[error("error reading {path}: {source}")]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Shorthand for results.
pub type Result<T> = ::std::result::Result<T, AnalysisError>;

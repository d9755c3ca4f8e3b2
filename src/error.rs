use std::path::PathBuf;
use thiserror::Error;

use crate::format::Version;
use crate::validation::ValidationReport;

/// The main error type for jdx operations.
#[derive(Debug, Error)]
pub enum JdxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a JDX file: expected magic {expected:?}, found {found:?}")]
    BadMagic { expected: Vec<u8>, found: Vec<u8> },

    #[error("Unsupported JDX version {found} (supported major versions: {supported:?})")]
    UnsupportedVersion {
        found: Version,
        supported: &'static [u16],
    },

    #[error(
        "Truncated input at byte {offset}: {context} needs {needed} byte(s), \
         only {available} available"
    )]
    Truncated {
        offset: u64,
        needed: u64,
        available: u64,
        context: &'static str,
    },

    #[error("Invalid annotation {annotation} in item {item}: {message}")]
    InvalidAnnotation {
        item: u64,
        annotation: usize,
        message: String,
    },

    #[error("{bytes} byte(s) of trailing data after the last item (at byte {offset})")]
    TrailingData { offset: u64, bytes: u64 },

    #[error("Malformed JDX data at byte {offset}: {message}")]
    Format { offset: u64, message: String },

    #[error("Failed to parse manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid manifest {path}: {message}")]
    ManifestInvalid { path: PathBuf, message: String },

    #[error("Failed to render report as JSON: {0}")]
    ReportJson(#[source] serde_json::Error),

    #[error("Validation failed with {error_count} error(s) and {warning_count} warning(s)")]
    ValidationFailed {
        error_count: usize,
        warning_count: usize,
        report: ValidationReport,
    },
}

impl JdxError {
    /// Returns true if the source was readable but its contents are not a
    /// valid JDX dataset.
    ///
    /// I/O failures (missing file, permission denied) return false so callers
    /// can tell "couldn't open" apart from "opened but invalid".
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            JdxError::BadMagic { .. }
                | JdxError::UnsupportedVersion { .. }
                | JdxError::Truncated { .. }
                | JdxError::InvalidAnnotation { .. }
                | JdxError::TrailingData { .. }
                | JdxError::Format { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_are_not_format_errors() {
        let err = JdxError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        assert!(!err.is_format_error());
    }

    #[test]
    fn truncation_is_a_format_error() {
        let err = JdxError::Truncated {
            offset: 10,
            needed: 8,
            available: 2,
            context: "item count",
        };
        assert!(err.is_format_error());
        assert!(err.to_string().contains("item count"));
    }
}

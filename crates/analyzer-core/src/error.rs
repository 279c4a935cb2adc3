use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the Running Analyzer.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// A source file does not exist or could not be opened.
    #[error("Source not found {path}: {source}")]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source file exists but its table, or a required field in it, could
    /// not be parsed.
    #[error("Malformed source {path}: {reason}")]
    MalformedSource { path: PathBuf, reason: String },

    /// Neither the canonical file nor the raw fallback produced a dataset.
    #[error("Data unavailable: could not load {path} or process raw data: {source}")]
    DataUnavailable {
        path: PathBuf,
        #[source]
        source: Box<AnalyzerError>,
    },

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AnalyzerError {
    /// Shorthand for building a [`AnalyzerError::MalformedSource`].
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedSource {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the analyzer crates.
pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_source_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = AnalyzerError::SourceNotFound {
            path: PathBuf::from("/data/raw/activities.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Source not found"));
        assert!(msg.contains("/data/raw/activities.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_malformed_source() {
        let err = AnalyzerError::malformed("/tmp/a.csv", "missing header row");
        assert_eq!(err.to_string(), "Malformed source /tmp/a.csv: missing header row");
    }

    #[test]
    fn test_error_display_data_unavailable_wraps_cause() {
        let inner = AnalyzerError::malformed("/raw.csv", "bad date");
        let err = AnalyzerError::DataUnavailable {
            path: PathBuf::from("/clean.csv"),
            source: Box::new(inner),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Data unavailable"));
        assert!(msg.contains("/clean.csv"));
        assert!(msg.contains("bad date"));

        let source = std::error::Error::source(&err).expect("has a source");
        assert!(source.to_string().contains("/raw.csv"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AnalyzerError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }
}

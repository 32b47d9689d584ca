//! Error types for RepoGrade core.

use std::{error::Error, fmt};

/// Error type for RepoGrade operations.
#[derive(Debug)]
pub enum RepoGradeError {
    /// The repository reference could not be parsed.
    InvalidReference(String),
    /// A call to the repository hosting API failed.
    Upstream {
        /// Name of the failed fetch (e.g. "metadata").
        operation: &'static str,
        /// Transport or status detail, for server-side logs only.
        message: String,
    },
    /// A catch-all error with a message.
    Other(String),
}

impl RepoGradeError {
    /// Build an upstream error for the named fetch.
    pub fn upstream(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Upstream {
            operation,
            message: message.into(),
        }
    }

    /// Whether the error was caused by caller input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidReference(_))
    }
}

impl fmt::Display for RepoGradeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidReference(reference) => {
                write!(f, "invalid GitHub repository URL: {reference}")
            }
            Self::Upstream { operation, message } => {
                write!(f, "upstream {operation} request failed: {message}")
            }
            Self::Other(message) => write!(f, "{message}"),
        }
    }
}

impl Error for RepoGradeError {}

impl From<serde_json::Error> for RepoGradeError {
    fn from(value: serde_json::Error) -> Self {
        Self::Other(format!("json error: {value}"))
    }
}

/// Convenience result type for RepoGrade core.
pub type Result<T> = std::result::Result<T, RepoGradeError>;

#[cfg(test)]
mod tests {
    use super::RepoGradeError;

    #[test]
    fn invalid_reference_formats_message() {
        let error = RepoGradeError::InvalidReference("gitlab.com/a/b".to_string());
        assert_eq!(
            format!("{error}"),
            "invalid GitHub repository URL: gitlab.com/a/b"
        );
        assert!(error.is_client_error());
    }

    #[test]
    fn upstream_error_formats_operation() {
        let error = RepoGradeError::upstream("branches", "status 502");
        assert_eq!(
            format!("{error}"),
            "upstream branches request failed: status 502"
        );
        assert!(!error.is_client_error());
    }

    #[test]
    fn from_json_error_maps_to_other() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: RepoGradeError = json_error.into();
        match error {
            RepoGradeError::Other(message) => assert!(message.starts_with("json error")),
            _ => panic!("expected Other variant"),
        }
    }
}

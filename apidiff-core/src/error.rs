//! Error types for apidiff-core.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for apidiff-core operations.
pub type Result<T> = std::result::Result<T, ApiDiffError>;

/// Errors raised while loading or writing metadata documents.
///
/// Comparison itself never fails; only getting a model in or out can.
#[derive(Error, Debug)]
pub enum ApiDiffError {
    /// A metadata document could not be read or written.
    #[error("IO error on {}: {source}", path.display())]
    Io {
        /// File that was being accessed.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not a valid metadata model.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but violates a model invariant.
    #[error("Invalid module {module}: {message}")]
    InvalidModule {
        /// Name of the offending module.
        module: String,
        /// Description of the violated invariant.
        message: String,
    },
}

impl ApiDiffError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ApiDiffError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(module: &str, message: impl Into<String>) -> Self {
        ApiDiffError::InvalidModule {
            module: module.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiDiffError::invalid("Lib", "duplicate type Lib.Widget");
        assert!(err.to_string().contains("Lib"));
        assert!(err.to_string().contains("duplicate type Lib.Widget"));

        let err = ApiDiffError::io(
            "/missing/lib.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert!(err.to_string().contains("/missing/lib.json"));
    }
}

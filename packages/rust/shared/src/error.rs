//! Error types for vetdischarge.
//!
//! Library crates use [`DischargeError`] via `thiserror`.
//! The CLI app wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for every stage of the discharge-note pipeline.
#[derive(Debug, thiserror::Error)]
pub enum DischargeError {
    /// Input unreadable, or output path unwritable.
    #[error("file access error at {path:?}: {source}")]
    FileAccess {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Input is not well-formed JSON or lacks an expected key.
    #[error("format error in {path:?}: {message}")]
    Format { path: PathBuf, message: String },

    /// No API key was found in the configured environment variable.
    #[error("missing API key: set the {var} environment variable")]
    MissingCredential { var: String },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network, authentication, or response-shape failure from the completion service.
    #[error("remote service error: {0}")]
    RemoteService(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DischargeError>;

impl DischargeError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a format error for the given file.
    pub fn format(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Format {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// Create a remote service error from any displayable message.
    pub fn remote(msg: impl Into<String>) -> Self {
        Self::RemoteService(msg.into())
    }

    /// Whether this is the anticipated missing-API-key failure.
    pub fn is_missing_credential(&self) -> bool {
        matches!(self, Self::MissingCredential { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = DischargeError::config("base_url is not a valid URL");
        assert_eq!(err.to_string(), "config error: base_url is not a valid URL");

        let err = DischargeError::MissingCredential {
            var: "OPENAI".into(),
        };
        assert!(err.to_string().contains("OPENAI"));
        assert!(err.is_missing_credential());

        let err = DischargeError::remote("HTTP 429 Too Many Requests");
        assert!(!err.is_missing_credential());
        assert!(err.to_string().contains("429"));
    }

    #[test]
    fn file_access_keeps_path() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = DischargeError::file_access("data/missing.json", io);
        assert!(err.to_string().contains("missing.json"));
        assert!(matches!(err, DischargeError::FileAccess { .. }));
    }
}

//! Custom error types for reelsync

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for reelsync operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("YouTube API error {status} ({reason}): {message}")]
    Api {
        status: u16,
        reason: String,
        message: String,
    },

    #[error("Pagination error: {0}")]
    Pagination(String),

    #[error("Invalid record {key}: {reason}")]
    InvalidRecord { key: String, reason: String },

    #[error("Video not found: {0}")]
    VideoNotFound(String),

    #[error("Playlist not found: {0}")]
    PlaylistNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("{0}")]
    Other(String),
}

/// How a failure should be handled by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// The run cannot continue (source API, transport, I/O)
    Fatal,
    /// A single record failed; the batch continues with the next one
    Recoverable,
    /// Settings are missing or invalid; nothing was attempted
    Configuration,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Fatal => write!(f, "fatal"),
            ErrorKind::Recoverable => write!(f, "recoverable"),
            ErrorKind::Configuration => write!(f, "configuration"),
        }
    }
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_)
            | Error::UrlParse(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_) => ErrorKind::Configuration,

            Error::InvalidRecord { .. }
            | Error::VideoNotFound(_)
            | Error::PlaylistNotFound(_)
            | Error::Json(_) => ErrorKind::Recoverable,

            Error::Database(err) => database_error_kind(err),

            Error::Http(_)
            | Error::Api { .. }
            | Error::Pagination(_)
            | Error::Io(_)
            | Error::Other(_) => ErrorKind::Fatal,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.kind() == ErrorKind::Recoverable
    }

    pub fn invalid_record(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidRecord {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Constraint violations concern a single row; everything else means the store is unusable
fn database_error_kind(err: &sqlx::Error) -> ErrorKind {
    match err {
        sqlx::Error::Database(db_err) => match db_err.kind() {
            sqlx::error::ErrorKind::UniqueViolation
            | sqlx::error::ErrorKind::ForeignKeyViolation
            | sqlx::error::ErrorKind::NotNullViolation
            | sqlx::error::ErrorKind::CheckViolation => ErrorKind::Recoverable,
            _ => ErrorKind::Fatal,
        },
        sqlx::Error::RowNotFound => ErrorKind::Recoverable,
        _ => ErrorKind::Fatal,
    }
}

/// Result type alias for reelsync
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors() {
        assert_eq!(
            Error::Config("missing YOUTUBE_API_KEY".to_string()).kind(),
            ErrorKind::Configuration
        );
        let bad_toml = toml::from_str::<toml::Value>("= nope").unwrap_err();
        assert_eq!(Error::from(bad_toml).kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_record_errors_are_recoverable() {
        let err = Error::invalid_record("abc123", "missing title");
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "Invalid record abc123: missing title");
        assert!(Error::VideoNotFound("abc123".to_string()).is_recoverable());
        assert_eq!(
            Error::Database(sqlx::Error::RowNotFound).kind(),
            ErrorKind::Recoverable
        );
    }

    #[test]
    fn test_source_errors_are_fatal() {
        let err = Error::Api {
            status: 403,
            reason: "quotaExceeded".to_string(),
            message: "The request cannot be completed".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Fatal);
        assert_eq!(
            Error::Pagination("token repeated".to_string()).kind(),
            ErrorKind::Fatal
        );
        assert_eq!(Error::Database(sqlx::Error::PoolClosed).kind(), ErrorKind::Fatal);
    }
}

use std::fmt;
use thiserror::Error;

/// The error type for edgegrid operations.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No credential source at all: no edgerc path configured and no
    /// complete set of environment variables.
    ConfigNoSource,

    /// The edgerc file could not be read.
    ConfigFileNotFound,

    /// The requested edgerc section does not exist (or is empty).
    ConfigSectionNotFound,

    /// The resolved configuration is missing required fields.
    ConfigMissingFields,

    /// Request cannot be signed (unresolvable url, bad header value, etc.).
    RequestInvalid,

    /// Unexpected errors (network, I/O, transport failures, etc.).
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error.
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Check if this is a configuration error.
    ///
    /// Configuration errors are terminal: they surface before any request
    /// is attempted and are never retried.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::ConfigNoSource
                | ErrorKind::ConfigFileNotFound
                | ErrorKind::ConfigSectionNotFound
                | ErrorKind::ConfigMissingFields
        )
    }
}

// Convenience constructors
impl Error {
    /// Create a no-source config error.
    pub fn config_no_source(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigNoSource, message)
    }

    /// Create a file-not-found config error.
    pub fn config_file_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigFileNotFound, message)
    }

    /// Create a section-not-found config error.
    pub fn config_section_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigSectionNotFound, message)
    }

    /// Create a missing-fields config error.
    pub fn config_missing_fields(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigMissingFields, message)
    }

    /// Create a request invalid error.
    pub fn request_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestInvalid, message)
    }

    /// Create an unexpected error.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ConfigNoSource => write!(f, "no credential source"),
            ErrorKind::ConfigFileNotFound => write!(f, "edgerc file not found"),
            ErrorKind::ConfigSectionNotFound => write!(f, "edgerc section not found"),
            ErrorKind::ConfigMissingFields => write!(f, "incomplete credentials"),
            ErrorKind::RequestInvalid => write!(f, "invalid request"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUriParts> for Error {
    fn from(err: http::uri::InvalidUriParts) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderName> for Error {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::ToStrError> for Error {
    fn from(err: http::header::ToStrError) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

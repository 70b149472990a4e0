//! Error types for the ScreenshotOne client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or executing a request
#[derive(Error, Debug)]
pub enum Error {
    /// A signed URL was requested but the client has no secret key
    #[error("secret key is required to sign requests")]
    MissingSecret,

    /// The base endpoint could not be turned into a `take` URL
    #[error("failed to construct request URL: {0}")]
    UrlConstruction(String),

    /// Network-level failure (connect, TLS, read)
    #[error("failed to execute HTTP request: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The API answered with a status other than 200 or 201
    #[error("the server returned a response: {}", status_line(.status, .status_text))]
    Remote { status: u16, status_text: String },

    /// The caller cancelled the request before it completed
    #[error("request cancelled")]
    Cancelled,

    /// Operation timed out
    #[error("operation timed out after {0}ms")]
    Timeout(u64),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    ConfigError(String),
}

/// `"<code> <reason>"`, or just the code when the reason is unknown.
fn status_line(status: &u16, status_text: &str) -> String {
    if status_text.is_empty() {
        status.to_string()
    } else {
        format!("{} {}", status, status_text)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::UrlConstruction(err.to_string())
    }
}

impl Error {
    /// Wrap any transport-level failure.
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Transport(err.into())
    }

    /// HTTP status carried by a [`Error::Remote`], if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(feature = "reqwest-transport")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_reads_like_status_line() {
        let err = Error::Remote {
            status: 400,
            status_text: "Bad Request".into(),
        };
        assert!(err.to_string().contains("400 Bad Request"));
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn remote_error_without_reason_has_no_trailing_space() {
        let err = Error::Remote {
            status: 599,
            status_text: String::new(),
        };
        assert_eq!(err.to_string(), "the server returned a response: 599");
    }

    #[test]
    fn transport_error_keeps_its_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = Error::transport(io);
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.status(), None);
    }
}

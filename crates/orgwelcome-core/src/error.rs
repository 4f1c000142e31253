//! Error types for orgwelcome-core

use std::fmt;

/// Result type alias for orgwelcome operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for orgwelcome operations
#[derive(Debug)]
pub enum Error {
    /// Invalid or missing configuration
    Config(String),

    /// GitHub event payload error
    EventParse(String),

    /// HTTP/API error
    Http(String),

    /// API rate limit exceeded
    RateLimitExceeded(String),

    /// A named remote entity (repository, pull request, team, user) was not found
    Lookup(String),

    /// An organization invitation failed for a specific login
    Invitation {
        /// The login the invitation was issued for
        login: String,
        /// The remote platform's failure message
        message: String,
    },

    /// I/O error
    Io(std::io::Error),

    /// Runtime error (Tokio)
    Runtime(String),

    /// Other errors
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::EventParse(msg) => write!(f, "Event parse error: {}", msg),
            Error::Http(msg) => write!(f, "HTTP error: {}", msg),
            Error::RateLimitExceeded(msg) => write!(f, "Rate limit exceeded: {}", msg),
            Error::Lookup(msg) => write!(f, "Lookup error: {}", msg),
            Error::Invitation { login, message } => {
                write!(f, "Failed to invite @{}: {}", login, message)
            }
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Runtime(msg) => write!(f, "Runtime error: {}", msg),
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::EventParse(err.to_string())
    }
}

/// Fieldless error category for zero-cost pattern matching.
///
/// Single byte representation (`#[repr(u8)]`), `Copy`, no allocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorKind {
    /// Invalid or missing configuration
    Config,
    /// GitHub event payload error
    EventParse,
    /// HTTP/API error
    Http,
    /// API rate limit exceeded
    RateLimitExceeded,
    /// Remote entity not found
    Lookup,
    /// Organization invitation failure
    Invitation,
    /// I/O operation error
    Io,
    /// Runtime error
    Runtime,
    /// Other errors
    Other,
}

impl Error {
    /// Get the error kind — zero allocation, returns a Copy enum.
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Config,
            Error::EventParse(_) => ErrorKind::EventParse,
            Error::Http(_) => ErrorKind::Http,
            Error::RateLimitExceeded(_) => ErrorKind::RateLimitExceeded,
            Error::Lookup(_) => ErrorKind::Lookup,
            Error::Invitation { .. } => ErrorKind::Invitation,
            Error::Io(_) => ErrorKind::Io,
            Error::Runtime(_) => ErrorKind::Runtime,
            Error::Other(_) => ErrorKind::Other,
        }
    }

    /// Borrow the error message — zero allocation.
    #[inline]
    pub fn message(&self) -> &str {
        match self {
            Error::Config(msg)
            | Error::EventParse(msg)
            | Error::Http(msg)
            | Error::RateLimitExceeded(msg)
            | Error::Lookup(msg)
            | Error::Runtime(msg)
            | Error::Other(msg) => msg,
            Error::Invitation { message, .. } => message,
            Error::Io(_) => "I/O error",
        }
    }
}

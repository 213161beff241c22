//! Error types for the danfo-quote library
//!
//! Covers the I/O and HTTP edges of the estimator. "No answer" outcomes
//! (an address that matches no state, a distance that cannot be estimated)
//! are ordinary values, not errors; see the matcher and resolver modules.

use std::fmt;

/// Main error type for danfo-quote operations
#[derive(Debug)]
pub enum Error {
    /// Geocoding request completed but the response could not be used
    GeocodingFailed(String),

    /// HTTP-specific error
    HttpError(String),

    /// Network connectivity issues
    NetworkError(String),

    /// File I/O error
    IoError(std::io::Error),

    /// Invalid configuration or parameters
    InvalidInput(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::GeocodingFailed(msg) => {
                write!(f, "Geocoding failed: {msg}")
            }
            Error::HttpError(msg) => {
                write!(f, "HTTP error: {msg}")
            }
            Error::NetworkError(msg) => {
                write!(f, "Network error: {msg}")
            }
            Error::IoError(err) => {
                write!(f, "I/O error: {err}")
            }
            Error::InvalidInput(msg) => {
                write!(f, "Invalid input: {msg}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Error::NetworkError(err.to_string())
        } else {
            Error::HttpError(err.to_string())
        }
    }
}

/// Convenience result type for danfo-quote operations
pub type Result<T> = std::result::Result<T, Error>;

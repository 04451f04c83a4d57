//! Error types for the PokeAPI client.
//!
//! # Design
//! 404 and 502 get dedicated variants because they are the two upstream
//! failures worth telling apart in the log. Everything else collapses into
//! the `UnexpectedError` failure kind while keeping enough detail (status,
//! body, transport message) to debug from the log alone.

use std::fmt;

use crate::http::TransportError;

/// Coarse classification written to the error log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    ResourceNotFound,
    BadGateway,
    UnexpectedError,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::ResourceNotFound => "ResourceNotFound",
            FailureKind::BadGateway => "BadGateway",
            FailureKind::UnexpectedError => "UnexpectedError",
        };
        f.write_str(name)
    }
}

/// Errors returned by `PokeApiClient` operations. Any `Err` means the result
/// is unavailable.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("HTTP status 404: {url}")]
    ResourceNotFound { url: String },

    /// The server returned 502.
    #[error("HTTP status 502: {url}")]
    BadGateway { url: String },

    /// The server returned a non-2xx status other than 404 or 502.
    #[error("HTTP status {status}: {url}: {body}")]
    UnexpectedStatus { url: String, status: u16, body: String },

    /// No response was obtained (connect failure, timeout, unreadable body).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: TransportError,
    },

    /// The body was not the JSON shape the operation expects.
    #[error("unexpected body from {url}: {detail}")]
    Deserialization { url: String, detail: String },

    /// The trailing path segment of a resource URL is not an integer id.
    #[error("no numeric id at the end of {url}")]
    InvalidResourceUrl { url: String },

    /// The type listing has no entry with this exact name.
    #[error("no pokemon type named {name:?}")]
    TypeNotFound { name: String },

    /// An empty or whitespace-only pokemon name was passed in.
    #[error("pokemon name must not be blank")]
    InvalidName,
}

impl ApiError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::ResourceNotFound { .. } => FailureKind::ResourceNotFound,
            ApiError::BadGateway { .. } => FailureKind::BadGateway,
            _ => FailureKind::UnexpectedError,
        }
    }
}

/// Failures while assembling a `ClientConfig`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a whole number of seconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },

    #[error("could not prepare error log at {path}: {source}")]
    Log {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

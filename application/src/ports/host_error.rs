//! Error type shared by the page host ports.

use thiserror::Error;

/// Failure talking to the page host (network, surfaces, navigation).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Navigation surface not found: {0}")]
    SurfaceNotFound(String),

    #[error("Navigation surface already exists: {0}")]
    SurfaceExists(String),

    #[error("Request timed out")]
    Timeout,

    #[error("{0}")]
    Other(String),
}

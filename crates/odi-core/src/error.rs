//! Error types for odiFinder
//!
//! This module defines all error types used throughout the library.
//! OdiError implements Serialize so front ends can receive it as a plain message.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error type for odiFinder operations
#[derive(Error, Debug)]
pub enum OdiError {
    /// Network, DNS or timeout failure in the HTTP transport
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Credentials rejected or session not established
    #[error("Login failed: {0}")]
    AuthFailed(String),

    /// Listings page answered with a non-success status
    #[error("Failed to fetch {url}: HTTP {status}")]
    FetchFailed { status: u16, url: String },

    /// Document could not be parsed into a listings page
    #[error("Failed to parse HTML: {0}")]
    ParseError(String),

    /// City id is not a plate code between 1 and 81
    #[error("Invalid city id: {0}")]
    InvalidCityId(String),

    /// Settings file could not be read, written or validated
    #[error("Invalid settings: {0}")]
    Settings(String),
}

/// Serialize OdiError as its display string
impl Serialize for OdiError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for odiFinder operations
pub type Result<T> = std::result::Result<T, OdiError>;

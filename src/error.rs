//! Unified error handling for the route-analyzer library.
//!
//! The analysis core has exactly one failure mode: an empty route handed to an
//! operation that needs a start point. Everything else here belongs to the
//! I/O adapters in [`crate::io`].

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for route-analyzer operations.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Route has no waypoints but the operation needs a reference point
    #[error("{operation} requires at least one waypoint, route is empty")]
    EmptyRoute { operation: &'static str },

    /// File could not be opened, read or written
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Waypoint file is not valid `;`-delimited CSV
    #[error("Malformed waypoint file '{}': {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Configuration is missing a field or has a non-numeric value
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Result serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for route-analyzer operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Extension trait for converting Option to AnalysisError.
pub trait OptionExt<T> {
    /// Convert Option to Result with an empty route error naming the operation.
    fn ok_or_empty_route(self, operation: &'static str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_empty_route(self, operation: &'static str) -> Result<T> {
        self.ok_or(AnalysisError::EmptyRoute { operation })
    }
}

//! Error types for Ember

use thiserror::Error;

/// Result type alias using Ember's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur outside of traversal
///
/// Traversal itself never fails; these cover mesh export.
#[derive(Error, Debug)]
pub enum Error {
    /// Export failed
    #[error("Export failed: {0}")]
    Export(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

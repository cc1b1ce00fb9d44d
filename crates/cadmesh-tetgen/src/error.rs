//! Error types for the volumetric mesher.

use std::path::PathBuf;

use cadmesh_import::ImportError;
use thiserror::Error;

/// Result type for mesher operations.
pub type MesherResult<T> = Result<T, MesherError>;

/// Errors from loading mesher input or running the tetrahedralizer.
#[derive(Debug, Error)]
pub enum MesherError {
    /// A surface file could not be decoded.
    #[error("failed to load surface mesh: {0}")]
    Load(#[from] ImportError),

    /// A `.node`/`.ele` file is missing.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// Malformed `.node`/`.ele` content.
    #[error("invalid mesh content: {message}")]
    InvalidContent {
        /// Description of what was invalid.
        message: String,
    },

    /// A tetrahedron or facet refers to a point that does not exist.
    #[error("point index {index} out of range for {count} points")]
    IndexOutOfRange {
        /// Offending index (0-based).
        index: usize,
        /// Number of points available.
        count: usize,
    },

    /// The TetGen backend reported a failure.
    #[error("TetGen failed: {0}")]
    Tetgen(String),

    /// The TetGen executable could not be started.
    #[error("cannot run TetGen program `{program}`: {source}")]
    Unavailable {
        /// Program that was invoked.
        program: String,
        /// Spawn failure.
        source: std::io::Error,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Float parsing error.
    #[error("float parsing error: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),

    /// Integer parsing error.
    #[error("integer parsing error: {0}")]
    ParseInt(#[from] std::num::ParseIntError),
}

impl MesherError {
    /// Create an `InvalidContent` error with the given message.
    #[must_use]
    pub fn invalid_content(message: impl Into<String>) -> Self {
        Self::InvalidContent {
            message: message.into(),
        }
    }

    /// Wrap a backend error.
    pub fn tetgen(e: impl std::fmt::Display) -> Self {
        Self::Tetgen(e.to_string())
    }
}

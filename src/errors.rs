/*!
 * Error types for the recaption library.
 *
 * Parsing and caption compilation report typed errors; the controller and
 * CLI layer wrap them with anyhow context.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during subtitle parsing and caption compilation
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// A timing line did not match `HH:MM:SS,mmm --> HH:MM:SS,mmm` (strict policy only)
    #[error("Malformed timing at line {line_number}: {line}")]
    MalformedTiming {
        /// 1-based line number in the source document
        line_number: usize,
        /// The offending line
        line: String,
    },

    /// Chunk size must hold at least one word
    #[error("Invalid chunk size: {0} (must be at least 1)")]
    InvalidChunkSize(usize),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Input could not be read or output could not be written
    #[error("Resource unavailable: {path}: {reason}")]
    ResourceUnavailable {
        /// Path of the file involved
        path: PathBuf,
        /// Underlying I/O failure
        reason: String,
    },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AppError {
    /// Build a `ResourceUnavailable` from an I/O error
    pub fn resource(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        Self::ResourceUnavailable {
            path: path.into(),
            reason: error.to_string(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

use thiserror::Error;

/// Main error type for Kingraph
#[derive(Error, Debug)]
pub enum KingraphError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Relationship tag outside the closed vocabulary (strict parsing only).
    /// Distinct from "no deduction": this is rejected input, not absence.
    #[error("Unrecognized relationship label: {0}")]
    UnrecognizedLabel(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenient Result type using KingraphError
pub type Result<T> = std::result::Result<T, KingraphError>;

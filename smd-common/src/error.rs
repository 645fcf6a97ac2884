//! Common error types for SMD

use thiserror::Error;

/// Common result type for SMD operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across SMD crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The event store returned rows that violate the record contract
    #[error("Data source error: {0}")]
    DataSource(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for failures of the upstream event store (database or contract violations)
    pub fn is_data_source(&self) -> bool {
        match self {
            #[cfg(feature = "sqlx")]
            Error::Database(_) => true,
            Error::DataSource(_) => true,
            _ => false,
        }
    }
}

//! Error types for SwapForge

use thiserror::Error;

/// Main error type for SwapForge operations
#[derive(Debug, Error)]
pub enum SwapForgeError {
    /// Invalid slot layout or optimizer parameters
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Color record that violates the data model
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Internal error (should not occur in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for SwapForge operations
pub type Result<T> = std::result::Result<T, SwapForgeError>;

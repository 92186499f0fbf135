//! Error types for the light-event generation engine

use std::fmt;

/// Errors that can occur during analysis or event generation
#[derive(Debug, Clone)]
pub enum EngineError {
    /// Invalid input parameters
    InvalidInput(String),

    /// Audio decoding error
    DecodingError(String),

    /// Processing error during analysis or generation
    ProcessingError(String),

    /// Numerical error (overflow, underflow, etc.)
    NumericalError(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            EngineError::DecodingError(msg) => write!(f, "Decoding error: {}", msg),
            EngineError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
            EngineError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}

//! Keyboard interface error types

use thiserror::Error;
use vial_transport::{DecodeError, TransportError};

/// Errors from keyboard operations
#[derive(Error, Debug)]
pub enum KeyboardError {
    /// Transport layer error
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Invalid parameter value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Feature not supported by this device
    #[error("Feature not supported: {0}")]
    NotSupported(String),

    /// Device returned unexpected response
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Device definition could not be fetched or understood
    #[error("Definition error: {0}")]
    Definition(String),

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<DecodeError> for KeyboardError {
    fn from(e: DecodeError) -> Self {
        KeyboardError::Transport(TransportError::Decode(e))
    }
}

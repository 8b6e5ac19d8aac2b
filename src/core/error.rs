use std::io;
use thiserror::Error;

/// Custom error types for the bus protocol
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Codec error: {0}")]
    Codec(String),

    #[error("Bus error: {0}")]
    Bus(String),

    #[error("Bus fault: {0}")]
    Fault(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a new codec error (malformed or unrepresentable frame)
    pub fn codec(msg: impl Into<String>) -> Self {
        Error::Codec(msg.into())
    }

    /// Creates a new transient bus error (send timeout, peer absent)
    pub fn bus(msg: impl Into<String>) -> Self {
        Error::Bus(msg.into())
    }

    /// Creates a new fatal fault (driver bring-up or role acquisition failed)
    pub fn fault(msg: impl Into<String>) -> Self {
        Error::Fault(msg.into())
    }

    /// Creates a new invalid state error (call-order contract violated)
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Error::InvalidState(msg.into())
    }

    /// Returns true when the error is unrecoverable at this layer and the
    /// surrounding supervisor has to restart the node.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Fault(_))
    }
}

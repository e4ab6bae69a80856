//! Error types for the Galaxy3D buffer layer
//!
//! Every fallible buffer operation returns `Result<()>`: `Ok` is the success
//! value, each variant below is one way a call can fail. Failures are always
//! local, nothing unwinds.

use std::fmt;

use crate::context::{DataType, DeviceError};

/// Result type for Galaxy3D buffer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D buffer errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Backend-specific failure that has no dedicated variant
    BackendError(String),

    /// Out of GPU memory (recoverable, expected under memory pressure)
    OutOfMemory,

    /// The buffer is not in a state allowing the operation
    InvalidResource(String),

    /// The context does not expose a required entry point or capability
    Unsupported(String),

    /// The rendering context is no longer valid
    ContextLost,

    /// Element range outside of the stored elements (never clamped)
    OutOfRange {
        from: isize,
        count: usize,
        available: usize,
    },

    /// Data type of the request differs from the stored data type
    TypeMismatch {
        expected: DataType,
        actual: DataType,
    },

    /// Host slice shorter than the byte range of the transfer
    BufferTooSmall {
        required: usize,
        provided: usize,
    },

    /// Unexpected error code reported by the device after a transfer
    Device(DeviceError),

    /// State dump could not be serialized
    Serialization(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::Unsupported(msg) => write!(f, "Unsupported: {}", msg),
            Error::ContextLost => write!(f, "Rendering context lost"),
            Error::OutOfRange { from, count, available } => write!(
                f,
                "Element range [{}, {} + {}) out of bounds ({} elements stored)",
                from, from, count, available
            ),
            Error::TypeMismatch { expected, actual } => {
                write!(f, "Data type mismatch: buffer holds {}, got {}", expected, actual)
            }
            Error::BufferTooSmall { required, provided } => write!(
                f,
                "Host buffer too small: {} bytes required, {} provided",
                required, provided
            ),
            Error::Device(err) => write!(f, "Device error: {}", err),
            Error::Serialization(msg) => write!(f, "Serialization failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<DeviceError> for Error {
    fn from(err: DeviceError) -> Self {
        match err {
            DeviceError::OutOfMemory => Error::OutOfMemory,
            other => Error::Device(other),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;

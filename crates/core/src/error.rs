//! Error types for Prism
//!
//! This module defines all error types used throughout the system, plus the
//! closed integer status-code vocabulary surfaced at the query boundary.
//! We use `thiserror` for automatic `Display` and `Error` trait
//! implementations.
//!
//! ## Propagation policy
//!
//! Every failure is returned synchronously to the immediate caller. Nothing
//! is retried internally, and no panic crosses the boundary: every error is
//! representable as a `StatusCode`.

use std::io;
use thiserror::Error;

/// Result type alias for Prism operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Prism
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed argument combination, insufficient buffer capacity, or
    /// unknown property identifier
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// A handle argument is null or does not resolve to a live entity
    #[error("invalid handle: {0}")]
    InvalidHandle(String),

    /// Enumeration matched zero entities
    #[error("no matching entities")]
    NotFound,

    /// A property is recognized but its computation is not available on the
    /// current host configuration
    #[error("{0} is not implemented on this host")]
    Unimplemented(&'static str),

    /// I/O error (configuration loading)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error (parse failure, inconsistent descriptors)
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Map this error onto the boundary status-code vocabulary
    pub fn status(&self) -> StatusCode {
        match self {
            Error::InvalidValue(_) => StatusCode::InvalidValue,
            Error::InvalidHandle(_) => StatusCode::InvalidHandle,
            Error::NotFound => StatusCode::NotFound,
            Error::Unimplemented(_) => StatusCode::Unimplemented,
            // Configuration faults are argument faults from the caller's
            // point of view.
            Error::Io(_) | Error::Config(_) => StatusCode::InvalidValue,
        }
    }
}

/// Closed status-code enumeration surfaced to callers
///
/// The numeric values are part of the ABI contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum StatusCode {
    /// Operation completed
    Success = 0,
    /// Enumeration yielded zero matching entities
    NotFound = -1,
    /// Malformed arguments, short buffer, or unknown property
    InvalidValue = -30,
    /// Null or unresolvable handle
    InvalidHandle = -32,
    /// Recognized property, unavailable on this host
    Unimplemented = -64,
}

impl StatusCode {
    /// The raw integer code
    #[inline]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Whether this code reports success
    #[inline]
    pub const fn is_success(self) -> bool {
        matches!(self, StatusCode::Success)
    }
}

/// Collapse a `Result` into the status code a boundary caller sees
pub fn status_of<T>(result: &Result<T>) -> StatusCode {
    match result {
        Ok(_) => StatusCode::Success,
        Err(e) => e.status(),
    }
}

//! Error types for nvtext
//!
//! Provides a unified error type for all operations. Every failure is
//! recoverable: no store operation panics or aborts the process.

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for nvtext operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Device Errors
    // -------------------------------------------------------------------------
    #[error("address {addr} out of range (device capacity {capacity})")]
    AddressOutOfRange { addr: usize, capacity: usize },

    #[error("device image error: {0}")]
    Image(String),

    // -------------------------------------------------------------------------
    // Record Store Errors
    // -------------------------------------------------------------------------
    #[error("record position must be 1 or greater")]
    InvalidPosition,

    #[error("record of {len} bytes exceeds the {max}-byte limit")]
    RecordTooLong { len: usize, max: usize },

    #[error("record bound of {bound} reached")]
    CapacityExceeded { bound: usize },

    #[error("not enough space on the device")]
    InsufficientSpace,

    #[error("device content is not a well-formed record sequence")]
    CorruptStore,

    #[error("no record at position {position}")]
    NotFound { position: usize },
}

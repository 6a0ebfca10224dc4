//! # Pool Error Types
//!
//! Errors raised while describing or configuring a pool.
//!
//! Running out of nodes is NOT an error: `allocate()` returns `None` and the
//! owning container decides what "full" means.

use thiserror::Error;

/// Errors that can occur while laying out or configuring a pool.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// Nodes must occupy at least one byte.
    #[error("node size must be greater than zero")]
    ZeroNodeSize,

    /// Alignment is zero or not a power of two.
    #[error("alignment {0} is not a power of two")]
    InvalidAlignment(usize),

    /// The caller-supplied arena cannot hold the requested nodes.
    #[error("arena too small: need {required} bytes, have {available}")]
    ArenaTooSmall {
        /// Bytes needed, including alignment padding.
        required: usize,
        /// Bytes supplied by the caller.
        available: usize,
    },

    /// Invalid configuration file or value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read.
    #[error("cannot read configuration {path}: {reason}")]
    ConfigIo {
        /// Path that failed.
        path: String,
        /// Underlying I/O failure.
        reason: String,
    },
}

/// Result type for pool layout and configuration.
pub type PoolResult<T> = Result<T, PoolError>;

//! # Sort Error Types
//!
//! Errors reported by the checked (`try_*`) sorting entry points.
//!
//! The unchecked entry points never fail: a bad comparator yields an
//! unspecified permutation plus a diagnostic, and an out-of-range index
//! panics like slice indexing does.

use thiserror::Error;

/// Errors that can occur while sorting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    /// The comparator is not a strict weak ordering: it claimed both
    /// `less(a, b)` and `less(b, a)` for some pair.
    ///
    /// The slice is still a permutation of its input, in unspecified order.
    #[error("comparator is not a strict weak ordering: {violations} antisymmetry violations")]
    ComparatorViolation {
        /// Number of pairs found ordered both ways.
        violations: usize,
    },

    /// A `middle` or `nth` index lies outside the slice.
    #[error("index {index} out of range for slice of length {len}")]
    IndexOutOfRange {
        /// The index supplied.
        index: usize,
        /// Length of the slice.
        len: usize,
    },
}

/// Result type for checked sorts.
pub type SortResult<T> = Result<T, SortError>;

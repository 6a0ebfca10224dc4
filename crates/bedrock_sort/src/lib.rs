//! # BEDROCK Sort
//!
//! In-place sorting for slices, with a bounded worst case:
//! - Introsort: O(n log n) worst case, no allocation, no `Clone` bound
//! - `partial_sort` and `nth_element` on the same partition primitive
//! - Heap primitives and small-range sorts
//!
//! ## Comparators
//!
//! Every `*_by` function takes a strict weak ordering "less" predicate,
//! `FnMut(&T, &T) -> bool`. Debug builds check each `true` answer for
//! antisymmetry and log the first violation with `tracing`. The `try_*`
//! functions always check and return [`SortError`] instead. An invalid
//! predicate never causes out-of-range access, only an unspecified order.
//!
//! ## Example
//!
//! ```rust,ignore
//! use bedrock_sort::{nth_element, sort_by};
//!
//! let mut scores = vec![31, 7, 19, 88, 42];
//! nth_element(&mut scores, 2);
//! assert_eq!(scores[2], 31);
//!
//! sort_by(&mut scores, |a, b| a > b);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

mod compare;

pub mod bubble;
pub mod error;
pub mod heap;
pub mod insertion;
pub mod introsort;
pub mod partition;
pub mod select;
pub mod sorted;

pub use bubble::{bubble_sort, bubble_sort_by};
pub use error::{SortError, SortResult};
pub use heap::{
    heap_sort, heap_sort_by, is_heap, is_heap_by, make_heap, make_heap_by, pop_heap, pop_heap_by, push_heap,
    push_heap_by, sort_heap, sort_heap_by,
};
pub use insertion::{insertion_sort, insertion_sort_by};
pub use introsort::{sort, sort_by, try_sort_by, QUICK_SORT_LIMIT};
pub use partition::{median, median_by};
pub use select::{
    nth_element, nth_element_by, partial_sort, partial_sort_by, try_nth_element_by, try_partial_sort_by,
};
pub use sorted::{is_sorted, is_sorted_by, is_sorted_until, is_sorted_until_by};

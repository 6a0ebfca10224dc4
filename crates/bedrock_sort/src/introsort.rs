//! # Introspective Sort
//!
//! Median-of-three quicksort with a recursion budget of `2 * floor(log2 n)`.
//! Pieces that exhaust the budget are heap-sorted, so the worst case is
//! O(n log n). Partitioning stops at pieces of [`QUICK_SORT_LIMIT`]
//! elements or fewer; one insertion pass then finishes the whole slice.
//!
//! ## Phases
//!
//! ```text
//! partition (len > 28, budget > 0) --budget exhausted--> heap sort piece
//!          |
//!          +--len <= 28--> insertion sort of the whole slice
//! ```

use crate::compare::Comparator;
use crate::error::SortResult;
use crate::heap;
use crate::insertion::{insert_all, insert_from};
use crate::partition::{median_index, partition};

/// Pieces at or below this length are left for the insertion pass.
pub const QUICK_SORT_LIMIT: usize = 28;

/// Sorts `v` ascending. Not stable.
///
/// # Example
///
/// ```rust,ignore
/// let mut v = [5, 3, 1, 4, 1, 5, 9, 2, 6];
/// sort(&mut v);
/// assert_eq!(v, [1, 1, 2, 3, 4, 5, 5, 6, 9]);
/// ```
#[inline]
pub fn sort<T: PartialOrd>(v: &mut [T]) {
    sort_by(v, |a, b| a < b);
}

/// Sorts `v` with the strict weak ordering `less`. Not stable.
///
/// Debug builds check the predicate for antisymmetry and log the first
/// violation; the result for an invalid predicate is an unspecified
/// permutation of the input.
pub fn sort_by<T, F>(v: &mut [T], less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    introsort(v, &mut Comparator::new(less));
}

/// Sorts `v` with `less`, always checking the predicate.
///
/// # Errors
///
/// [`crate::SortError::ComparatorViolation`] if `less` claimed both
/// `less(a, b)` and `less(b, a)` for some pair. `v` is still a permutation
/// of its input.
pub fn try_sort_by<T, F>(v: &mut [T], less: F) -> SortResult<()>
where
    F: FnMut(&T, &T) -> bool,
{
    let mut cmp = Comparator::validating(less);
    introsort(v, &mut cmp);
    cmp.finish()
}

pub(crate) fn introsort<T, F>(v: &mut [T], cmp: &mut Comparator<F>)
where
    F: FnMut(&T, &T) -> bool,
{
    if v.is_empty() {
        return;
    }

    let budget = 2 * v.len().ilog2() as usize;
    quick_sort_pieces(v, budget, cmp);

    if v.len() > QUICK_SORT_LIMIT {
        insert_all(&mut v[..QUICK_SORT_LIMIT], cmp);
        insert_from(v, QUICK_SORT_LIMIT, cmp);
    } else {
        insert_all(v, cmp);
    }
}

/// Partitions `v` until every piece is short or sorted.
///
/// The right piece is handled recursively with the decremented budget and
/// the left piece by the loop, so recursion depth never exceeds the budget.
fn quick_sort_pieces<T, F>(mut v: &mut [T], mut budget: usize, cmp: &mut Comparator<F>)
where
    F: FnMut(&T, &T) -> bool,
{
    while v.len() > QUICK_SORT_LIMIT && budget > 0 {
        let len = v.len();
        let pivot = median_index(v, 0, len / 2, len - 1, cmp);
        let position = partition(v, pivot, cmp);

        budget -= 1;
        let whole = v;
        let (left, right) = whole.split_at_mut(position);
        quick_sort_pieces(right, budget, cmp);
        v = left;
    }

    if budget == 0 {
        heap::build(v, cmp);
        heap::sort(v, cmp);
    }
}

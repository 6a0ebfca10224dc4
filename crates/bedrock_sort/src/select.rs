//! # Partial Sorting and Selection
//!
//! - [`partial_sort`]: the `middle` smallest elements, sorted, at the front
//! - [`nth_element`]: one element in its sorted position, the rest split
//!   around it

use crate::compare::Comparator;
use crate::error::{SortError, SortResult};
use crate::heap;
use crate::insertion::insert_all;
use crate::partition::{median_index, partition};

/// Pieces at or below this length are finished by insertion sort.
const SELECT_LIMIT: usize = 5;

/// Places the `middle` smallest elements of `v` at the front, ascending.
/// The order of `v[middle..]` is unspecified.
///
/// # Panics
///
/// Panics if `middle > v.len()`.
///
/// # Example
///
/// ```rust,ignore
/// let mut v = [9, 4, 7, 1, 8, 2];
/// partial_sort(&mut v, 3);
/// assert_eq!(&v[..3], &[1, 2, 4]);
/// ```
#[inline]
pub fn partial_sort<T: PartialOrd>(v: &mut [T], middle: usize) {
    partial_sort_by(v, middle, |a, b| a < b);
}

/// [`partial_sort`] with the strict weak ordering `less`.
///
/// # Panics
///
/// Panics if `middle > v.len()`.
pub fn partial_sort_by<T, F>(v: &mut [T], middle: usize, less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    assert!(middle <= v.len(), "partial_sort middle {middle} out of range for length {}", v.len());
    heap_select(v, middle, &mut Comparator::new(less));
}

/// [`partial_sort_by`] with range checking and predicate validation.
///
/// # Errors
///
/// * [`SortError::IndexOutOfRange`] if `middle > v.len()`; `v` is untouched
/// * [`SortError::ComparatorViolation`] if `less` is not antisymmetric
pub fn try_partial_sort_by<T, F>(v: &mut [T], middle: usize, less: F) -> SortResult<()>
where
    F: FnMut(&T, &T) -> bool,
{
    if middle > v.len() {
        return Err(SortError::IndexOutOfRange {
            index: middle,
            len: v.len(),
        });
    }
    let mut cmp = Comparator::validating(less);
    heap_select(v, middle, &mut cmp);
    cmp.finish()
}

/// Reorders `v` so that `v[nth]` is the element a full sort would put
/// there, nothing before it is greater and nothing after it is less.
///
/// # Panics
///
/// Panics if `nth >= v.len()`.
///
/// # Example
///
/// ```rust,ignore
/// let mut v = [7, 2, 1, 8, 3];
/// nth_element(&mut v, 2);
/// assert_eq!(v[2], 3);
/// ```
#[inline]
pub fn nth_element<T: PartialOrd>(v: &mut [T], nth: usize) {
    nth_element_by(v, nth, |a, b| a < b);
}

/// [`nth_element`] with the strict weak ordering `less`.
///
/// # Panics
///
/// Panics if `nth >= v.len()`.
pub fn nth_element_by<T, F>(v: &mut [T], nth: usize, less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    assert!(nth < v.len(), "nth_element index {nth} out of range for length {}", v.len());
    select(v, nth, &mut Comparator::new(less));
}

/// [`nth_element_by`] with range checking and predicate validation.
///
/// # Errors
///
/// * [`SortError::IndexOutOfRange`] if `nth >= v.len()`; `v` is untouched
/// * [`SortError::ComparatorViolation`] if `less` is not antisymmetric
pub fn try_nth_element_by<T, F>(v: &mut [T], nth: usize, less: F) -> SortResult<()>
where
    F: FnMut(&T, &T) -> bool,
{
    if nth >= v.len() {
        return Err(SortError::IndexOutOfRange { index: nth, len: v.len() });
    }
    let mut cmp = Comparator::validating(less);
    select(v, nth, &mut cmp);
    cmp.finish()
}

/// Heap-based partial sort of `v[..middle]`.
pub(crate) fn heap_select<T, F>(v: &mut [T], middle: usize, cmp: &mut Comparator<F>)
where
    F: FnMut(&T, &T) -> bool,
{
    if middle == 0 {
        return;
    }

    let (front, back) = v.split_at_mut(middle);
    heap::build(front, cmp);
    for candidate in back.iter_mut() {
        if cmp.less(&*candidate, &front[0]) {
            std::mem::swap(candidate, &mut front[0]);
            heap::adjust(front, 0, cmp);
        }
    }
    heap::sort(front, cmp);
}

/// Quickselect: partitions only the piece containing `nth`.
fn select<T, F>(v: &mut [T], nth: usize, cmp: &mut Comparator<F>)
where
    F: FnMut(&T, &T) -> bool,
{
    let mut first = 0;
    let mut last = v.len();

    while last - first > SELECT_LIMIT {
        let piece = &mut v[first..last];
        let len = piece.len();
        let pivot = median_index(piece, 0, len / 2, len - 1, cmp);
        let split = first + partition(piece, pivot, cmp);

        // An inconsistent predicate can yield an empty side.
        if split == first || split == last {
            break;
        }
        if split <= nth {
            first = split;
        } else {
            last = split;
        }
    }

    insert_all(&mut v[first..last], cmp);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_nth_element_small_example() {
        let mut v = [7, 2, 1, 8, 3];
        nth_element(&mut v, 2);
        assert_eq!(v[2], 3);
    }

    #[test]
    fn test_nth_element_every_position() {
        let mut rng = StdRng::seed_from_u64(99);
        let source: Vec<u32> = (0..300).map(|_| rng.gen_range(0..100)).collect();
        let mut sorted = source.clone();
        sorted.sort_unstable();

        for nth in [0, 1, 5, 6, 150, 298, 299] {
            let mut v = source.clone();
            nth_element(&mut v, nth);
            assert_eq!(v[nth], sorted[nth], "nth {nth}");
            assert!(v[..nth].iter().all(|x| *x <= v[nth]));
            assert!(v[nth + 1..].iter().all(|x| *x >= v[nth]));
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_nth_element_rejects_bad_index() {
        let mut v = [1, 2, 3];
        nth_element(&mut v, 3);
    }

    #[test]
    fn test_partial_sort_prefix() {
        let mut v = [9, 4, 7, 1, 8, 2];
        partial_sort(&mut v, 3);
        assert_eq!(&v[..3], &[1, 2, 4]);

        let mut rest = v[3..].to_vec();
        rest.sort_unstable();
        assert_eq!(rest, [7, 8, 9]);
    }

    #[test]
    fn test_partial_sort_bounds() {
        let mut v = [3, 1, 2];
        partial_sort(&mut v, 0);
        assert_eq!(v, [3, 1, 2]);
        partial_sort(&mut v, 3);
        assert_eq!(v, [1, 2, 3]);
    }

    #[test]
    fn test_partial_sort_by_descending() {
        let mut v = [5, 1, 9, 3, 7];
        partial_sort_by(&mut v, 2, |a, b| a > b);
        assert_eq!(&v[..2], &[9, 7]);
    }

    #[test]
    fn test_try_variants_check_ranges() {
        let mut v = [1, 2, 3];
        assert_eq!(
            try_partial_sort_by(&mut v, 4, |a, b| a < b),
            Err(SortError::IndexOutOfRange { index: 4, len: 3 })
        );
        assert_eq!(
            try_nth_element_by(&mut v, 3, |a, b| a < b),
            Err(SortError::IndexOutOfRange { index: 3, len: 3 })
        );
        let mut empty: [i32; 0] = [];
        assert!(try_nth_element_by(&mut empty, 0, |a, b| a < b).is_err());
        assert_eq!(try_partial_sort_by(&mut empty, 0, |a, b| a < b), Ok(()));
    }

    #[test]
    fn test_select_terminates_with_broken_predicate() {
        let mut v: Vec<u32> = (0..100).collect();
        let result = try_nth_element_by(&mut v, 50, |_, _| true);
        assert!(matches!(result, Err(SortError::ComparatorViolation { .. })));
        assert_eq!(v.len(), 100);
    }
}

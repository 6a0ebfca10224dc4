//! # Insertion Sort
//!
//! Quadratic, but the fastest option for short ranges and for ranges where
//! every element is already close to its final position. The introsort
//! finishing pass relies on the latter.

use crate::compare::Comparator;

/// Sorts `v` by insertion.
///
/// # Example
///
/// ```rust,ignore
/// let mut v = [3, 1, 2];
/// insertion_sort(&mut v);
/// assert_eq!(v, [1, 2, 3]);
/// ```
#[inline]
pub fn insertion_sort<T: PartialOrd>(v: &mut [T]) {
    insertion_sort_by(v, |a, b| a < b);
}

/// Sorts `v` by insertion using the "less" predicate `less`.
pub fn insertion_sort_by<T, F>(v: &mut [T], less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    insert_all(v, &mut Comparator::new(less));
}

/// Insertion sort over the whole of `v`, bounded at the front.
pub(crate) fn insert_all<T, F>(v: &mut [T], cmp: &mut Comparator<F>)
where
    F: FnMut(&T, &T) -> bool,
{
    insert_from(v, 1, cmp);
}

/// Inserts each of `v[start..]` into the sorted run before it.
///
/// `v[..start]` must already be sorted. After a full introsort partition
/// pass every element's final position is close by, so this is one linear
/// sweep in practice.
pub(crate) fn insert_from<T, F>(v: &mut [T], start: usize, cmp: &mut Comparator<F>)
where
    F: FnMut(&T, &T) -> bool,
{
    for current in start..v.len() {
        let mut hole = current;
        while hole > 0 && cmp.less(&v[hole], &v[hole - 1]) {
            v.swap(hole, hole - 1);
            hole -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_sort_small() {
        let mut v = [5, 3, 1, 4, 1, 5, 9, 2, 6];
        insertion_sort(&mut v);
        assert_eq!(v, [1, 1, 2, 3, 4, 5, 5, 6, 9]);
    }

    #[test]
    fn test_insertion_sort_degenerate() {
        let mut empty: [u8; 0] = [];
        insertion_sort(&mut empty);
        let mut one = [7];
        insertion_sort(&mut one);
        assert_eq!(one, [7]);
    }

    #[test]
    fn test_insertion_sort_is_stable() {
        let mut v = [(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd')];
        insertion_sort_by(&mut v, |a, b| a.0 < b.0);
        assert_eq!(v, [(1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')]);
    }

    #[test]
    fn test_insert_from_extends_sorted_prefix() {
        let mut v = [1, 4, 8, 3, 9, 0];
        insert_from(&mut v, 3, &mut Comparator::new(|a: &i32, b: &i32| a < b));
        assert_eq!(v, [0, 1, 3, 4, 8, 9]);
    }
}

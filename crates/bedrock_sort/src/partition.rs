//! # Pivot Selection and Partitioning
//!
//! Median-of-three pivot selection and the Hoare-style partition shared by
//! introsort and `nth_element`.

use crate::compare::Comparator;

/// Returns whichever of `a`, `b`, `c` lies between the other two.
///
/// Ties resolve towards the earlier argument when it is one of the tied
/// medians: `median(&1, &1, &2)` returns `a`.
#[inline]
#[must_use]
pub fn median<'a, T: PartialOrd>(a: &'a T, b: &'a T, c: &'a T) -> &'a T {
    median_by(a, b, c, |x, y| x < y)
}

/// [`median`] with a custom "less" predicate.
#[must_use]
pub fn median_by<'a, T, F>(a: &'a T, b: &'a T, c: &'a T, less: F) -> &'a T
where
    F: FnMut(&T, &T) -> bool,
{
    let values = [a, b, c];
    let slot = median_of(&mut Comparator::new(less), |cmp, i, j| cmp.less(values[i], values[j]));
    values[slot]
}

/// Index of the median of `v[a]`, `v[b]`, `v[c]`.
pub(crate) fn median_index<T, F>(v: &[T], a: usize, b: usize, c: usize, cmp: &mut Comparator<F>) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let indices = [a, b, c];
    let slot = median_of(cmp, |cmp, i, j| cmp.less(&v[indices[i]], &v[indices[j]]));
    indices[slot]
}

/// Median-of-three decision tree over slots 0, 1 and 2.
fn median_of<C>(cmp: &mut C, mut less: impl FnMut(&mut C, usize, usize) -> bool) -> usize {
    if less(cmp, 0, 1) {
        if less(cmp, 1, 2) {
            1
        } else if less(cmp, 0, 2) {
            2
        } else {
            0
        }
    } else if less(cmp, 0, 2) {
        0
    } else if less(cmp, 1, 2) {
        2
    } else {
        1
    }
}

/// Partitions `v` around the element at `pivot`.
///
/// Returns `p` such that no element of `v[..p]` is greater than the pivot
/// value and no element of `v[p..]` is less. The pivot element is tracked
/// through the swaps, so `T` need not be `Clone`.
///
/// Both scans are bounded by the other cursor, so an inconsistent predicate
/// cannot push either one out of the slice. With a strict weak ordering the
/// bounds never bind and the split is the classic Hoare split.
pub(crate) fn partition<T, F>(v: &mut [T], mut pivot: usize, cmp: &mut Comparator<F>) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let mut first = 0;
    let mut last = v.len();

    loop {
        while first < last && cmp.less(&v[first], &v[pivot]) {
            first += 1;
        }
        if last == 0 {
            return first;
        }
        last -= 1;
        while last > first && cmp.less(&v[pivot], &v[last]) {
            last -= 1;
        }

        if first >= last {
            return first;
        }

        v.swap(first, last);
        if pivot == first {
            pivot = last;
        } else if pivot == last {
            pivot = first;
        }
        first += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn less() -> Comparator<impl FnMut(&i32, &i32) -> bool> {
        Comparator::new(|a: &i32, b: &i32| a < b)
    }

    #[test]
    fn test_median_picks_middle_value() {
        assert_eq!(*median(&1, &2, &3), 2);
        assert_eq!(*median(&3, &1, &2), 2);
        assert_eq!(*median(&2, &3, &1), 2);
        assert_eq!(*median_by(&1, &2, &3, |a, b| a > b), 2);
    }

    #[test]
    fn test_median_tie_rule() {
        let (a, b, c) = (1, 1, 2);
        assert!(std::ptr::eq(median(&a, &b, &c), &a));
        let (a, b, c) = (5, 5, 5);
        assert!(std::ptr::eq(median(&a, &b, &c), &b));
        let (a, b, c) = (2, 1, 2);
        assert!(std::ptr::eq(median(&a, &b, &c), &c));
    }

    #[test]
    fn test_median_index() {
        let v = [9, 4, 7, 1, 3];
        assert_eq!(median_index(&v, 0, 2, 4, &mut less()), 2);
    }

    #[test]
    fn test_partition_splits_around_pivot() {
        let mut v = [7, 2, 9, 4, 5, 1, 8, 3, 6];
        let pivot_value = v[4];
        let split = partition(&mut v, 4, &mut less());

        assert!(split > 0 && split < v.len());
        assert!(v[..split].iter().all(|&x| x <= pivot_value));
        assert!(v[split..].iter().all(|&x| x >= pivot_value));
    }

    #[test]
    fn test_partition_with_duplicates() {
        let mut v = [3, 3, 3, 3, 3, 3];
        let split = partition(&mut v, 0, &mut less());
        assert!(split > 0 && split < v.len());
    }

    #[test]
    fn test_partition_survives_inconsistent_predicate() {
        let mut v = [4, 1, 3, 2, 5, 0];
        let mut cmp = Comparator::new(|_: &i32, _: &i32| true);
        let split = partition(&mut v, 2, &mut cmp);
        assert!(split <= v.len());

        let mut sorted = v;
        sorted.sort_unstable();
        assert_eq!(sorted, [0, 1, 2, 3, 4, 5]);
    }
}

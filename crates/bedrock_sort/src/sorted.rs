//! # Order Checks

/// Returns `true` if no element of `v` is less than its predecessor.
#[inline]
#[must_use]
pub fn is_sorted<T: PartialOrd>(v: &[T]) -> bool {
    is_sorted_by(v, |a, b| a < b)
}

/// Returns `true` if `less(v[i + 1], v[i])` holds for no `i`.
#[must_use]
pub fn is_sorted_by<T, F>(v: &[T], mut less: F) -> bool
where
    F: FnMut(&T, &T) -> bool,
{
    v.windows(2).all(|pair| !less(&pair[1], &pair[0]))
}

/// Length of the longest non-decreasing prefix of `v`.
#[inline]
#[must_use]
pub fn is_sorted_until<T: PartialOrd>(v: &[T]) -> usize {
    is_sorted_until_by(v, |a, b| a < b)
}

/// Length of the longest prefix of `v` that is sorted with respect to `less`.
#[must_use]
pub fn is_sorted_until_by<T, F>(v: &[T], mut less: F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    v.windows(2)
        .position(|pair| less(&pair[1], &pair[0]))
        .map_or(v.len(), |i| i + 1)
}

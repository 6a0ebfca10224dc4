//! # Bubble Sort
//!
//! Only worth using for a handful of elements. Each pass ends where the
//! previous pass made its last swap, since everything beyond is in place.

use crate::compare::Comparator;

/// Sorts `v` ascending by bubbling. Stable.
#[inline]
pub fn bubble_sort<T: PartialOrd>(v: &mut [T]) {
    bubble_sort_by(v, |a, b| a < b);
}

/// [`bubble_sort`] with the strict weak ordering `less`.
pub fn bubble_sort_by<T, F>(v: &mut [T], less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    let mut cmp = Comparator::new(less);
    let mut last = v.len().saturating_sub(1);

    while last > 0 {
        let mut last_modified = 0;
        for current in 0..last {
            if cmp.less(&v[current + 1], &v[current]) {
                v.swap(current, current + 1);
                last_modified = current;
            }
        }
        last = last_modified;
    }
}

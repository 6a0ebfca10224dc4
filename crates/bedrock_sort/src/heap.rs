//! # Binary Heap Primitives
//!
//! Max-heaps (with respect to a "less" predicate) laid out in a slice, the
//! root at index 0 and the children of `i` at `2i + 1` and `2i + 2`.
//!
//! These back `partial_sort` and the introsort fallback, and are exposed
//! for callers that keep a priority queue in a fixed buffer.

use crate::compare::Comparator;

/// Turns `v` into a max-heap.
#[inline]
pub fn make_heap<T: PartialOrd>(v: &mut [T]) {
    make_heap_by(v, |a, b| a < b);
}

/// Turns `v` into a max-heap with respect to `less`.
pub fn make_heap_by<T, F>(v: &mut [T], less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    build(v, &mut Comparator::new(less));
}

/// Restores the heap after the last element of `v` was appended to the
/// heap `v[..len - 1]`.
#[inline]
pub fn push_heap<T: PartialOrd>(v: &mut [T]) {
    push_heap_by(v, |a, b| a < b);
}

/// [`push_heap`] with a custom predicate.
pub fn push_heap_by<T, F>(v: &mut [T], less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    if let Some(last) = v.len().checked_sub(1) {
        promote(v, 0, last, &mut Comparator::new(less));
    }
}

/// Moves the largest element of the heap `v` to the back; `v[..len - 1]`
/// remains a heap.
#[inline]
pub fn pop_heap<T: PartialOrd>(v: &mut [T]) {
    pop_heap_by(v, |a, b| a < b);
}

/// [`pop_heap`] with a custom predicate.
pub fn pop_heap_by<T, F>(v: &mut [T], less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    pop(v, &mut Comparator::new(less));
}

/// Sorts the heap `v` ascending.
#[inline]
pub fn sort_heap<T: PartialOrd>(v: &mut [T]) {
    sort_heap_by(v, |a, b| a < b);
}

/// [`sort_heap`] with a custom predicate.
pub fn sort_heap_by<T, F>(v: &mut [T], less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    sort(v, &mut Comparator::new(less));
}

/// Returns `true` if `v` is a max-heap.
#[must_use]
pub fn is_heap<T: PartialOrd>(v: &[T]) -> bool {
    is_heap_by(v, |a, b| a < b)
}

/// Returns `true` if `v` is a max-heap with respect to `less`.
#[must_use]
pub fn is_heap_by<T, F>(v: &[T], mut less: F) -> bool
where
    F: FnMut(&T, &T) -> bool,
{
    (1..v.len()).all(|child| !less(&v[(child - 1) / 2], &v[child]))
}

/// Heap sort: O(n log n) worst case, not stable.
#[inline]
pub fn heap_sort<T: PartialOrd>(v: &mut [T]) {
    heap_sort_by(v, |a, b| a < b);
}

/// [`heap_sort`] with a custom predicate.
pub fn heap_sort_by<T, F>(v: &mut [T], less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    let mut cmp = Comparator::new(less);
    build(v, &mut cmp);
    sort(v, &mut cmp);
}

pub(crate) fn build<T, F>(v: &mut [T], cmp: &mut Comparator<F>)
where
    F: FnMut(&T, &T) -> bool,
{
    for parent in (0..v.len() / 2).rev() {
        adjust(v, parent, cmp);
    }
}

pub(crate) fn sort<T, F>(v: &mut [T], cmp: &mut Comparator<F>)
where
    F: FnMut(&T, &T) -> bool,
{
    for end in (2..=v.len()).rev() {
        pop(&mut v[..end], cmp);
    }
}

fn pop<T, F>(v: &mut [T], cmp: &mut Comparator<F>)
where
    F: FnMut(&T, &T) -> bool,
{
    if v.len() > 1 {
        let last = v.len() - 1;
        v.swap(0, last);
        adjust(&mut v[..last], 0, cmp);
    }
}

/// Re-seats the element at `top` within the sub-heap rooted there.
///
/// The element first sinks all the way to a leaf along the larger children,
/// then rises back to its place.
pub(crate) fn adjust<T, F>(heap: &mut [T], top: usize, cmp: &mut Comparator<F>)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = heap.len();
    let mut hole = top;
    let mut child = 2 * hole + 2;

    while child < len {
        if cmp.less(&heap[child], &heap[child - 1]) {
            child -= 1;
        }
        heap.swap(hole, child);
        hole = child;
        child = 2 * child + 2;
    }
    // Only a left child.
    if child == len {
        heap.swap(hole, child - 1);
        hole = child - 1;
    }

    promote(heap, top, hole, cmp);
}

/// Moves the element at `hole` up towards `top` while its parent is less.
fn promote<T, F>(heap: &mut [T], top: usize, mut hole: usize, cmp: &mut Comparator<F>)
where
    F: FnMut(&T, &T) -> bool,
{
    while hole > top {
        let parent = (hole - 1) / 2;
        if !cmp.less(&heap[parent], &heap[hole]) {
            break;
        }
        heap.swap(parent, hole);
        hole = parent;
    }
}

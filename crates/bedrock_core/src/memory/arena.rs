//! # Arena Descriptors
//!
//! Caller-owned memory regions and the fixed-size node geometry carved out
//! of them.
//!
//! Pools never own, borrow or touch arena bytes. They only hand out node
//! addresses inside an [`ArenaSpan`]; the caller reaches the bytes through
//! its own buffer with [`node_bytes_mut`] or [`node_mut`].

use std::mem::size_of;
use std::ops::Range;

use crate::error::{PoolError, PoolResult};

/// Size of one machine word (bucket array entries).
pub const WORD_SIZE: usize = size_of::<usize>();

/// Address range of a caller-owned arena.
///
/// A span records where the caller's buffer lives; it does not borrow it.
/// The caller keeps the buffer alive and unmoved for as long as a pool is
/// bound to the span.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ArenaSpan {
    /// First byte address.
    begin: usize,
    /// Length in bytes.
    len: usize,
}

impl ArenaSpan {
    /// Describes the region occupied by `buffer`.
    #[inline]
    #[must_use]
    pub fn of(buffer: &[u8]) -> Self {
        Self {
            begin: buffer.as_ptr() as usize,
            len: buffer.len(),
        }
    }

    /// Describes an arbitrary address range.
    #[inline]
    #[must_use]
    pub const fn from_raw_parts(begin: usize, len: usize) -> Self {
        Self { begin, len }
    }

    /// First byte address.
    #[inline]
    #[must_use]
    pub const fn begin(&self) -> usize {
        self.begin
    }

    /// One past the last byte address.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> usize {
        self.begin + self.len
    }

    /// Length in bytes.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the span covers no bytes.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if `addr` lies in `[begin, end)`.
    #[inline]
    #[must_use]
    pub const fn contains(&self, addr: usize) -> bool {
        addr >= self.begin && addr < self.end()
    }

    /// The first `len` bytes of this span (the whole span if shorter).
    #[inline]
    #[must_use]
    pub const fn prefix(&self, len: usize) -> Self {
        let len = if len < self.len { len } else { self.len };
        Self {
            begin: self.begin,
            len,
        }
    }
}

/// Address of a node handed out by a pool or a fallback allocator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodePtr(usize);

impl NodePtr {
    /// Wraps a raw address.
    #[inline]
    #[must_use]
    pub const fn from_addr(addr: usize) -> Self {
        Self(addr)
    }

    /// The node's address.
    #[inline]
    #[must_use]
    pub const fn addr(self) -> usize {
        self.0
    }

    /// Returns `true` if `addr + offset` is a multiple of `alignment`.
    #[inline]
    #[must_use]
    pub const fn is_aligned(self, alignment: usize, offset: usize) -> bool {
        (self.0 + offset) % alignment == 0
    }

    /// Byte range of this node inside the region starting at `base`.
    #[inline]
    #[must_use]
    pub fn range_from(self, base: usize, size: usize) -> Option<Range<usize>> {
        let start = self.0.checked_sub(base)?;
        Some(start..start.checked_add(size)?)
    }
}

/// Geometry of the nodes a pool carves out of an arena.
///
/// Consecutive nodes are `stride()` bytes apart: the node size rounded up to
/// the alignment, so every node (not just the first) satisfies
/// `(address + alignment_offset) % alignment == 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeLayout {
    /// Bytes requested per node.
    node_size: usize,
    /// Power-of-two alignment.
    alignment: usize,
    /// Offset within the node that must land on the alignment.
    alignment_offset: usize,
}

impl NodeLayout {
    /// Validates and creates a layout.
    ///
    /// # Errors
    ///
    /// * [`PoolError::ZeroNodeSize`] if `node_size` is zero
    /// * [`PoolError::InvalidAlignment`] if `alignment` is not a power of two
    pub fn new(node_size: usize, alignment: usize, alignment_offset: usize) -> PoolResult<Self> {
        if node_size == 0 {
            return Err(PoolError::ZeroNodeSize);
        }
        if !alignment.is_power_of_two() {
            return Err(PoolError::InvalidAlignment(alignment));
        }
        Ok(Self {
            node_size,
            alignment,
            alignment_offset,
        })
    }

    /// Creates a layout from compile-time parameters.
    ///
    /// # Panics
    ///
    /// Panics (at compile time when used in a constant) if `node_size` is
    /// zero or `alignment` is not a power of two.
    #[must_use]
    pub const fn from_const(node_size: usize, alignment: usize, alignment_offset: usize) -> Self {
        assert!(node_size > 0, "node size must be greater than zero");
        assert!(alignment.is_power_of_two(), "alignment must be a power of two");
        Self {
            node_size,
            alignment,
            alignment_offset,
        }
    }

    /// Bytes requested per node.
    #[inline]
    #[must_use]
    pub const fn node_size(&self) -> usize {
        self.node_size
    }

    /// Node alignment.
    #[inline]
    #[must_use]
    pub const fn alignment(&self) -> usize {
        self.alignment
    }

    /// Alignment offset.
    #[inline]
    #[must_use]
    pub const fn alignment_offset(&self) -> usize {
        self.alignment_offset
    }

    /// Distance between consecutive nodes.
    #[inline]
    #[must_use]
    pub const fn stride(&self) -> usize {
        (self.node_size + self.alignment - 1) & !(self.alignment - 1)
    }

    /// Bytes occupied by `count` nodes laid end to end.
    #[inline]
    #[must_use]
    pub const fn nodes_size(&self, count: usize) -> usize {
        count * self.stride()
    }

    /// Buffer size an owning container must reserve so that `count` nodes
    /// fit whatever the buffer's own alignment.
    #[inline]
    #[must_use]
    pub const fn buffer_size(&self, count: usize) -> usize {
        let slack = if self.alignment > 1 { self.stride() } else { 0 };
        self.nodes_size(count) + slack + self.alignment_offset
    }

    /// First node address at or after `addr`.
    #[inline]
    #[must_use]
    pub const fn align_address(&self, addr: usize) -> usize {
        let mask = self.alignment - 1;
        ((addr + self.alignment_offset + mask) & !mask) - self.alignment_offset
    }

    /// Bytes of an arena starting at `begin` needed to hold `count` nodes.
    #[inline]
    #[must_use]
    pub const fn arena_len_for(&self, begin: usize, count: usize) -> usize {
        (self.align_address(begin) - begin) + self.nodes_size(count)
    }

    /// Number of nodes that fit in `span`.
    #[inline]
    #[must_use]
    pub const fn capacity_in(&self, span: ArenaSpan) -> usize {
        let padding = self.align_address(span.begin()) - span.begin();
        if padding >= span.len() {
            0
        } else {
            (span.len() - padding) / self.stride()
        }
    }
}

/// Bytes of `node` inside the caller's `buffer`.
///
/// Returns `None` if the node does not lie entirely inside `buffer`.
#[must_use]
pub fn node_bytes(buffer: &[u8], node: NodePtr, size: usize) -> Option<&[u8]> {
    let range = node.range_from(buffer.as_ptr() as usize, size)?;
    buffer.get(range)
}

/// Mutable bytes of `node` inside the caller's `buffer`.
///
/// Returns `None` if the node does not lie entirely inside `buffer`.
#[must_use]
pub fn node_bytes_mut(buffer: &mut [u8], node: NodePtr, size: usize) -> Option<&mut [u8]> {
    let range = node.range_from(buffer.as_ptr() as usize, size)?;
    buffer.get_mut(range)
}

/// Views `node` as a `T`.
///
/// Returns `None` if the node is outside `buffer` or misaligned for `T`.
#[must_use]
pub fn node_ref<T: bytemuck::Pod>(buffer: &[u8], node: NodePtr) -> Option<&T> {
    bytemuck::try_from_bytes(node_bytes(buffer, node, size_of::<T>())?).ok()
}

/// Views `node` as a mutable `T`.
///
/// Returns `None` if the node is outside `buffer` or misaligned for `T`.
#[must_use]
pub fn node_mut<T: bytemuck::Pod>(buffer: &mut [u8], node: NodePtr) -> Option<&mut T> {
    bytemuck::try_from_bytes_mut(node_bytes_mut(buffer, node, size_of::<T>())?).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_contains_is_half_open() {
        let span = ArenaSpan::from_raw_parts(0x1000, 64);
        assert!(span.contains(0x1000));
        assert!(span.contains(0x103F));
        assert!(!span.contains(0x1040));
        assert!(!span.contains(0x0FFF));
    }

    #[test]
    fn test_layout_rejects_bad_parameters() {
        assert_eq!(NodeLayout::new(0, 8, 0), Err(PoolError::ZeroNodeSize));
        assert_eq!(NodeLayout::new(16, 0, 0), Err(PoolError::InvalidAlignment(0)));
        assert_eq!(NodeLayout::new(16, 12, 0), Err(PoolError::InvalidAlignment(12)));
    }

    #[test]
    fn test_stride_rounds_up_to_alignment() {
        let layout = NodeLayout::new(20, 8, 0).unwrap();
        assert_eq!(layout.stride(), 24);
        assert_eq!(NodeLayout::new(16, 8, 0).unwrap().stride(), 16);
        assert_eq!(NodeLayout::new(3, 1, 0).unwrap().stride(), 3);
    }

    #[test]
    fn test_align_address_honours_offset() {
        let layout = NodeLayout::new(32, 16, 4).unwrap();
        let first = layout.align_address(0x1001);
        assert_eq!((first + 4) % 16, 0);
        assert!(first >= 0x1001);
        assert_eq!(layout.align_address(0x100C), 0x100C);
    }

    #[test]
    fn test_capacity_accounts_for_padding() {
        let layout = NodeLayout::new(16, 8, 0).unwrap();
        assert_eq!(layout.capacity_in(ArenaSpan::from_raw_parts(0x1000, 128)), 8);
        // 4 bytes of padding leave room for only 7 nodes.
        assert_eq!(layout.capacity_in(ArenaSpan::from_raw_parts(0x1004, 128)), 7);
        assert_eq!(layout.capacity_in(ArenaSpan::from_raw_parts(0x1004, 4)), 0);
    }

    #[test]
    fn test_buffer_size_always_fits_count() {
        let layout = NodeLayout::new(16, 8, 0).unwrap();
        let size = layout.buffer_size(10);
        for misalignment in 0..8 {
            let span = ArenaSpan::from_raw_parts(0x2000 + misalignment, size);
            assert!(layout.capacity_in(span) >= 10);
        }
    }

    #[test]
    fn test_node_views_stay_inside_buffer() {
        let mut buffer = [0u8; 32];
        let base = buffer.as_ptr() as usize;

        let inside = NodePtr::from_addr(base + 8);
        node_bytes_mut(&mut buffer, inside, 8).unwrap().fill(7);
        assert_eq!(&buffer[8..16], &[7; 8]);

        let straddling = NodePtr::from_addr(base + 28);
        assert!(node_bytes(&buffer, straddling, 8).is_none());
        assert!(node_bytes(&buffer, NodePtr::from_addr(base.wrapping_sub(8)), 8).is_none());
    }
}

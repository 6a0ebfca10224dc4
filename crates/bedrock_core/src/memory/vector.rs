//! # Vector Allocator Adapters
//!
//! Allocator shims for contiguous fixed-capacity containers.
//!
//! A fixed vector keeps its elements in its own member buffer of
//! `BUFFER_SIZE` bytes. The allocator is only consulted when the vector
//! wants to grow past that buffer:
//!
//! - [`OverflowVectorAllocator`] hands growth to a fallback allocator and
//!   refuses to free the original member buffer.
//! - [`FixedVectorAllocator`] treats growth as a contract violation.

use std::marker::PhantomData;

use super::arena::{ArenaSpan, NodeLayout, NodePtr};
use super::overflow::{FallbackAllocator, HeapAllocator};
use super::pool::DEFAULT_POOL_NAME;

/// Allocator interface seen by a fixed vector.
pub trait VectorAllocator {
    /// Whether the vector may grow past its member buffer.
    const OVERFLOW: bool;

    /// Allocates `size` bytes for a grown element buffer.
    fn allocate(&mut self, size: usize) -> Option<NodePtr>;

    /// Allocates `size` bytes with `(address + offset) % alignment == 0`.
    fn allocate_aligned(&mut self, size: usize, alignment: usize, offset: usize) -> Option<NodePtr>;

    /// Frees an element buffer.
    fn deallocate(&mut self, buffer: NodePtr, size: usize);

    /// Returns `true` if a growth request can be served.
    fn can_allocate(&self) -> bool;

    /// Diagnostic name.
    fn name(&self) -> &'static str;

    /// Sets the diagnostic name.
    fn set_name(&mut self, name: &'static str);
}

/// Vector allocator that grows into `F`.
#[derive(Debug)]
pub struct OverflowVectorAllocator<
    const SIZE: usize,
    const COUNT: usize,
    const ALIGN: usize,
    const OFFSET: usize,
    F = HeapAllocator,
> {
    /// Where grown buffers come from.
    overflow: F,
    /// The owning vector's member buffer.
    pool_begin: NodePtr,
}

impl<const SIZE: usize, const COUNT: usize, const ALIGN: usize, const OFFSET: usize, F: FallbackAllocator>
    OverflowVectorAllocator<SIZE, COUNT, ALIGN, OFFSET, F>
{
    /// Element geometry.
    pub const LAYOUT: NodeLayout = NodeLayout::from_const(SIZE, ALIGN, OFFSET);
    /// Bytes per element.
    pub const NODE_SIZE: usize = SIZE;
    /// Elements held by the member buffer.
    pub const NODE_COUNT: usize = COUNT;
    /// Bytes occupied by all elements.
    pub const NODES_SIZE: usize = Self::LAYOUT.nodes_size(COUNT);
    /// Bytes the owning vector must reserve for its member buffer.
    pub const BUFFER_SIZE: usize = Self::LAYOUT.buffer_size(COUNT);

    /// Creates an allocator for the vector whose member buffer is `arena`.
    #[must_use]
    pub fn with_overflow(arena: ArenaSpan, overflow: F) -> Self {
        Self {
            overflow,
            pool_begin: NodePtr::from_addr(arena.begin()),
        }
    }

    /// Address of the member buffer; never passed on to the fallback.
    #[inline]
    #[must_use]
    pub const fn pool_begin(&self) -> NodePtr {
        self.pool_begin
    }

    /// Points the allocator at a new member buffer.
    #[inline]
    pub fn reset(&mut self, arena: ArenaSpan) {
        self.pool_begin = NodePtr::from_addr(arena.begin());
    }

    /// The fallback allocator.
    #[inline]
    #[must_use]
    pub const fn overflow_allocator(&self) -> &F {
        &self.overflow
    }

    /// Mutable access to the fallback allocator.
    #[inline]
    pub fn overflow_allocator_mut(&mut self) -> &mut F {
        &mut self.overflow
    }

    /// Replaces the fallback allocator, returning the previous one.
    ///
    /// Buffers obtained from the previous allocator must be freed through
    /// it, not through this adapter.
    pub fn set_overflow_allocator(&mut self, overflow: F) -> F {
        std::mem::replace(&mut self.overflow, overflow)
    }
}

impl<const SIZE: usize, const COUNT: usize, const ALIGN: usize, const OFFSET: usize, F>
    OverflowVectorAllocator<SIZE, COUNT, ALIGN, OFFSET, F>
where
    F: FallbackAllocator + Default,
{
    /// Creates an allocator with a default fallback named after the pool.
    #[must_use]
    pub fn new(arena: ArenaSpan) -> Self {
        let mut overflow = F::default();
        overflow.set_name(DEFAULT_POOL_NAME);
        Self::with_overflow(arena, overflow)
    }

    /// Creates the allocator for a copy of the owning vector.
    ///
    /// The copy gets a fresh fallback allocator carrying this one's name;
    /// grown buffers are never shared between vectors.
    #[must_use]
    pub fn bind_to(&self, arena: ArenaSpan) -> Self {
        let mut overflow = F::default();
        overflow.set_name(self.overflow.name());
        Self::with_overflow(arena, overflow)
    }
}

impl<const SIZE: usize, const COUNT: usize, const ALIGN: usize, const OFFSET: usize, F: FallbackAllocator>
    VectorAllocator for OverflowVectorAllocator<SIZE, COUNT, ALIGN, OFFSET, F>
{
    const OVERFLOW: bool = true;

    #[inline]
    fn allocate(&mut self, size: usize) -> Option<NodePtr> {
        self.overflow.allocate(size)
    }

    #[inline]
    fn allocate_aligned(&mut self, size: usize, alignment: usize, offset: usize) -> Option<NodePtr> {
        self.overflow.allocate_aligned(size, alignment, offset)
    }

    #[inline]
    fn deallocate(&mut self, buffer: NodePtr, size: usize) {
        if buffer != self.pool_begin {
            self.overflow.deallocate(buffer, size);
        }
    }

    #[inline]
    fn can_allocate(&self) -> bool {
        true
    }

    #[inline]
    fn name(&self) -> &'static str {
        self.overflow.name()
    }

    #[inline]
    fn set_name(&mut self, name: &'static str) {
        self.overflow.set_name(name);
    }
}

/// Vector allocator for vectors that must never outgrow their buffer.
#[derive(Debug)]
pub struct FixedVectorAllocator<
    const SIZE: usize,
    const COUNT: usize,
    const ALIGN: usize,
    const OFFSET: usize,
    F = HeapAllocator,
> {
    _fallback: PhantomData<F>,
}

impl<const SIZE: usize, const COUNT: usize, const ALIGN: usize, const OFFSET: usize, F>
    FixedVectorAllocator<SIZE, COUNT, ALIGN, OFFSET, F>
{
    /// Element geometry.
    pub const LAYOUT: NodeLayout = NodeLayout::from_const(SIZE, ALIGN, OFFSET);
    /// Bytes per element.
    pub const NODE_SIZE: usize = SIZE;
    /// Elements held by the member buffer.
    pub const NODE_COUNT: usize = COUNT;
    /// Bytes occupied by all elements.
    pub const NODES_SIZE: usize = Self::LAYOUT.nodes_size(COUNT);
    /// Bytes the owning vector must reserve for its member buffer.
    pub const BUFFER_SIZE: usize = Self::LAYOUT.buffer_size(COUNT);

    /// Creates the allocator; the member buffer is not needed.
    #[must_use]
    pub const fn new(_arena: ArenaSpan) -> Self {
        Self {
            _fallback: PhantomData,
        }
    }

    /// Creates the allocator for a copy of the owning vector.
    #[must_use]
    pub const fn bind_to(&self, arena: ArenaSpan) -> Self {
        Self::new(arena)
    }

    /// There is no fallback allocator to expose.
    #[inline]
    #[must_use]
    pub const fn overflow_allocator(&self) -> Option<&F> {
        None
    }

    fn refuse(size: usize) -> Option<NodePtr> {
        tracing::error!(
            requested = size,
            capacity = COUNT,
            "fixed vector without overflow asked to grow"
        );
        if cfg!(debug_assertions) {
            panic!("fixed vector of {COUNT} elements cannot grow to {size} bytes without overflow enabled");
        }
        None
    }
}

impl<const SIZE: usize, const COUNT: usize, const ALIGN: usize, const OFFSET: usize, F> VectorAllocator
    for FixedVectorAllocator<SIZE, COUNT, ALIGN, OFFSET, F>
{
    const OVERFLOW: bool = false;

    fn allocate(&mut self, size: usize) -> Option<NodePtr> {
        Self::refuse(size)
    }

    fn allocate_aligned(&mut self, size: usize, _alignment: usize, _offset: usize) -> Option<NodePtr> {
        Self::refuse(size)
    }

    #[inline]
    fn deallocate(&mut self, _buffer: NodePtr, _size: usize) {}

    #[inline]
    fn can_allocate(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        DEFAULT_POOL_NAME
    }

    fn set_name(&mut self, _name: &'static str) {}
}

impl<const SIZE: usize, const COUNT: usize, const ALIGN: usize, const OFFSET: usize, F> PartialEq
    for OverflowVectorAllocator<SIZE, COUNT, ALIGN, OFFSET, F>
{
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl<const SIZE: usize, const COUNT: usize, const ALIGN: usize, const OFFSET: usize, F> Eq
    for OverflowVectorAllocator<SIZE, COUNT, ALIGN, OFFSET, F>
{
}

impl<const SIZE: usize, const COUNT: usize, const ALIGN: usize, const OFFSET: usize, F> PartialEq
    for FixedVectorAllocator<SIZE, COUNT, ALIGN, OFFSET, F>
{
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl<const SIZE: usize, const COUNT: usize, const ALIGN: usize, const OFFSET: usize, F> Eq
    for FixedVectorAllocator<SIZE, COUNT, ALIGN, OFFSET, F>
{
}

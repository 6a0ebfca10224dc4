//! # Hash Table Allocator Adapter
//!
//! Node pool plus one fixed bucket array, for fixed-capacity hash tables.
//!
//! Bucket arrays and nodes are requested through distinct operations. The
//! bucket array is a single pre-sized region: every bucket request gets the
//! same address and it is never freed individually.

use super::arena::{ArenaSpan, NodeLayout, NodePtr, WORD_SIZE};
use super::node_pool::NodePoolAdapter;
use super::overflow::{HeapAllocator, OverflowPool};
use super::pool::{FixedPool, FreeListPool};

/// Hash table allocator with a hard node capacity.
pub type FixedHashtableAllocator<
    const BUCKETS: usize,
    const SIZE: usize,
    const COUNT: usize,
    const ALIGN: usize,
    const OFFSET: usize,
> = HashtableAllocatorAdapter<BUCKETS, SIZE, COUNT, ALIGN, OFFSET, FreeListPool>;

/// Hash table allocator whose nodes spill into `A`.
pub type FixedHashtableAllocatorWithOverflow<
    const BUCKETS: usize,
    const SIZE: usize,
    const COUNT: usize,
    const ALIGN: usize,
    const OFFSET: usize,
    A = HeapAllocator,
> = HashtableAllocatorAdapter<BUCKETS, SIZE, COUNT, ALIGN, OFFSET, OverflowPool<A>>;

/// Allocator for a fixed hash table of `BUCKETS` buckets and `COUNT` nodes.
#[derive(Debug)]
pub struct HashtableAllocatorAdapter<
    const BUCKETS: usize,
    const SIZE: usize,
    const COUNT: usize,
    const ALIGN: usize,
    const OFFSET: usize,
    P = FreeListPool,
> {
    /// Node storage.
    nodes: NodePoolAdapter<SIZE, COUNT, ALIGN, OFFSET, P>,
    /// Bucket storage, if the table supplied one.
    buckets: Option<ArenaSpan>,
}

impl<
        const BUCKETS: usize,
        const SIZE: usize,
        const COUNT: usize,
        const ALIGN: usize,
        const OFFSET: usize,
        P: FixedPool,
    > HashtableAllocatorAdapter<BUCKETS, SIZE, COUNT, ALIGN, OFFSET, P>
{
    /// Node geometry.
    pub const LAYOUT: NodeLayout = NodeLayout::from_const(SIZE, ALIGN, OFFSET);
    /// Buckets including the terminating sentinel bucket.
    pub const BUCKET_COUNT: usize = BUCKETS + 1;
    /// Bytes of the bucket array.
    pub const BUCKETS_SIZE: usize = Self::BUCKET_COUNT * WORD_SIZE;
    /// Bytes per node.
    pub const NODE_SIZE: usize = SIZE;
    /// Nodes served from the arena.
    pub const NODE_COUNT: usize = COUNT;
    /// Bytes occupied by all nodes.
    pub const NODES_SIZE: usize = Self::LAYOUT.nodes_size(COUNT);
    /// Bytes the owning table must reserve for buckets and nodes together.
    pub const BUFFER_SIZE: usize = Self::BUCKETS_SIZE + Self::LAYOUT.buffer_size(COUNT);
    /// Whether exhausted node requests spill into a fallback allocator.
    pub const OVERFLOW: bool = P::OVERFLOW;

    /// Creates an allocator with node storage only.
    ///
    /// Bucket requests return `None` until a table built with
    /// [`Self::with_buckets`] is used instead.
    #[must_use]
    pub fn new(node_arena: ArenaSpan) -> Self {
        Self {
            nodes: NodePoolAdapter::new(node_arena),
            buckets: None,
        }
    }

    /// Creates an allocator with node storage and a bucket array.
    #[must_use]
    pub fn with_buckets(node_arena: ArenaSpan, bucket_arena: ArenaSpan) -> Self {
        debug_assert!(
            bucket_arena.len() >= Self::BUCKETS_SIZE,
            "bucket arena holds {} bytes, {} needed",
            bucket_arena.len(),
            Self::BUCKETS_SIZE
        );
        Self {
            nodes: NodePoolAdapter::new(node_arena),
            buckets: Some(bucket_arena),
        }
    }

    /// Creates the allocator for a copy of the owning table, bound to the
    /// copy's own node and bucket arenas.
    #[must_use]
    pub fn bind_to(&self, node_arena: ArenaSpan, bucket_arena: ArenaSpan) -> Self {
        Self {
            nodes: self.nodes.bind_to(node_arena),
            buckets: Some(bucket_arena),
        }
    }

    /// Allocates one node; `size` must equal [`Self::NODE_SIZE`].
    #[inline]
    pub fn allocate_node(&mut self, size: usize) -> Option<NodePtr> {
        self.nodes.allocate(size)
    }

    /// Allocates one node; the node layout already fixes alignment.
    #[inline]
    pub fn allocate_node_aligned(&mut self, size: usize, alignment: usize, offset: usize) -> Option<NodePtr> {
        self.nodes.allocate_aligned(size, alignment, offset)
    }

    /// Returns the bucket array; its placement is fixed by the owning table.
    #[inline]
    pub fn allocate_bucket_array_aligned(&mut self, size: usize, _alignment: usize, _offset: usize) -> Option<NodePtr> {
        self.allocate_bucket_array(size)
    }

    /// Returns the bucket array.
    ///
    /// `size` must fit in [`Self::BUCKETS_SIZE`]; debug builds assert this.
    #[inline]
    pub fn allocate_bucket_array(&mut self, size: usize) -> Option<NodePtr> {
        debug_assert!(
            size <= Self::BUCKETS_SIZE,
            "bucket request of {size} bytes exceeds the fixed {} bytes",
            Self::BUCKETS_SIZE
        );
        self.bucket_array()
    }

    /// Returns a node to the pool; the bucket array is silently kept.
    #[inline]
    pub fn deallocate(&mut self, node: NodePtr, size: usize) {
        if self.bucket_array() != Some(node) {
            self.nodes.deallocate(node, size);
        }
    }

    /// Returns `true` if the node arena still has a free node.
    #[inline]
    #[must_use]
    pub fn can_allocate(&self) -> bool {
        self.nodes.can_allocate()
    }

    /// Rebuilds the node pool over `node_arena`; the bucket array is kept.
    pub fn reset(&mut self, node_arena: ArenaSpan) {
        self.nodes.reset(node_arena);
    }

    /// Address of the bucket array, if any.
    #[inline]
    #[must_use]
    pub fn bucket_array(&self) -> Option<NodePtr> {
        self.buckets.map(|span| NodePtr::from_addr(span.begin()))
    }

    /// The node pool adapter.
    #[inline]
    #[must_use]
    pub const fn nodes(&self) -> &NodePoolAdapter<SIZE, COUNT, ALIGN, OFFSET, P> {
        &self.nodes
    }

    /// Diagnostic name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.nodes.name()
    }

    /// Sets the diagnostic name.
    #[inline]
    pub fn set_name(&mut self, name: &'static str) {
        self.nodes.set_name(name);
    }
}

impl<
        const BUCKETS: usize,
        const SIZE: usize,
        const COUNT: usize,
        const ALIGN: usize,
        const OFFSET: usize,
        P,
    > PartialEq for HashtableAllocatorAdapter<BUCKETS, SIZE, COUNT, ALIGN, OFFSET, P>
{
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl<
        const BUCKETS: usize,
        const SIZE: usize,
        const COUNT: usize,
        const ALIGN: usize,
        const OFFSET: usize,
        P,
    > Eq for HashtableAllocatorAdapter<BUCKETS, SIZE, COUNT, ALIGN, OFFSET, P>
{
}

//! # Node Pool Adapter
//!
//! Allocator facade for node-based fixed containers (lists, maps, sets).
//!
//! Node size, node count and alignment are compile-time parameters; the
//! pool behind the adapter is chosen statically through the [`FixedPool`]
//! type parameter: [`FreeListPool`] for a hard capacity, [`OverflowPool`]
//! to spill into a fallback allocator.

use super::arena::{ArenaSpan, NodeLayout, NodePtr};
use super::overflow::{HeapAllocator, OverflowPool};
use super::pool::{FixedPool, FreeListPool};

/// Node pool with a hard capacity of `COUNT` nodes.
pub type FixedNodePool<const SIZE: usize, const COUNT: usize, const ALIGN: usize, const OFFSET: usize> =
    NodePoolAdapter<SIZE, COUNT, ALIGN, OFFSET, FreeListPool>;

/// Node pool that spills into `A` after `COUNT` nodes.
pub type FixedNodePoolWithOverflow<
    const SIZE: usize,
    const COUNT: usize,
    const ALIGN: usize,
    const OFFSET: usize,
    A = HeapAllocator,
> = NodePoolAdapter<SIZE, COUNT, ALIGN, OFFSET, OverflowPool<A>>;

/// Allocator-shaped facade over a fixed pool of `COUNT` nodes of `SIZE`
/// bytes.
///
/// The owning container supplies the arena (usually a member array of
/// [`NodePoolAdapter::BUFFER_SIZE`] bytes) and keeps it alive.
///
/// Adapters are not `Clone`: a copied container must call
/// [`NodePoolAdapter::bind_to`] with its own arena. Two adapters compare
/// equal only if they are the same instance.
///
/// # Example
///
/// ```rust,ignore
/// type ListPool = FixedNodePool<32, 64, 8, 0>;
///
/// let buffer = vec![0u8; ListPool::BUFFER_SIZE];
/// let mut pool = ListPool::new(ArenaSpan::of(&buffer));
/// let node = pool.allocate(ListPool::NODE_SIZE).expect("room for 64 nodes");
/// pool.deallocate(node, ListPool::NODE_SIZE);
/// ```
#[derive(Debug)]
pub struct NodePoolAdapter<
    const SIZE: usize,
    const COUNT: usize,
    const ALIGN: usize,
    const OFFSET: usize,
    P = FreeListPool,
> {
    /// The pool doing the node recycling.
    pool: P,
    /// The arena currently bound.
    arena: ArenaSpan,
}

impl<const SIZE: usize, const COUNT: usize, const ALIGN: usize, const OFFSET: usize, P: FixedPool>
    NodePoolAdapter<SIZE, COUNT, ALIGN, OFFSET, P>
{
    /// Node geometry; fails to compile for a zero size or a bad alignment.
    pub const LAYOUT: NodeLayout = NodeLayout::from_const(SIZE, ALIGN, OFFSET);
    /// Bytes per node.
    pub const NODE_SIZE: usize = SIZE;
    /// Nodes served from the arena.
    pub const NODE_COUNT: usize = COUNT;
    /// Bytes occupied by all nodes.
    pub const NODES_SIZE: usize = Self::LAYOUT.nodes_size(COUNT);
    /// Bytes the owning container must reserve for the arena.
    pub const BUFFER_SIZE: usize = Self::LAYOUT.buffer_size(COUNT);
    /// Node alignment.
    pub const NODE_ALIGNMENT: usize = ALIGN;
    /// Node alignment offset.
    pub const NODE_ALIGNMENT_OFFSET: usize = OFFSET;
    /// Whether exhausted requests spill into a fallback allocator.
    pub const OVERFLOW: bool = P::OVERFLOW;

    /// Creates an adapter carving `arena` into at most `COUNT` nodes.
    #[must_use]
    pub fn new(arena: ArenaSpan) -> Self {
        let arena = Self::clamp(arena);
        Self {
            pool: P::with_arena(arena, Self::LAYOUT),
            arena,
        }
    }

    /// Creates the adapter for a copy of the owning container.
    ///
    /// The result carries this adapter's static parameters and name but a
    /// fresh pool over `arena`, the copy's own buffer. No node, free list or
    /// counter is shared with `self`.
    #[must_use]
    pub fn bind_to(&self, arena: ArenaSpan) -> Self {
        let mut bound = Self::new(arena);
        bound.set_name(self.name());
        tracing::debug!(
            pool = self.name(),
            from = self.arena.begin(),
            to = bound.arena.begin(),
            "node pool rebound to a new arena"
        );
        bound
    }

    /// Allocates one node.
    ///
    /// `size` must equal [`Self::NODE_SIZE`]; debug builds assert this.
    #[inline]
    pub fn allocate(&mut self, size: usize) -> Option<NodePtr> {
        debug_assert_eq!(size, SIZE, "node pools only serve {}-byte requests", SIZE);
        self.pool.allocate()
    }

    /// Allocates one node; the node layout already fixes alignment.
    #[inline]
    pub fn allocate_aligned(&mut self, size: usize, _alignment: usize, _offset: usize) -> Option<NodePtr> {
        self.allocate(size)
    }

    /// Returns a node to the pool.
    #[inline]
    pub fn deallocate(&mut self, node: NodePtr, _size: usize) {
        self.pool.deallocate(node);
    }

    /// Returns `true` if the fixed arena still has a free node.
    #[inline]
    #[must_use]
    pub fn can_allocate(&self) -> bool {
        self.pool.can_allocate()
    }

    /// Rebuilds the pool over `arena`.
    ///
    /// Outstanding nodes are forgotten, not destroyed: the container owning
    /// the old arena decides what happens to their contents.
    pub fn reset(&mut self, arena: ArenaSpan) {
        self.arena = Self::clamp(arena);
        self.pool.init(self.arena, Self::LAYOUT);
    }

    /// The arena currently bound.
    #[inline]
    #[must_use]
    pub const fn arena(&self) -> ArenaSpan {
        self.arena
    }

    /// The pool behind the adapter.
    #[inline]
    #[must_use]
    pub const fn pool(&self) -> &P {
        &self.pool
    }

    /// Nodes currently allocated.
    #[inline]
    #[must_use]
    pub fn current_size(&self) -> usize {
        self.pool.stats().current()
    }

    /// Most nodes allocated at once since the last reset.
    #[inline]
    #[must_use]
    pub fn peak_size(&self) -> usize {
        self.pool.stats().peak()
    }

    /// Diagnostic name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.pool.name()
    }

    /// Sets the diagnostic name.
    #[inline]
    pub fn set_name(&mut self, name: &'static str) {
        self.pool.set_name(name);
    }

    /// Limits `arena` to the bytes `COUNT` nodes need.
    fn clamp(arena: ArenaSpan) -> ArenaSpan {
        arena.prefix(Self::LAYOUT.arena_len_for(arena.begin(), COUNT))
    }
}

impl<const SIZE: usize, const COUNT: usize, const ALIGN: usize, const OFFSET: usize, P> PartialEq
    for NodePoolAdapter<SIZE, COUNT, ALIGN, OFFSET, P>
{
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl<const SIZE: usize, const COUNT: usize, const ALIGN: usize, const OFFSET: usize, P> Eq
    for NodePoolAdapter<SIZE, COUNT, ALIGN, OFFSET, P>
{
}

#[cfg(test)]
mod tests {
    use super::*;

    type SmallPool = FixedNodePool<16, 4, 8, 0>;
    type SpillPool = FixedNodePoolWithOverflow<16, 4, 8, 0>;

    #[test]
    fn test_adapter_constants() {
        assert_eq!(SmallPool::NODE_SIZE, 16);
        assert_eq!(SmallPool::NODE_COUNT, 4);
        assert_eq!(SmallPool::NODES_SIZE, 64);
        assert_eq!(SmallPool::BUFFER_SIZE, 80);
        assert!(!SmallPool::OVERFLOW);
        assert!(SpillPool::OVERFLOW);
    }

    #[test]
    fn test_adapter_capacity_is_node_count() {
        // A buffer bigger than needed still yields exactly COUNT nodes.
        let buffer = vec![0u8; SmallPool::BUFFER_SIZE * 2];
        let mut pool = SmallPool::new(ArenaSpan::of(&buffer));

        for _ in 0..4 {
            let node = pool.allocate(16).unwrap();
            assert!(node.is_aligned(8, 0));
        }
        assert!(pool.allocate(16).is_none());
        assert_eq!(pool.peak_size(), 4);
    }

    #[test]
    fn test_adapter_with_overflow_never_fails() {
        let buffer = vec![0u8; SpillPool::BUFFER_SIZE];
        let mut pool = SpillPool::new(ArenaSpan::of(&buffer));

        let nodes: Vec<_> = (0..10).map(|_| pool.allocate(16).unwrap()).collect();
        assert_eq!(pool.pool().overflow_allocator().live_blocks(), 6);

        for node in nodes {
            pool.deallocate(node, 16);
        }
        assert_eq!(pool.pool().overflow_allocator().live_blocks(), 0);
        assert_eq!(pool.current_size(), 0);
        assert_eq!(pool.peak_size(), 10);
    }

    #[test]
    fn test_adapter_reset_forgets_nodes() {
        let first = vec![0u8; SmallPool::BUFFER_SIZE];
        let second = vec![0u8; SmallPool::BUFFER_SIZE];
        let mut pool = SmallPool::new(ArenaSpan::of(&first));
        while pool.allocate(16).is_some() {}

        pool.reset(ArenaSpan::of(&second));
        assert!(pool.can_allocate());
        let node = pool.allocate(16).unwrap();
        assert!(ArenaSpan::of(&second).contains(node.addr()));
    }

    #[test]
    fn test_bind_to_uses_the_new_arena_only() {
        let original = vec![0u8; SpillPool::BUFFER_SIZE];
        let copy = vec![0u8; SpillPool::BUFFER_SIZE];

        let mut source = SpillPool::new(ArenaSpan::of(&original));
        source.set_name("enemies");
        let kept = source.allocate(16).unwrap();

        let mut bound = source.bind_to(ArenaSpan::of(&copy));
        assert_eq!(bound.name(), "enemies");
        assert_eq!(bound.current_size(), 0);

        let node = bound.allocate(16).unwrap();
        assert!(ArenaSpan::of(&copy).contains(node.addr()));
        assert!(ArenaSpan::of(&original).contains(kept.addr()));
    }

    #[test]
    fn test_overflow_node_freed_after_reset() {
        type TinyPool = FixedNodePoolWithOverflow<16, 2, 8, 0>;

        let first = vec![0u8; TinyPool::BUFFER_SIZE];
        let second = vec![0u8; TinyPool::BUFFER_SIZE];
        let mut pool = TinyPool::new(ArenaSpan::of(&first));

        let nodes: Vec<_> = (0..3).map(|_| pool.allocate(16).unwrap()).collect();
        let spilled = nodes[2];
        assert!(!ArenaSpan::of(&first).contains(spilled.addr()));

        pool.reset(ArenaSpan::of(&second));
        assert_eq!(pool.current_size(), 1);

        pool.deallocate(spilled, 16);
        assert_eq!(pool.current_size(), 0);
        assert_eq!(pool.pool().overflow_allocator().live_blocks(), 0);
        assert_eq!(pool.pool().fixed().free_count(), 2);
    }

    #[test]
    fn test_allocate_aligned_serves_pool_nodes() {
        let buffer = vec![0u8; SmallPool::BUFFER_SIZE];
        let mut pool = SmallPool::new(ArenaSpan::of(&buffer));

        let node = pool.allocate_aligned(16, 8, 0).unwrap();
        assert!(node.is_aligned(8, 0));
        assert!(pool.arena().contains(node.addr()));
        assert_eq!(pool.current_size(), 1);

        pool.deallocate(node, 16);
        assert_eq!(pool.current_size(), 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "node pools only serve 16-byte requests")]
    fn test_wrong_node_size_asserts_in_debug() {
        let buffer = vec![0u8; SmallPool::BUFFER_SIZE];
        let mut pool = SmallPool::new(ArenaSpan::of(&buffer));
        let _ = pool.allocate(8);
    }

    #[test]
    fn test_adapter_equality_is_identity() {
        let buffer = vec![0u8; SmallPool::BUFFER_SIZE];
        let a = SmallPool::new(ArenaSpan::of(&buffer));
        let b = SmallPool::new(ArenaSpan::of(&buffer));
        let same = &a;
        assert!(*same == a);
        assert!(a != b);
    }
}

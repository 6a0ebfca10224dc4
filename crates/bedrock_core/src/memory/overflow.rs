//! # Overflow Pool
//!
//! A free-list pool that spills into a general-purpose allocator once its
//! fixed arena is exhausted.
//!
//! Deallocation is routed by a single address-range test: nodes inside the
//! arena go back on the free list, everything else goes back to the
//! fallback allocator. This only works because the fallback allocator never
//! returns memory inside the caller's arena.

use std::collections::HashMap;

use super::arena::{ArenaSpan, NodeLayout, NodePtr};
use super::pool::{FixedPool, FreeListPool, PoolStats, DEFAULT_POOL_NAME};

/// Name given to a [`HeapAllocator`] created with `Default`.
pub const DEFAULT_ALLOCATOR_NAME: &str = "bedrock";

/// General-purpose allocator that fixed pools fall back to.
pub trait FallbackAllocator {
    /// Allocates `size` bytes.
    fn allocate(&mut self, size: usize) -> Option<NodePtr>;

    /// Allocates `size` bytes such that `(address + offset) % alignment == 0`.
    fn allocate_aligned(&mut self, size: usize, alignment: usize, offset: usize) -> Option<NodePtr>;

    /// Frees a block obtained from this allocator.
    fn deallocate(&mut self, node: NodePtr, size: usize);

    /// Diagnostic name.
    fn name(&self) -> &'static str;

    /// Sets the diagnostic name.
    fn set_name(&mut self, name: &'static str);
}

/// One heap block.
#[derive(Debug)]
struct Block {
    /// Backing storage; never moves while the block is live.
    storage: Box<[u8]>,
    /// Offset of the aligned address inside `storage`.
    start: usize,
    /// Bytes requested.
    size: usize,
}

/// Fallback allocator backed by the global heap.
///
/// Every block is its own heap allocation, so block addresses can never fall
/// inside a caller's arena. Blocks are tracked by address to give the caller
/// access to their bytes and to support live-block accounting.
#[derive(Debug)]
pub struct HeapAllocator {
    /// Diagnostic name.
    name: &'static str,
    /// Live blocks keyed by the address handed out.
    blocks: HashMap<usize, Block>,
    /// Sum of requested sizes of live blocks.
    live_bytes: usize,
}

impl HeapAllocator {
    /// Creates an allocator labelled `name`.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            blocks: HashMap::new(),
            live_bytes: 0,
        }
    }

    /// Number of live blocks.
    #[inline]
    #[must_use]
    pub fn live_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Requested bytes of all live blocks.
    #[inline]
    #[must_use]
    pub const fn live_bytes(&self) -> usize {
        self.live_bytes
    }

    /// Returns `true` if `node` is a live block of this allocator.
    #[inline]
    #[must_use]
    pub fn owns(&self, node: NodePtr) -> bool {
        self.blocks.contains_key(&node.addr())
    }

    /// Bytes of a live block.
    #[must_use]
    pub fn block(&self, node: NodePtr) -> Option<&[u8]> {
        let block = self.blocks.get(&node.addr())?;
        block.storage.get(block.start..block.start + block.size)
    }

    /// Mutable bytes of a live block.
    pub fn block_mut(&mut self, node: NodePtr) -> Option<&mut [u8]> {
        let block = self.blocks.get_mut(&node.addr())?;
        block.storage.get_mut(block.start..block.start + block.size)
    }
}

impl Default for HeapAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOCATOR_NAME)
    }
}

impl FallbackAllocator for HeapAllocator {
    fn allocate(&mut self, size: usize) -> Option<NodePtr> {
        self.allocate_aligned(size, 1, 0)
    }

    fn allocate_aligned(&mut self, size: usize, alignment: usize, offset: usize) -> Option<NodePtr> {
        debug_assert!(alignment.is_power_of_two(), "alignment {alignment} is not a power of two");
        let mask = alignment.max(1) - 1;

        // Zero-sized requests still get a unique address.
        let storage = vec![0u8; size.max(1) + mask].into_boxed_slice();
        let base = storage.as_ptr() as usize;
        let addr = ((base + offset + mask) & !mask) - offset;

        self.live_bytes += size;
        self.blocks.insert(
            addr,
            Block {
                storage,
                start: addr - base,
                size,
            },
        );
        Some(NodePtr::from_addr(addr))
    }

    fn deallocate(&mut self, node: NodePtr, size: usize) {
        let released = self.blocks.remove(&node.addr());
        debug_assert!(released.is_some(), "{node:?} was not allocated by '{}'", self.name);
        if let Some(block) = released {
            debug_assert_eq!(block.size, size, "deallocate size mismatch for {node:?}");
            self.live_bytes -= block.size;
        }
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn set_name(&mut self, name: &'static str) {
        self.name = name;
    }
}

/// A fixed pool that falls back to `A` when its arena is exhausted.
///
/// # Example
///
/// ```rust,ignore
/// let buffer = [0u8; 64];
/// let layout = NodeLayout::new(16, 8, 0)?;
/// let mut pool: OverflowPool = OverflowPool::with_arena(ArenaSpan::of(&buffer), layout);
///
/// // The fifth node comes from the heap.
/// let nodes: Vec<_> = (0..5).filter_map(|_| pool.allocate()).collect();
/// assert_eq!(pool.overflow_allocator().live_blocks(), 1);
/// ```
#[derive(Debug)]
pub struct OverflowPool<A = HeapAllocator> {
    /// The fixed part.
    pool: FreeListPool,
    /// Where exhausted requests go.
    overflow: A,
    /// Arena bounds used to route deallocations.
    bounds: ArenaSpan,
    /// Geometry of every node, fixed or overflowed.
    layout: NodeLayout,
    /// Overflow nodes not yet returned; they outlive `init`.
    overflow_live: usize,
    /// Set once a request spilled since the last init.
    spilled: bool,
}

impl<A: FallbackAllocator> OverflowPool<A> {
    /// Creates a pool over `span` spilling into `overflow`.
    pub fn with_overflow(span: ArenaSpan, layout: NodeLayout, overflow: A) -> Self {
        Self {
            pool: FreeListPool::with_arena(span, layout),
            overflow,
            bounds: span,
            layout,
            overflow_live: 0,
            spilled: false,
        }
    }

    /// Rebuilds the fixed part over `span`.
    ///
    /// Overflow nodes still held by the caller remain valid fallback blocks
    /// and can still be deallocated through this pool. They stay counted in
    /// `current_size`, and `peak_size` restarts from that count. `layout`
    /// must keep the node size those blocks were allocated with.
    pub fn init(&mut self, span: ArenaSpan, layout: NodeLayout) {
        debug_assert!(
            self.overflow_live == 0 || layout.node_size() == self.layout.node_size(),
            "node size changed while {} overflow nodes are outstanding",
            self.overflow_live
        );
        self.pool.init(span, layout);
        *self.pool.stats_mut() = PoolStats::outstanding(self.overflow_live);
        self.bounds = span;
        self.layout = layout;
        self.spilled = false;
    }

    /// Allocates one node, from the arena if possible, else from the fallback.
    pub fn allocate(&mut self) -> Option<NodePtr> {
        let node = match self.pool.pop_free() {
            Some(node) => Some(node),
            None => self.spill(),
        };
        if node.is_some() {
            self.pool.stats_mut().record_allocate();
        }
        node
    }

    /// Returns `node` to whichever side produced it.
    pub fn deallocate(&mut self, node: NodePtr) {
        if self.bounds.contains(node.addr()) {
            self.pool.push_free(node);
        } else {
            self.overflow.deallocate(node, self.layout.node_size());
            self.overflow_live = self.overflow_live.saturating_sub(1);
        }
        self.pool.stats_mut().record_deallocate();
    }

    /// Returns `true` if the fixed arena still has a free node.
    ///
    /// The fallback is not consulted: an overflow pool can always try.
    #[inline]
    #[must_use]
    pub const fn can_allocate(&self) -> bool {
        self.pool.can_allocate()
    }

    /// Returns `true` if `node` lies inside the fixed arena.
    #[inline]
    #[must_use]
    pub const fn is_fixed_node(&self, node: NodePtr) -> bool {
        self.bounds.contains(node.addr())
    }

    /// The fixed part.
    #[inline]
    #[must_use]
    pub const fn fixed(&self) -> &FreeListPool {
        &self.pool
    }

    /// Overflow nodes currently held by the caller.
    #[inline]
    #[must_use]
    pub const fn overflow_size(&self) -> usize {
        self.overflow_live
    }

    /// Nodes currently allocated, fixed and overflowed.
    #[inline]
    #[must_use]
    pub const fn current_size(&self) -> usize {
        self.pool.current_size()
    }

    /// Most nodes allocated at once since the last init.
    #[inline]
    #[must_use]
    pub const fn peak_size(&self) -> usize {
        self.pool.peak_size()
    }

    /// The fallback allocator.
    #[inline]
    #[must_use]
    pub const fn overflow_allocator(&self) -> &A {
        &self.overflow
    }

    /// Mutable access to the fallback allocator.
    #[inline]
    pub fn overflow_allocator_mut(&mut self) -> &mut A {
        &mut self.overflow
    }

    /// Diagnostic name of the fallback allocator.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.overflow.name()
    }

    /// Renames the fallback allocator.
    #[inline]
    pub fn set_name(&mut self, name: &'static str) {
        self.overflow.set_name(name);
    }

    fn spill(&mut self) -> Option<NodePtr> {
        let node = self.overflow.allocate_aligned(
            self.layout.node_size(),
            self.layout.alignment(),
            self.layout.alignment_offset(),
        )?;
        if !self.spilled {
            self.spilled = true;
            tracing::debug!(
                pool = self.overflow.name(),
                capacity = self.pool.capacity(),
                "fixed pool exhausted, spilling into fallback allocator"
            );
        }
        self.overflow_live += 1;
        tracing::trace!(addr = node.addr(), "overflow node allocated");
        Some(node)
    }
}

impl<A: FallbackAllocator + Default> OverflowPool<A> {
    /// Creates a pool over `span` with a default fallback allocator named
    /// after the pool.
    #[must_use]
    pub fn with_arena(span: ArenaSpan, layout: NodeLayout) -> Self {
        let mut overflow = A::default();
        overflow.set_name(DEFAULT_POOL_NAME);
        Self::with_overflow(span, layout, overflow)
    }
}

impl<A: FallbackAllocator + Default> FixedPool for OverflowPool<A> {
    const OVERFLOW: bool = true;

    fn with_arena(span: ArenaSpan, layout: NodeLayout) -> Self {
        Self::with_arena(span, layout)
    }

    fn init(&mut self, span: ArenaSpan, layout: NodeLayout) {
        Self::init(self, span, layout);
    }

    fn allocate(&mut self) -> Option<NodePtr> {
        Self::allocate(self)
    }

    fn deallocate(&mut self, node: NodePtr) {
        Self::deallocate(self, node);
    }

    fn can_allocate(&self) -> bool {
        Self::can_allocate(self)
    }

    fn stats(&self) -> PoolStats {
        self.pool.stats()
    }

    fn name(&self) -> &'static str {
        Self::name(self)
    }

    fn set_name(&mut self, name: &'static str) {
        Self::set_name(self, name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[repr(C, align(16))]
    struct Aligned64([u8; 64]);

    fn layout() -> NodeLayout {
        NodeLayout::new(16, 8, 0).unwrap()
    }

    #[test]
    fn test_heap_allocator_respects_alignment() {
        let mut heap = HeapAllocator::default();
        for alignment in [1, 2, 8, 64, 256] {
            let node = heap.allocate_aligned(24, alignment, 0).unwrap();
            assert!(node.is_aligned(alignment, 0));
        }
        let offset_node = heap.allocate_aligned(24, 16, 4).unwrap();
        assert!(offset_node.is_aligned(16, 4));
        assert_eq!(heap.live_blocks(), 6);
        assert_eq!(heap.live_bytes(), 6 * 24);
    }

    #[test]
    fn test_heap_allocator_blocks_are_writable() {
        let mut heap = HeapAllocator::new("scratch");
        let node = heap.allocate(8).unwrap();
        heap.block_mut(node).unwrap().copy_from_slice(&[9; 8]);
        assert_eq!(heap.block(node).unwrap(), &[9; 8]);

        heap.deallocate(node, 8);
        assert!(heap.block(node).is_none());
        assert_eq!(heap.live_bytes(), 0);
    }

    #[test]
    fn test_overflow_spills_when_arena_exhausted() {
        let buffer = Aligned64([0; 64]);
        let mut pool: OverflowPool = OverflowPool::with_arena(ArenaSpan::of(&buffer.0), layout());

        let fixed: Vec<_> = (0..4).map(|_| pool.allocate().unwrap()).collect();
        assert!(fixed.iter().all(|&n| pool.is_fixed_node(n)));
        assert!(!pool.can_allocate());

        let spilled = pool.allocate().unwrap();
        assert!(!pool.is_fixed_node(spilled));
        assert!(spilled.is_aligned(8, 0));
        assert_eq!(pool.overflow_allocator().live_blocks(), 1);
        assert_eq!(pool.current_size(), 5);
        assert_eq!(pool.peak_size(), 5);
    }

    #[test]
    fn test_overflow_routes_deallocation_by_range() {
        let buffer = Aligned64([0; 64]);
        let mut pool: OverflowPool = OverflowPool::with_arena(ArenaSpan::of(&buffer.0), layout());

        let fixed: Vec<_> = (0..4).map(|_| pool.allocate().unwrap()).collect();
        let spilled = pool.allocate().unwrap();

        pool.deallocate(spilled);
        assert_eq!(pool.overflow_allocator().live_blocks(), 0);
        // The fixed free list is untouched by the fallback node.
        assert!(!pool.can_allocate());
        assert_eq!(pool.fixed().free_count(), 0);

        pool.deallocate(fixed[2]);
        assert_eq!(pool.fixed().free_count(), 1);
        assert_eq!(pool.allocate(), Some(fixed[2]));
        assert_eq!(pool.overflow_allocator().live_blocks(), 0);
    }

    #[test]
    fn test_overflow_nodes_survive_init() {
        let first = Aligned64([0; 64]);
        let second = Aligned64([0; 64]);
        let mut pool: OverflowPool = OverflowPool::with_arena(ArenaSpan::of(&first.0), layout());

        let _fixed: Vec<_> = (0..4).map(|_| pool.allocate().unwrap()).collect();
        let spilled = pool.allocate().unwrap();
        assert_eq!(pool.overflow_size(), 1);

        pool.init(ArenaSpan::of(&second.0), layout());
        assert_eq!(pool.current_size(), 1);
        assert_eq!(pool.peak_size(), 1);
        assert_eq!(pool.fixed().free_count(), 4);

        pool.deallocate(spilled);
        assert_eq!(pool.current_size(), 0);
        assert_eq!(pool.overflow_size(), 0);
        assert_eq!(pool.overflow_allocator().live_blocks(), 0);
    }

    #[test]
    fn test_overflow_name_forwards_to_fallback() {
        let buffer = Aligned64([0; 64]);
        let mut pool: OverflowPool = OverflowPool::with_arena(ArenaSpan::of(&buffer.0), layout());
        assert_eq!(pool.name(), DEFAULT_POOL_NAME);

        pool.set_name("particles");
        assert_eq!(pool.name(), "particles");
        assert_eq!(pool.overflow_allocator().name(), "particles");
    }
}

//! # Free-List Pool
//!
//! Fixed-size node allocator over a caller-owned arena.
//!
//! The arena is treated as an array of node slots. Free slots are chained
//! through slot indices, so allocate and deallocate are both O(1) and never
//! touch the arena bytes themselves.
//!
//! The slot table lives on the heap, one 4-byte entry per node. It is sized
//! by `init` and reuses its capacity when re-initialized over an arena of
//! the same or fewer nodes.

use super::arena::{ArenaSpan, NodeLayout, NodePtr};

/// Name reported by pools that carry no allocator of their own.
pub const DEFAULT_POOL_NAME: &str = "bedrock fixed_pool";

/// State of one node slot: the next free slot index, [`LAST`] at the end of
/// the free list, or [`LIVE`] while the node is handed out.
type Slot = u32;

/// Free-list terminator.
const LAST: Slot = u32::MAX - 1;

/// Marks a node handed out to the caller.
const LIVE: Slot = u32::MAX;

/// Most nodes one pool can index.
pub const MAX_NODES: usize = LAST as usize;

/// Current/peak allocation counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Nodes currently allocated.
    current: usize,
    /// Most nodes ever allocated at once since the last init.
    peak: usize,
}

impl PoolStats {
    /// Nodes currently allocated.
    #[inline]
    #[must_use]
    pub const fn current(&self) -> usize {
        self.current
    }

    /// High-water mark of concurrently allocated nodes.
    #[inline]
    #[must_use]
    pub const fn peak(&self) -> usize {
        self.peak
    }

    #[inline]
    pub(crate) fn record_allocate(&mut self) {
        self.current += 1;
        if self.current > self.peak {
            self.peak = self.current;
        }
    }

    #[inline]
    pub(crate) fn record_deallocate(&mut self) {
        debug_assert!(self.current > 0, "deallocate without a matching allocate");
        self.current = self.current.saturating_sub(1);
    }

    /// Fresh counters with `live` nodes still outstanding.
    #[inline]
    pub(crate) const fn outstanding(live: usize) -> Self {
        Self {
            current: live,
            peak: live,
        }
    }
}

/// A pool that recycles fixed-size nodes of one arena.
///
/// This is the behaviour shared by the free-list pool and the overflow pool,
/// and the seam node-pool adapters select over at compile time.
pub trait FixedPool {
    /// `true` if the pool falls back to a general allocator when full.
    const OVERFLOW: bool;

    /// Creates a pool carving `span` into nodes of `layout`.
    fn with_arena(span: ArenaSpan, layout: NodeLayout) -> Self
    where
        Self: Sized;

    /// Rebuilds the pool over `span`, forgetting every outstanding arena node.
    fn init(&mut self, span: ArenaSpan, layout: NodeLayout);

    /// Allocates one node, or `None` when exhausted.
    fn allocate(&mut self) -> Option<NodePtr>;

    /// Returns a node obtained from [`FixedPool::allocate`].
    fn deallocate(&mut self, node: NodePtr);

    /// Returns `true` if the fixed arena still has a free node.
    fn can_allocate(&self) -> bool;

    /// Allocation counters.
    fn stats(&self) -> PoolStats;

    /// Diagnostic name.
    fn name(&self) -> &'static str;

    /// Sets the diagnostic name (ignored by pools without an allocator).
    fn set_name(&mut self, name: &'static str);
}

/// A free-list pool over a caller-owned arena.
///
/// Nodes are handed out in increasing address order after init, and
/// deallocated nodes are reused last-in first-out.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. Every mutation takes `&mut self`.
///
/// # Example
///
/// ```rust,ignore
/// let buffer = [0u8; 128];
/// let layout = NodeLayout::new(16, 8, 0)?;
/// let mut pool = FreeListPool::with_arena(ArenaSpan::of(&buffer), layout);
///
/// // Allocate - O(1), no heap allocation
/// let node = pool.allocate().expect("pool has room");
///
/// // Free - O(1)
/// pool.deallocate(node);
/// ```
#[derive(Debug, Default)]
pub struct FreeListPool {
    /// One entry per node slot.
    slots: Vec<Slot>,
    /// First free slot.
    head: Option<usize>,
    /// Number of slots on the free list.
    free: usize,
    /// Address of slot 0.
    first_node: usize,
    /// Distance between slots.
    stride: usize,
    /// Allocation counters.
    stats: PoolStats,
    /// Set once `init` has run.
    initialized: bool,
}

impl FreeListPool {
    /// Creates a pool with no arena; every allocation fails until `init`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            head: None,
            free: 0,
            first_node: 0,
            stride: 0,
            stats: PoolStats {
                current: 0,
                peak: 0,
            },
            initialized: false,
        }
    }

    /// Creates a pool over `span`.
    #[must_use]
    pub fn with_arena(span: ArenaSpan, layout: NodeLayout) -> Self {
        let mut pool = Self::new();
        pool.init(span, layout);
        pool
    }

    /// Carves `span` into nodes and chains them in increasing address order.
    ///
    /// Re-initializing discards all outstanding nodes without notice and
    /// resets the counters. Arenas holding more than [`MAX_NODES`] nodes
    /// only use the first [`MAX_NODES`].
    pub fn init(&mut self, span: ArenaSpan, layout: NodeLayout) {
        let capacity = layout.capacity_in(span).min(MAX_NODES);

        self.first_node = layout.align_address(span.begin());
        self.stride = layout.stride();
        self.slots.clear();
        self.slots.extend((1..=capacity).map(|next| Self::link(next, capacity)));
        self.head = (capacity > 0).then_some(0);
        self.free = capacity;
        self.stats = PoolStats::default();
        self.initialized = true;

        tracing::debug!(
            capacity,
            node_size = layout.node_size(),
            stride = self.stride,
            padding = self.first_node - span.begin(),
            "fixed pool initialized"
        );
    }

    /// Allocates one node in O(1).
    ///
    /// # Returns
    ///
    /// The node, or `None` if the arena is exhausted.
    #[inline]
    pub fn allocate(&mut self) -> Option<NodePtr> {
        let node = self.pop_free()?;
        self.stats.record_allocate();
        Some(node)
    }

    /// Returns `node` to the free list in O(1).
    ///
    /// `node` must come from [`FreeListPool::allocate`] on this pool and must
    /// not already be free. Debug builds assert this; release builds trust it.
    #[inline]
    pub fn deallocate(&mut self, node: NodePtr) {
        self.push_free(node);
        self.stats.record_deallocate();
    }

    /// Returns `true` if a node is available.
    #[inline]
    #[must_use]
    pub const fn can_allocate(&self) -> bool {
        self.head.is_some()
    }

    /// Total number of nodes in the arena.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of nodes on the free list.
    #[inline]
    #[must_use]
    pub const fn free_count(&self) -> usize {
        self.free
    }

    /// Nodes currently allocated.
    #[inline]
    #[must_use]
    pub const fn current_size(&self) -> usize {
        self.stats.current
    }

    /// Most nodes allocated at once since the last init.
    #[inline]
    #[must_use]
    pub const fn peak_size(&self) -> usize {
        self.stats.peak
    }

    /// Allocation counters.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Returns `true` if `node` is one of this pool's slots.
    #[must_use]
    pub fn owns(&self, node: NodePtr) -> bool {
        self.slot_index(node).is_some()
    }

    /// Diagnostic name.
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        DEFAULT_POOL_NAME
    }

    /// A plain pool has no allocator to label.
    #[inline]
    pub fn set_name(&mut self, _name: &'static str) {}

    /// Pops the free-list head without touching the counters.
    #[inline]
    pub(crate) fn pop_free(&mut self) -> Option<NodePtr> {
        debug_assert!(self.initialized, "allocation from an uninitialized pool");
        let index = self.head?;
        let next = self.slots[index];
        debug_assert!(next != LIVE, "free list links to a live node");
        self.slots[index] = LIVE;
        self.head = (next < LAST).then_some(next as usize);
        self.free -= 1;
        Some(NodePtr::from_addr(self.first_node + index * self.stride))
    }

    /// Pushes `node` on the free-list head without touching the counters.
    #[inline]
    pub(crate) fn push_free(&mut self, node: NodePtr) {
        let index = self.slot_index(node);
        debug_assert!(index.is_some(), "node {node:?} does not belong to this pool");
        let Some(index) = index else {
            return;
        };
        debug_assert!(self.slots[index] == LIVE, "double free of node {node:?}");
        self.slots[index] = self.head.map_or(LAST, |head| Self::link(head, usize::MAX));
        self.head = Some(index);
        self.free += 1;
    }

    /// Counter access for pools layered on top of this one.
    #[inline]
    pub(crate) fn stats_mut(&mut self) -> &mut PoolStats {
        &mut self.stats
    }

    /// Link to slot `next`, or [`LAST`] once `next` reaches `end`.
    #[inline]
    fn link(next: usize, end: usize) -> Slot {
        if next >= end {
            LAST
        } else {
            Slot::try_from(next).unwrap_or(LAST)
        }
    }

    /// Slot index of `node`, if it is a slot boundary of this pool.
    fn slot_index(&self, node: NodePtr) -> Option<usize> {
        let offset = node.addr().checked_sub(self.first_node)?;
        if self.stride == 0 || offset % self.stride != 0 {
            return None;
        }
        let index = offset / self.stride;
        (index < self.slots.len()).then_some(index)
    }
}

impl FixedPool for FreeListPool {
    const OVERFLOW: bool = false;

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
        Self::stats(self)
    }

    fn name(&self) -> &'static str {
        Self::name(self)
    }

    fn set_name(&mut self, name: &'static str) {
        Self::set_name(self, name);
    }
}

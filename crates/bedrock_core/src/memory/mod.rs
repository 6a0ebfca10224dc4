//! # Memory Management
//!
//! Fixed-size node pools over caller-owned arenas.
//!
//! ## Design Philosophy
//!
//! The owning container allocates its arena once, usually as a member
//! array. Each pool keeps a small slot table (4 bytes per node) on the heap,
//! sized when the pool is built, reset or rebound. After that:
//! - Node allocation and deallocation are O(1)
//! - No heap allocations unless overflow is enabled and the arena is full
//! - Pools never read or write arena bytes
//!
//! ## Layers
//!
//! - [`FreeListPool`] / [`OverflowPool`]: the recycling engines
//! - [`NodePoolAdapter`], [`HashtableAllocatorAdapter`],
//!   [`OverflowVectorAllocator`] / [`FixedVectorAllocator`]: container-facing
//!   allocators with compile-time geometry

mod arena;
mod hashtable;
mod node_pool;
mod overflow;
mod pool;
mod vector;

pub use arena::{node_bytes, node_bytes_mut, node_mut, node_ref, ArenaSpan, NodeLayout, NodePtr, WORD_SIZE};
pub use hashtable::{FixedHashtableAllocator, FixedHashtableAllocatorWithOverflow, HashtableAllocatorAdapter};
pub use node_pool::{FixedNodePool, FixedNodePoolWithOverflow, NodePoolAdapter};
pub use overflow::{FallbackAllocator, HeapAllocator, OverflowPool, DEFAULT_ALLOCATOR_NAME};
pub use pool::{FixedPool, FreeListPool, PoolStats, DEFAULT_POOL_NAME, MAX_NODES};
pub use vector::{FixedVectorAllocator, OverflowVectorAllocator, VectorAllocator};

//! # BEDROCK Core
//!
//! Fixed-size memory pools for containers whose storage lives inside the
//! container itself:
//! - O(1) node allocation and deallocation
//! - No heap allocations while the arena has room, beyond the slot table
//!   sized once per init
//! - Optional spill into a general-purpose allocator
//!
//! ## Architecture Rules
//!
//! 1. **The caller owns the arena** - pools only hand out node addresses
//! 2. **Exhaustion is not an error** - `allocate()` returns `None`
//! 3. **Contract violations assert** - in debug builds only
//!
//! ## Example
//!
//! ```rust,ignore
//! use bedrock_core::{ArenaSpan, FixedNodePool};
//!
//! type ListPool = FixedNodePool<32, 64, 8, 0>;
//!
//! let buffer = vec![0u8; ListPool::BUFFER_SIZE];
//! let mut pool = ListPool::new(ArenaSpan::of(&buffer));
//! let node = pool.allocate(32).expect("64 nodes available");
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod memory;

pub use config::{ConfiguredPool, PoolConfig, PoolSetConfig};
pub use error::{PoolError, PoolResult};
pub use memory::{
    node_bytes, node_bytes_mut, node_mut, node_ref, ArenaSpan, FallbackAllocator, FixedHashtableAllocator,
    FixedHashtableAllocatorWithOverflow, FixedNodePool, FixedNodePoolWithOverflow, FixedPool, FixedVectorAllocator,
    FreeListPool, HashtableAllocatorAdapter, HeapAllocator, NodeLayout, NodePoolAdapter, NodePtr, OverflowPool,
    OverflowVectorAllocator, PoolStats, VectorAllocator, DEFAULT_ALLOCATOR_NAME, DEFAULT_POOL_NAME, MAX_NODES,
    WORD_SIZE,
};

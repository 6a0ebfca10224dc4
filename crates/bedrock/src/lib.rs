//! # BEDROCK
//!
//! Building blocks for fixed-memory containers:
//! - [`bedrock_core`]: node pools and allocator adapters over caller-owned
//!   arenas, plus TOML-described runtime pools
//! - [`bedrock_sort`]: bounded worst-case in-place sorting and selection
//!
//! ## Example
//!
//! ```rust,ignore
//! use bedrock::prelude::*;
//!
//! type Pool = FixedNodePool<16, 32, 8, 0>;
//! let buffer = vec![0u8; Pool::BUFFER_SIZE];
//! let mut pool = Pool::new(ArenaSpan::of(&buffer));
//!
//! let mut nodes: Vec<NodePtr> = (0..32).filter_map(|_| pool.allocate(16)).collect();
//! sort_by(&mut nodes, |a, b| a.addr() > b.addr());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub use bedrock_core as pools;
pub use bedrock_sort as sorting;

/// Everything a container implementation usually needs.
pub mod prelude {
    pub use bedrock_core::{
        node_bytes, node_bytes_mut, node_mut, node_ref, ArenaSpan, FallbackAllocator, FixedHashtableAllocator,
        FixedHashtableAllocatorWithOverflow, FixedNodePool, FixedNodePoolWithOverflow, FixedPool,
        FixedVectorAllocator, FreeListPool, HeapAllocator, NodeLayout, NodePtr, OverflowPool,
        OverflowVectorAllocator, PoolConfig, PoolError, PoolResult, PoolSetConfig, VectorAllocator,
    };
    pub use bedrock_sort::{
        is_sorted, is_sorted_by, nth_element, nth_element_by, partial_sort, partial_sort_by, sort, sort_by,
        try_nth_element_by, try_partial_sort_by, try_sort_by, SortError, SortResult,
    };
}

//! Property tests for free-list and overflow pool invariants.
//!
//! - A fresh pool hands out exactly its capacity of distinct, aligned nodes.
//! - No live node is handed out twice.
//! - `peak_size` is the maximum number of nodes live at once.
//! - Overflow nodes never land on the fixed free list.

use std::collections::HashSet;

use bedrock_core::{ArenaSpan, FreeListPool, HeapAllocator, NodeLayout, NodePtr, OverflowPool};
use proptest::prelude::*;

/// One step of a random workload.
#[derive(Clone, Debug)]
enum Op {
    Allocate,
    /// Free the live node at this index (modulo the live count).
    Deallocate(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Allocate),
        2 => any::<usize>().prop_map(Op::Deallocate),
    ]
}

fn geometry() -> impl Strategy<Value = (usize, usize, usize, usize)> {
    // (node_size, alignment exponent, alignment offset, buffer misalignment)
    (1usize..96, 0u32..6, 0usize..8, 0usize..32).prop_map(|(size, exp, offset, skew)| (size, 1 << exp, offset, skew))
}

// ---------------------------------------------------------------------------
// Property: capacity, distinctness and alignment of a fresh pool
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn fresh_pool_yields_capacity_distinct_aligned_nodes(
        (node_size, alignment, offset, skew) in geometry(),
        buffer_len in 0usize..2048,
    ) {
        let buffer = vec![0u8; buffer_len + skew];
        let span = ArenaSpan::of(&buffer[skew..]);
        let layout = NodeLayout::new(node_size, alignment, offset).unwrap();
        let mut pool = FreeListPool::with_arena(span, layout);

        let nodes: Vec<NodePtr> = std::iter::from_fn(|| pool.allocate()).collect();
        prop_assert_eq!(nodes.len(), layout.capacity_in(span));
        prop_assert!(!pool.can_allocate());

        let distinct: HashSet<_> = nodes.iter().collect();
        prop_assert_eq!(distinct.len(), nodes.len());

        for node in &nodes {
            prop_assert!(node.is_aligned(alignment, offset));
            prop_assert!(node.addr() >= span.begin());
            prop_assert!(node.addr() + node_size <= span.end());
        }
    }

    #[test]
    fn buffer_size_always_holds_node_count(
        (node_size, alignment, offset, skew) in geometry(),
        count in 1usize..64,
    ) {
        let layout = NodeLayout::new(node_size, alignment, offset).unwrap();
        let buffer = vec![0u8; layout.buffer_size(count) + skew];
        let span = ArenaSpan::of(&buffer[skew..]);
        prop_assert!(layout.capacity_in(span) >= count);
    }
}

// ---------------------------------------------------------------------------
// Property: live nodes are unique and peak tracks the high-water mark
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn live_nodes_unique_and_peak_is_high_water_mark(
        capacity in 1usize..32,
        ops in proptest::collection::vec(op(), 1..200),
    ) {
        let layout = NodeLayout::new(16, 8, 0).unwrap();
        let buffer = vec![0u8; layout.buffer_size(capacity)];
        let span = ArenaSpan::of(&buffer);
        let mut pool = FreeListPool::with_arena(span, layout);

        let mut live: Vec<NodePtr> = Vec::new();
        let mut high_water = 0;
        let mut last_peak = 0;

        for op in ops {
            match op {
                Op::Allocate => {
                    if let Some(node) = pool.allocate() {
                        prop_assert!(!live.contains(&node));
                        live.push(node);
                    } else {
                        prop_assert_eq!(live.len(), pool.capacity());
                    }
                }
                Op::Deallocate(index) if !live.is_empty() => {
                    let node = live.swap_remove(index % live.len());
                    pool.deallocate(node);
                }
                Op::Deallocate(_) => {}
            }
            high_water = high_water.max(live.len());

            prop_assert!(pool.peak_size() >= last_peak);
            last_peak = pool.peak_size();
            prop_assert_eq!(pool.current_size(), live.len());
            prop_assert_eq!(pool.free_count() + live.len(), pool.capacity());
        }
        prop_assert_eq!(pool.peak_size(), high_water);
    }

    #[test]
    fn overflow_routes_by_address_range(
        capacity in 1usize..16,
        ops in proptest::collection::vec(op(), 1..200),
    ) {
        let layout = NodeLayout::new(24, 8, 0).unwrap();
        let buffer = vec![0u8; layout.buffer_size(capacity)];
        let span = ArenaSpan::of(&buffer);
        let mut pool: OverflowPool<HeapAllocator> = OverflowPool::with_arena(span, layout);

        let mut live: Vec<NodePtr> = Vec::new();
        for op in ops {
            match op {
                Op::Allocate => {
                    let node = pool.allocate();
                    prop_assert!(node.is_some());
                    live.extend(node);
                }
                Op::Deallocate(index) if !live.is_empty() => {
                    let node = live.swap_remove(index % live.len());
                    pool.deallocate(node);
                }
                Op::Deallocate(_) => {}
            }

            let spilled = live.iter().filter(|node| !span.contains(node.addr())).count();
            prop_assert_eq!(pool.overflow_allocator().live_blocks(), spilled);
            prop_assert_eq!(pool.fixed().free_count() + live.len() - spilled, pool.fixed().capacity());
            prop_assert_eq!(pool.current_size(), live.len());
        }
    }
}

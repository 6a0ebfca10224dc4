//! # Pool Configuration
//!
//! Runtime pool descriptions loaded from TOML.
//!
//! Compile-time adapters ([`crate::memory::NodePoolAdapter`] and friends)
//! cover containers whose geometry is known when the code is written. Tools
//! and data-driven subsystems describe their pools in a file instead:
//!
//! ```toml
//! [[pool]]
//! name = "particles"
//! node_size = 48
//! node_count = 1024
//! alignment = 16
//!
//! [[pool]]
//! name = "events"
//! node_size = 32
//! node_count = 256
//! overflow = true
//! ```

use std::path::Path;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::{PoolError, PoolResult};
use crate::memory::{ArenaSpan, FreeListPool, HeapAllocator, NodeLayout, NodePtr, OverflowPool, WORD_SIZE};

const fn default_alignment() -> usize {
    WORD_SIZE
}

/// Returns a `'static` copy of `name`, leaking each distinct name once.
///
/// Allocator names are `'static`; configured names are interned so that
/// rebuilding a pool does not leak again.
fn intern(name: &str) -> &'static str {
    static NAMES: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

    let mut names = NAMES.lock();
    if let Some(&interned) = names.iter().find(|&&known| known == name) {
        return interned;
    }
    let interned: &'static str = Box::leak(name.to_owned().into_boxed_str());
    names.push(interned);
    interned
}

/// Description of one pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoolConfig {
    /// Diagnostic name.
    pub name: String,
    /// Bytes per node.
    pub node_size: usize,
    /// Nodes in the fixed arena.
    pub node_count: usize,
    /// Node alignment (power of two). Defaults to the machine word.
    #[serde(default = "default_alignment")]
    pub alignment: usize,
    /// Offset within each node that lands on the alignment.
    #[serde(default)]
    pub alignment_offset: usize,
    /// Spill into the heap once the arena is exhausted.
    #[serde(default)]
    pub overflow: bool,
}

impl PoolConfig {
    /// Parses a single pool from a TOML table.
    ///
    /// # Errors
    ///
    /// [`PoolError::InvalidConfig`] if the TOML is malformed or describes an
    /// invalid pool.
    pub fn from_toml_str(source: &str) -> PoolResult<Self> {
        let config: Self = toml::from_str(source).map_err(|e| PoolError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the description without building anything.
    ///
    /// # Errors
    ///
    /// * [`PoolError::ZeroNodeSize`] / [`PoolError::InvalidAlignment`] for a
    ///   bad geometry
    /// * [`PoolError::InvalidConfig`] for an empty name or zero node count
    pub fn validate(&self) -> PoolResult<()> {
        if self.name.is_empty() {
            return Err(PoolError::InvalidConfig("pool name must not be empty".into()));
        }
        if self.node_count == 0 {
            return Err(PoolError::InvalidConfig(format!("pool '{}' has zero nodes", self.name)));
        }
        self.layout().map(|_| ())
    }

    /// Node geometry.
    ///
    /// # Errors
    ///
    /// See [`NodeLayout::new`].
    pub fn layout(&self) -> PoolResult<NodeLayout> {
        NodeLayout::new(self.node_size, self.alignment, self.alignment_offset)
    }

    /// Bytes a caller must reserve so the arena holds `node_count` nodes at
    /// any buffer alignment.
    ///
    /// # Errors
    ///
    /// See [`NodeLayout::new`].
    pub fn buffer_size(&self) -> PoolResult<usize> {
        Ok(self.layout()?.buffer_size(self.node_count))
    }

    /// Builds the pool over a caller arena.
    ///
    /// Only the bytes needed for `node_count` nodes are used; the rest of
    /// `arena` is left alone.
    ///
    /// # Errors
    ///
    /// * Any [`PoolConfig::validate`] error
    /// * [`PoolError::ArenaTooSmall`] if `arena` cannot hold `node_count`
    ///   aligned nodes
    pub fn build(&self, arena: ArenaSpan) -> PoolResult<ConfiguredPool> {
        self.validate()?;
        let layout = self.layout()?;

        let required = layout.arena_len_for(arena.begin(), self.node_count);
        if arena.len() < required {
            return Err(PoolError::ArenaTooSmall {
                required,
                available: arena.len(),
            });
        }
        let arena = arena.prefix(required);

        let kind = if self.overflow {
            let mut pool = OverflowPool::with_arena(arena, layout);
            pool.set_name(intern(&self.name));
            PoolKind::Overflow(pool)
        } else {
            PoolKind::Fixed(FreeListPool::with_arena(arena, layout))
        };

        tracing::debug!(
            pool = %self.name,
            node_size = self.node_size,
            node_count = self.node_count,
            overflow = self.overflow,
            "configured pool built"
        );

        Ok(ConfiguredPool {
            name: self.name.clone(),
            kind,
        })
    }
}

/// A set of pools, usually one file per subsystem.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoolSetConfig {
    /// Pools in declaration order.
    #[serde(rename = "pool", default)]
    pub pools: Vec<PoolConfig>,
}

impl PoolSetConfig {
    /// Parses and validates a pool set.
    ///
    /// # Errors
    ///
    /// [`PoolError::InvalidConfig`] for malformed TOML, an invalid pool or a
    /// duplicated pool name.
    pub fn from_toml_str(source: &str) -> PoolResult<Self> {
        let config: Self = toml::from_str(source).map_err(|e| PoolError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a pool set file.
    ///
    /// # Errors
    ///
    /// [`PoolError::ConfigIo`] if the file cannot be read, otherwise as
    /// [`PoolSetConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> PoolResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| PoolError::ConfigIo {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&source)
    }

    /// Serializes the set back to TOML.
    ///
    /// # Errors
    ///
    /// [`PoolError::InvalidConfig`] if serialization fails.
    pub fn to_toml_string(&self) -> PoolResult<String> {
        toml::to_string(self).map_err(|e| PoolError::InvalidConfig(e.to_string()))
    }

    /// Validates every pool and rejects duplicated names.
    ///
    /// # Errors
    ///
    /// The first problem found.
    pub fn validate(&self) -> PoolResult<()> {
        for (index, pool) in self.pools.iter().enumerate() {
            pool.validate()?;
            if self.pools[..index].iter().any(|earlier| earlier.name == pool.name) {
                return Err(PoolError::InvalidConfig(format!("duplicate pool name '{}'", pool.name)));
            }
        }
        Ok(())
    }

    /// Looks a pool up by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&PoolConfig> {
        self.pools.iter().find(|pool| pool.name == name)
    }

    /// Sum of every pool's buffer size.
    ///
    /// # Errors
    ///
    /// The first invalid layout.
    pub fn total_buffer_size(&self) -> PoolResult<usize> {
        self.pools.iter().map(PoolConfig::buffer_size).sum()
    }
}

/// The pool a [`PoolConfig`] selected.
#[derive(Debug)]
enum PoolKind {
    /// Hard capacity.
    Fixed(FreeListPool),
    /// Spills into the heap.
    Overflow(OverflowPool<HeapAllocator>),
}

/// A pool built from configuration.
///
/// The kind is chosen at runtime, so every call dispatches on it. Use the
/// compile-time adapters on hot paths.
#[derive(Debug)]
pub struct ConfiguredPool {
    /// Name from the configuration.
    name: String,
    /// The pool itself.
    kind: PoolKind,
}

impl ConfiguredPool {
    /// Allocates one node.
    #[inline]
    pub fn allocate(&mut self) -> Option<NodePtr> {
        match &mut self.kind {
            PoolKind::Fixed(pool) => pool.allocate(),
            PoolKind::Overflow(pool) => pool.allocate(),
        }
    }

    /// Returns a node to the pool.
    #[inline]
    pub fn deallocate(&mut self, node: NodePtr) {
        match &mut self.kind {
            PoolKind::Fixed(pool) => pool.deallocate(node),
            PoolKind::Overflow(pool) => pool.deallocate(node),
        }
    }

    /// Returns `true` if the fixed arena still has a free node.
    #[inline]
    #[must_use]
    pub const fn can_allocate(&self) -> bool {
        match &self.kind {
            PoolKind::Fixed(pool) => pool.can_allocate(),
            PoolKind::Overflow(pool) => pool.can_allocate(),
        }
    }

    /// Nodes currently allocated.
    #[inline]
    #[must_use]
    pub const fn current_size(&self) -> usize {
        match &self.kind {
            PoolKind::Fixed(pool) => pool.current_size(),
            PoolKind::Overflow(pool) => pool.current_size(),
        }
    }

    /// Most nodes allocated at once.
    #[inline]
    #[must_use]
    pub const fn peak_size(&self) -> usize {
        match &self.kind {
            PoolKind::Fixed(pool) => pool.peak_size(),
            PoolKind::Overflow(pool) => pool.peak_size(),
        }
    }

    /// Name from the configuration.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name the underlying allocator reports in diagnostics.
    ///
    /// Overflow pools carry the configured name; fixed pools have no
    /// allocator to label and report the default pool name.
    #[inline]
    #[must_use]
    pub fn allocator_name(&self) -> &'static str {
        match &self.kind {
            PoolKind::Fixed(pool) => pool.name(),
            PoolKind::Overflow(pool) => pool.name(),
        }
    }

    /// Returns `true` for an overflow pool.
    #[inline]
    #[must_use]
    pub const fn is_overflow(&self) -> bool {
        matches!(self.kind, PoolKind::Overflow(_))
    }
}

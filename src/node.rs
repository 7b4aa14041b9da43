//! Trie nodes, their sorted edge arrays, and the arena that owns them.
//!
//! Every node is addressed by a [`NodeId`] handle into a [`NodeArena`].
//! Growing a node's edge array reallocates only that array, never the node,
//! so handles held by parents stay valid across growth.

use std::mem;

use log::trace;

use crate::config::Config;
use crate::error::{Error, Result};

/// Number of distinct byte values, and so the most edges one node can hold.
pub(crate) const MAX_EDGES: usize = 256;

// =============================================================================
// Handles and edges
// =============================================================================

/// Index of a node slot inside a [`NodeArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(u32);

impl NodeId {
    /// The root always occupies the first slot.
    pub(crate) const ROOT: NodeId = NodeId(0);

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A `(byte, child)` pair in a node's edge array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Edge {
    pub(crate) byte: u8,
    pub(crate) child: NodeId,
}

// =============================================================================
// Node
// =============================================================================

/// A trie node: optional payload plus edges sorted ascending by byte.
#[derive(Debug)]
pub(crate) struct Node<V> {
    pub(crate) data: Option<V>,
    edges: Vec<Edge>,
}

// Edge capacity is part of the node's state: the root never grows and
// `size()` counts the slack, so a clone keeps it.
impl<V: Clone> Clone for Node<V> {
    fn clone(&self) -> Self {
        let mut edges = Vec::with_capacity(self.edges.capacity());
        edges.extend_from_slice(&self.edges);
        Self {
            data: self.data.clone(),
            edges,
        }
    }
}

impl<V> Node<V> {
    fn with_capacity(capacity: usize) -> Result<Self> {
        let mut edges = Vec::new();
        edges.try_reserve_exact(capacity)?;
        Ok(Self { data: None, edges })
    }

    #[cfg(test)]
    pub(crate) fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[inline]
    pub(crate) fn edge_at(&self, index: usize) -> Option<Edge> {
        self.edges.get(index).copied()
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.edges.capacity()
    }

    /// Binary search for `byte`: `Ok(index)` of the edge, or `Err(index)` where
    /// it would be inserted to keep the array sorted.
    #[inline]
    pub(crate) fn search(&self, byte: u8) -> std::result::Result<usize, usize> {
        self.edges.binary_search_by_key(&byte, |edge| edge.byte)
    }

    #[inline]
    pub(crate) fn child(&self, byte: u8) -> Option<NodeId> {
        self.search(byte).ok().map(|index| self.edges[index].child)
    }

    /// Childless and dataless.
    #[inline]
    pub(crate) fn is_dead(&self) -> bool {
        self.data.is_none() && self.edges.is_empty()
    }

    /// Bytes attributable to this node: the fixed header plus the whole
    /// edge allocation, slack included.
    #[inline]
    pub(crate) fn footprint(&self) -> usize {
        mem::size_of::<Self>() + self.capacity() * mem::size_of::<Edge>()
    }

    /// Double the edge capacity, capped at [`MAX_EDGES`].
    pub(crate) fn grow(&mut self, initial_capacity: usize) -> Result<()> {
        let old = self.edges.capacity();
        let new = if old == 0 {
            initial_capacity
        } else {
            (old * 2).min(MAX_EDGES)
        };
        if new <= old {
            return Ok(());
        }
        self.edges.try_reserve_exact(new - self.edges.len())?;
        trace!("edge array grown {} -> {}", old, self.edges.capacity());
        Ok(())
    }

    /// Make room for one more edge without letting `Vec` pick the new size.
    #[inline]
    fn reserve_edge(&mut self, initial_capacity: usize) -> Result<()> {
        if self.edges.len() == self.edges.capacity() {
            self.grow(initial_capacity)?;
        }
        Ok(())
    }

    /// Link `child` under `byte`, keeping the array sorted.
    ///
    /// Must follow a successful `reserve_edge`; the byte must be absent.
    fn insert_edge(&mut self, byte: u8, child: NodeId) {
        match self.search(byte) {
            Ok(index) => {
                debug_assert!(false, "duplicate edge byte {byte:#04x}");
                self.edges[index].child = child;
            }
            Err(index) => {
                debug_assert!(self.edges.len() < self.edges.capacity());
                self.edges.insert(index, Edge { byte, child });
            }
        }
    }

    /// Unlink the edge at `index`, compacting the array.
    #[inline]
    pub(crate) fn remove_edge(&mut self, index: usize) -> Edge {
        self.edges.remove(index)
    }
}

// =============================================================================
// Path resolution
// =============================================================================

/// Outcome of following a key from some starting node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Resolved {
    /// Furthest node reached.
    pub(crate) node: NodeId,
    /// Key bytes consumed on the way there.
    pub(crate) depth: usize,
}

impl Resolved {
    /// The whole key was consumed, so `node` is the node for that key.
    #[inline]
    pub(crate) fn is_exact(&self, key: &[u8]) -> bool {
        self.depth == key.len()
    }
}

// =============================================================================
// Node arena
// =============================================================================

/// Owner of every node of one trie, with a free list of reclaimed slots.
///
/// Slot 0 is the root. Freed slots keep no edge allocation and no payload
/// until reused.
#[derive(Clone, Debug)]
pub(crate) struct NodeArena<V> {
    slots: Vec<Node<V>>,
    free: Vec<NodeId>,
    initial_capacity: usize,
    node_limit: Option<usize>,
}

impl<V> NodeArena<V> {
    /// Build an arena holding only the root.
    pub(crate) fn new(config: &Config) -> Self {
        Self::with_root(
            Node {
                data: None,
                edges: Vec::with_capacity(config.root_capacity),
            },
            Vec::with_capacity(1),
            config,
        )
    }

    /// Fallible form of [`new`](NodeArena::new).
    pub(crate) fn try_new(config: &Config) -> Result<Self> {
        let root = Node::with_capacity(config.root_capacity)?;
        let mut slots = Vec::new();
        slots.try_reserve(1)?;
        Ok(Self::with_root(root, slots, config))
    }

    fn with_root(root: Node<V>, mut slots: Vec<Node<V>>, config: &Config) -> Self {
        slots.push(root);
        Self {
            slots,
            free: Vec::new(),
            initial_capacity: config.initial_capacity,
            node_limit: config.node_limit,
        }
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node<V> {
        &self.slots[id.index()]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<V> {
        &mut self.slots[id.index()]
    }

    /// Live nodes, root included.
    #[inline]
    pub(crate) fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Bytes held by the arena itself, including freed slots and slack.
    pub(crate) fn capacity_bytes(&self) -> usize {
        self.slots.capacity() * mem::size_of::<Node<V>>()
            + self.free.capacity() * mem::size_of::<NodeId>()
            + self
                .slots
                .iter()
                .map(|node| node.capacity() * mem::size_of::<Edge>())
                .sum::<usize>()
    }

    /// Follow successive bytes of `key` from `start` until a byte has no edge
    /// or the key runs out.
    pub(crate) fn resolve(&self, start: NodeId, key: &[u8]) -> Resolved {
        let mut node = start;
        let mut depth = 0;
        for &byte in key {
            match self.node(node).child(byte) {
                Some(child) => {
                    node = child;
                    depth += 1;
                }
                None => break,
            }
        }
        Resolved { node, depth }
    }

    /// Create an empty node and link it under `parent` at `byte`.
    ///
    /// The parent's edge array is grown before the child slot is taken, so
    /// on failure nothing new is linked and no slot is lost.
    pub(crate) fn add_child(&mut self, parent: NodeId, byte: u8) -> Result<NodeId> {
        let initial_capacity = self.initial_capacity;
        self.node_mut(parent).reserve_edge(initial_capacity)?;
        let child = self.alloc()?;
        self.node_mut(parent).insert_edge(byte, child);
        Ok(child)
    }

    fn alloc(&mut self) -> Result<NodeId> {
        if let Some(limit) = self.node_limit {
            if self.live() >= limit {
                return Err(Error::NodeLimit { limit });
            }
        }

        let node = Node::with_capacity(self.initial_capacity)?;
        if let Some(id) = self.free.pop() {
            self.slots[id.index()] = node;
            return Ok(id);
        }

        let id = u32::try_from(self.slots.len()).map_err(|_| Error::NodeLimit {
            limit: u32::MAX as usize,
        })?;
        self.slots.try_reserve(1)?;
        self.slots.push(node);
        Ok(NodeId(id))
    }

    /// Unlink and free every dead immediate child of `parent`.
    ///
    /// Returns how many children were reclaimed.
    pub(crate) fn reap_dead_children(&mut self, parent: NodeId) -> Result<usize> {
        let mut reaped = 0;
        let mut index = 0;
        while let Some(edge) = self.node(parent).edge_at(index) {
            if !self.node(edge.child).is_dead() {
                index += 1;
                continue;
            }
            self.free.try_reserve(1)?;
            self.node_mut(parent).remove_edge(index);
            self.release(edge.child);
            reaped += 1;
        }
        Ok(reaped)
    }

    /// Return a dead, unlinked node's slot to the free list.
    ///
    /// The free list must already have room.
    fn release(&mut self, id: NodeId) {
        debug_assert_ne!(id, NodeId::ROOT);
        let slot = &mut self.slots[id.index()];
        debug_assert!(slot.is_dead());
        slot.data = None;
        slot.edges = Vec::new();
        self.free.push(id);
    }

    /// Drop every node except the root, and empty the root.
    pub(crate) fn clear(&mut self) {
        self.slots.truncate(1);
        self.free.clear();
        let root = &mut self.slots[NodeId::ROOT.index()];
        root.data = None;
        root.edges.clear();
    }
}

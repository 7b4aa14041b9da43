//! # bytetrie
//!
//! A byte-keyed ordered map stored as a trie whose nodes keep a sorted,
//! geometrically growing array of `(byte, child)` edges.
//!
//! Lookups binary-search each node's edges. Enumeration is lexicographic by
//! raw byte value and never recurses, so keys of any length are safe to
//! walk. Removing a key only clears its data; [`Trie::prune`] reclaims the
//! nodes left behind. [`InternPool`] builds string canonicalization on top.
//!
//! ## Example
//!
//! ```rust
//! use std::ops::ControlFlow;
//! use bytetrie::Trie;
//!
//! let mut trie: Trie<u64> = Trie::new();
//! trie.insert(b"cat", 1).unwrap();
//! trie.insert(b"car", 2).unwrap();
//! trie.insert(b"dog", 3).unwrap();
//!
//! assert_eq!(trie.get(b"car"), Some(&2));
//! assert_eq!(trie.get(b"ca"), None);
//! assert_eq!(trie.count(b"ca").unwrap(), 2);
//!
//! let mut keys = Vec::new();
//! trie.visit(b"", |key, _| {
//!     keys.push(key.to_vec());
//!     ControlFlow::Continue(())
//! })
//! .unwrap();
//! assert_eq!(keys, vec![b"car".to_vec(), b"cat".to_vec(), b"dog".to_vec()]);
//! ```

#![deny(unsafe_op_in_unsafe_fn)]

mod config;
mod cursor;
mod error;
mod intern;
mod node;
mod reclaim;
mod walk;

use std::fmt;
use std::ops::ControlFlow;

pub use config::Config;
pub use cursor::{Cursor, Iter};
pub use error::{Error, Result};
pub use intern::InternPool;

use node::{NodeArena, NodeId};
use walk::Walk;

/// How a [`Trie::visit`] call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Every matching key was reported.
    Completed,
    /// The visitor returned `ControlFlow::Break`.
    Stopped,
}

/// A byte-keyed ordered map on a sorted-edge trie.
///
/// Every fallible method fails only when memory (or the configured node
/// budget) runs out. Such a failure is not rolled back: nodes created before
/// it stay linked with no data, and the trie stays fully usable.
#[derive(Clone)]
pub struct Trie<V> {
    arena: NodeArena<V>,
    root: NodeId,
    len: usize,
    config: Config,
}

impl<V> Trie<V> {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Build a trie with the given settings.
    pub fn with_config(config: Config) -> Self {
        let config = config.normalized();
        Self {
            arena: NodeArena::new(&config),
            root: NodeId::ROOT,
            len: 0,
            config,
        }
    }

    /// Like [`with_config`](Trie::with_config), but reports a failure to
    /// allocate the root instead of aborting.
    pub fn try_with_config(config: Config) -> Result<Self> {
        let config = config.normalized();
        Ok(Self {
            arena: NodeArena::try_new(&config)?,
            root: NodeId::ROOT,
            len: 0,
            config,
        })
    }

    /// Effective settings, after clamping.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of keys currently holding data.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Live nodes, root and tombstoned nodes included.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.arena.live()
    }

    /// Drop every key and node; only the empty root remains.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.len = 0;
    }
}

impl<V> Trie<V> {
    pub fn get(&self, key: &[u8]) -> Option<&V> {
        let resolved = self.arena.resolve(self.root, key);
        if !resolved.is_exact(key) {
            return None;
        }
        self.arena.node(resolved.node).data.as_ref()
    }

    pub fn get_mut(&mut self, key: &[u8]) -> Option<&mut V> {
        let resolved = self.arena.resolve(self.root, key);
        if !resolved.is_exact(key) {
            return None;
        }
        self.arena.node_mut(resolved.node).data.as_mut()
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// Store `value` under `key`, returning the value it replaces.
    pub fn insert(&mut self, key: &[u8], value: V) -> Result<Option<V>> {
        let mut previous = None;
        self.replace(key, |_, old| {
            previous = old;
            Some(value)
        })?;
        Ok(previous)
    }

    /// Set the data for `key` to `combine(key, current)`.
    ///
    /// Missing nodes along the key are created first, then `combine` receives
    /// the current data (or `None`) by value and its result is stored. This is
    /// the only place data is written: ignoring `current` gives an overwrite,
    /// consulting it gives insert-if-absent or merge semantics, and returning
    /// `None` leaves a tombstone that [`prune`](Trie::prune) can reclaim.
    ///
    /// Returns a reference to the stored data. If node creation fails,
    /// `combine` is not called and nodes created so far stay in place.
    pub fn replace<F>(&mut self, key: &[u8], combine: F) -> Result<Option<&V>>
    where
        F: FnOnce(&[u8], Option<V>) -> Option<V>,
    {
        let node = self.path_to(key)?;
        let slot = &mut self.arena.node_mut(node).data;
        let current = slot.take();
        let had_data = current.is_some();
        *slot = combine(key, current);
        match (had_data, slot.is_some()) {
            (false, true) => self.len += 1,
            (true, false) => self.len -= 1,
            _ => {}
        }
        Ok(slot.as_ref())
    }

    /// The data under `key`, storing `make(key)` first if there is none.
    ///
    /// Same path creation and failure behavior as [`replace`](Trie::replace)
    /// with a combine that keeps existing data.
    pub fn get_or_insert_with<F>(&mut self, key: &[u8], make: F) -> Result<&mut V>
    where
        F: FnOnce(&[u8]) -> V,
    {
        let node = self.path_to(key)?;
        let slot = &mut self.arena.node_mut(node).data;
        if slot.is_none() {
            self.len += 1;
        }
        Ok(slot.get_or_insert_with(|| make(key)))
    }

    /// Node for `key`, creating missing nodes along the way.
    fn path_to(&mut self, key: &[u8]) -> Result<NodeId> {
        let resolved = self.arena.resolve(self.root, key);
        let mut node = resolved.node;
        for &byte in &key[resolved.depth..] {
            node = self.arena.add_child(node, byte)?;
        }
        Ok(node)
    }

    /// Take the data out of `key`, leaving its node in place as a tombstone.
    pub fn remove(&mut self, key: &[u8]) -> Option<V> {
        let resolved = self.arena.resolve(self.root, key);
        if !resolved.is_exact(key) {
            return None;
        }
        let old = self.arena.node_mut(resolved.node).data.take();
        if old.is_some() {
            self.len -= 1;
        }
        old
    }
}

impl<V> Trie<V> {
    /// Call `visitor` for every key starting with `prefix`, in ascending byte
    /// order. An empty prefix visits the whole trie.
    ///
    /// Returning `ControlFlow::Break` from the visitor stops the walk early
    /// with `Ok(Visit::Stopped)`. A prefix that matches nothing is not an
    /// error. Fails only if the traversal buffers cannot grow.
    pub fn visit<F>(&self, prefix: &[u8], mut visitor: F) -> Result<Visit>
    where
        F: FnMut(&[u8], &V) -> ControlFlow<()>,
    {
        let mut walk = Walk::new(&self.arena, self.root, prefix)?;
        while let Some(data) = walk.next_entry(&self.arena)? {
            if visitor(walk.key(), data).is_break() {
                return Ok(Visit::Stopped);
            }
        }
        Ok(Visit::Completed)
    }

    /// Number of keys starting with `prefix`.
    pub fn count(&self, prefix: &[u8]) -> Result<usize> {
        let mut count = 0;
        self.visit(prefix, |_, _| {
            count += 1;
            ControlFlow::Continue(())
        })?;
        Ok(count)
    }

    /// A cursor positioned on the first key starting with `prefix`.
    pub fn cursor(&self, prefix: &[u8]) -> Cursor<'_, V> {
        Cursor::new(self, prefix)
    }

    pub fn iter(&self) -> Iter<'_, V> {
        self.prefix_iter(b"")
    }

    pub fn prefix_iter(&self, prefix: &[u8]) -> Iter<'_, V> {
        Iter::new(self.cursor(prefix))
    }
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for Trie<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for entry in self.iter() {
            let (key, value) = entry.map_err(|_| fmt::Error)?;
            map.entry(&String::from_utf8_lossy(&key), value);
        }
        map.finish()
    }
}


#[cfg(test)]
mod proptests;

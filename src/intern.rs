//! String interning on top of [`Trie`].
//!
//! Each distinct byte string is stored once; every request for an equal
//! string gets a clone of the same `Arc`, so interned values can be compared
//! with [`Arc::ptr_eq`] instead of by content.

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::Trie;

/// A pool of canonical byte strings.
#[derive(Debug, Default)]
pub struct InternPool {
    trie: Trie<Arc<[u8]>>,
}

impl InternPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            trie: Trie::with_config(config),
        }
    }

    /// The canonical allocation for `string`, created on first request.
    ///
    /// Fails only if the pool cannot grow.
    pub fn intern(&mut self, string: &[u8]) -> Result<Arc<[u8]>> {
        let canonical = self.trie.get_or_insert_with(string, |key| Arc::from(key))?;
        Ok(Arc::clone(canonical))
    }

    /// The canonical allocation for `string`, if it was ever interned.
    pub fn intern_soft(&self, string: &[u8]) -> Option<Arc<[u8]>> {
        self.trie.get(string).cloned()
    }

    pub fn contains(&self, string: &[u8]) -> bool {
        self.trie.contains_key(string)
    }

    /// Number of distinct strings in the pool.
    pub fn count(&self) -> usize {
        self.trie.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    /// Read access to the backing trie, for size statistics and enumeration.
    pub fn trie(&self) -> &Trie<Arc<[u8]>> {
        &self.trie
    }
}

//! Trie construction settings.

use log::warn;

use crate::node::MAX_EDGES;

/// Configuration for a [`Trie`](crate::Trie).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Edge capacity reserved for the root node.
    ///
    /// The default reserves all 256 slots so the root never grows.
    pub root_capacity: usize,
    /// Edge capacity of a freshly created node. Doubles on demand.
    pub initial_capacity: usize,
    /// Maximum number of live nodes, root included. `None` means unbounded.
    pub node_limit: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_capacity: MAX_EDGES,
            initial_capacity: 1,
            node_limit: None,
        }
    }
}

impl Config {
    /// Clamp capacities into `1..=256` and make sure the root fits the limit.
    pub(crate) fn normalized(mut self) -> Self {
        let root = self.root_capacity.clamp(1, MAX_EDGES);
        if root != self.root_capacity {
            warn!(
                "root_capacity {} out of range, using {}",
                self.root_capacity, root
            );
            self.root_capacity = root;
        }

        let initial = self.initial_capacity.clamp(1, MAX_EDGES);
        if initial != self.initial_capacity {
            warn!(
                "initial_capacity {} out of range, using {}",
                self.initial_capacity, initial
            );
            self.initial_capacity = initial;
        }

        if self.node_limit == Some(0) {
            warn!("node_limit 0 cannot hold the root, using 1");
            self.node_limit = Some(1);
        }
        self
    }
}

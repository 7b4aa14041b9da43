//! Memory accounting and reclamation of dead nodes.

use log::debug;

use crate::error::Result;
use crate::walk::{Frame, FrameStack};
use crate::Trie;

impl<V> Trie<V> {
    /// Total bytes held by reachable nodes: each node's fixed header plus its
    /// whole edge allocation, unused slack included.
    ///
    /// Runs a postorder walk over every node, so it costs O(nodes).
    pub fn size(&self) -> Result<usize> {
        let mut stack = FrameStack::new();
        stack.push(Frame::enter(self.root))?;

        let mut total = 0;
        while let Some(frame) = stack.top_mut() {
            let node = self.arena.node(frame.node);
            match node.edge_at(frame.next_child) {
                Some(edge) => {
                    frame.next_child += 1;
                    stack.push(Frame::enter(edge.child))?;
                }
                None => {
                    total += node.footprint();
                    stack.pop();
                }
            }
        }
        Ok(total)
    }

    /// Bytes held by the node arena, including freed slots awaiting reuse.
    ///
    /// Unlike [`size`](Trie::size) this does not walk the trie.
    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>() + self.arena.capacity_bytes()
    }

    /// Free every node that has neither data nor children.
    ///
    /// Children are reclaimed bottom-up, after all of their own descendants
    /// have been considered, so a chain of tombstoned nodes collapses in a
    /// single pass. Nodes holding data, and every ancestor of such a node,
    /// are kept. The root is never freed.
    ///
    /// Returns the number of nodes reclaimed. On failure the nodes already
    /// reclaimed stay reclaimed and the trie remains valid.
    pub fn prune(&mut self) -> Result<usize> {
        let mut stack = FrameStack::new();
        stack.push(Frame::enter(self.root))?;

        let mut reclaimed = 0;
        while let Some(frame) = stack.top_mut() {
            let id = frame.node;
            if let Some(edge) = self.arena.node(id).edge_at(frame.next_child) {
                frame.next_child += 1;
                stack.push(Frame::enter(edge.child))?;
                continue;
            }
            stack.pop();
            reclaimed += self.arena.reap_dead_children(id)?;
        }

        debug!(
            "prune reclaimed {} nodes, {} live",
            reclaimed,
            self.arena.live()
        );
        Ok(reclaimed)
    }
}

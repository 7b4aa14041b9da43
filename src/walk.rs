//! Non-recursive depth-first traversal shared by `visit`, the cursor, `size`
//! and `prune`.
//!
//! Keys can be arbitrarily long, so nothing here recurses: the path from the
//! walk's starting node to the current node lives in a [`FrameStack`], and
//! the bytes spelling that path live in a [`KeyBuffer`].

use smallvec::SmallVec;

use crate::error::Result;
use crate::node::{NodeArena, NodeId};

/// Bytes kept inline before the key buffer spills to the heap.
const INLINE_KEY_BYTES: usize = 64;

// =============================================================================
// Explicit stack
// =============================================================================

/// One level of an in-progress walk.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Frame {
    pub(crate) node: NodeId,
    /// Index of the next edge to descend into.
    pub(crate) next_child: usize,
    /// Whether the node's own data has already been considered.
    entered: bool,
}

impl Frame {
    #[inline]
    pub(crate) fn enter(node: NodeId) -> Self {
        Self {
            node,
            next_child: 0,
            entered: false,
        }
    }
}

/// Growable stack of frames; every push may fail instead of aborting.
#[derive(Debug, Default)]
pub(crate) struct FrameStack {
    frames: Vec<Frame>,
}

impl FrameStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn push(&mut self, frame: Frame) -> Result<()> {
        self.frames.try_reserve(1)?;
        self.frames.push(frame);
        Ok(())
    }

    #[inline]
    pub(crate) fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    #[inline]
    pub(crate) fn top_mut(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.frames.clear();
    }
}

// =============================================================================
// Key buffer
// =============================================================================

/// The key spelled by the current stack, rebuilt byte by byte as frames are
/// pushed and popped.
#[derive(Debug, Default)]
pub(crate) struct KeyBuffer {
    bytes: SmallVec<[u8; INLINE_KEY_BYTES]>,
}

impl KeyBuffer {
    pub(crate) fn with_prefix(prefix: &[u8]) -> Result<Self> {
        let mut bytes = SmallVec::new();
        bytes.try_reserve(prefix.len())?;
        bytes.extend_from_slice(prefix);
        Ok(Self { bytes })
    }

    #[inline]
    pub(crate) fn push(&mut self, byte: u8) -> Result<()> {
        self.bytes.try_reserve(1)?;
        self.bytes.push(byte);
        Ok(())
    }

    #[inline]
    pub(crate) fn pop(&mut self) {
        self.bytes.pop();
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

// =============================================================================
// Walk
// =============================================================================

/// A lexicographic walk over every data-carrying node under a prefix.
///
/// `next_entry` suspends at each node that holds data and resumes exactly
/// where it stopped on the following call. The visitor drives it to
/// completion; the cursor drives it one entry at a time.
#[derive(Debug, Default)]
pub(crate) struct Walk {
    stack: FrameStack,
    key: KeyBuffer,
}

impl Walk {
    /// Position a walk at the node for `prefix`. If the prefix does not
    /// resolve completely, the walk starts out exhausted.
    pub(crate) fn new<V>(arena: &NodeArena<V>, root: NodeId, prefix: &[u8]) -> Result<Self> {
        let resolved = arena.resolve(root, prefix);
        if !resolved.is_exact(prefix) {
            return Ok(Self::default());
        }

        let mut walk = Self {
            stack: FrameStack::new(),
            key: KeyBuffer::with_prefix(prefix)?,
        };
        walk.stack.push(Frame::enter(resolved.node))?;
        Ok(walk)
    }

    /// Key of the entry most recently returned by `next_entry`.
    #[inline]
    pub(crate) fn key(&self) -> &[u8] {
        self.key.as_slice()
    }

    /// Abandon the walk; subsequent calls to `next_entry` return `None`.
    pub(crate) fn stop(&mut self) {
        self.stack.clear();
    }

    /// Advance to the next node carrying data and return that data.
    ///
    /// A node's own data is reported before any of its children, and children
    /// are entered in ascending byte order, so entries come out in strictly
    /// increasing byte-lexicographic key order.
    pub(crate) fn next_entry<'a, V>(&mut self, arena: &'a NodeArena<V>) -> Result<Option<&'a V>> {
        loop {
            let Some(frame) = self.stack.top_mut() else {
                return Ok(None);
            };
            let node = arena.node(frame.node);

            if !frame.entered {
                frame.entered = true;
                if let Some(data) = node.data.as_ref() {
                    return Ok(Some(data));
                }
            }

            match node.edge_at(frame.next_child) {
                Some(edge) => {
                    frame.next_child += 1;
                    self.key.push(edge.byte)?;
                    self.stack.push(Frame::enter(edge.child))?;
                }
                None => {
                    self.stack.pop();
                    // The bottom frame owns the prefix, every other frame one byte.
                    if !self.stack.is_empty() {
                        self.key.pop();
                    }
                }
            }
        }
    }
}

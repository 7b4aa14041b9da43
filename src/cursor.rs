//! Resumable, pull-based iteration over a prefix.

use log::warn;

use crate::error::{Error, Result};
use crate::walk::Walk;
use crate::Trie;

/// A cursor over every key under a prefix, in ascending byte order.
///
/// A new cursor is already positioned on the first matching key, or is done
/// if there is none. After each [`advance`](Cursor::advance) check
/// [`is_done`](Cursor::is_done) and then [`error`](Cursor::error): an
/// allocation failure while advancing ends the walk and is kept here rather
/// than returned.
///
/// The cursor borrows its trie, so the trie cannot be mutated while the
/// cursor is alive. Code that sidesteps this (for example by rebuilding the
/// cursor from raw parts after a mutation) would be walking a structure
/// whose edge arrays may have been reallocated or freed.
pub struct Cursor<'a, V> {
    trie: &'a Trie<V>,
    walk: Walk,
    current: Option<&'a V>,
    error: Option<Error>,
}

impl<'a, V> Cursor<'a, V> {
    pub(crate) fn new(trie: &'a Trie<V>, prefix: &[u8]) -> Self {
        let mut cursor = Self {
            trie,
            walk: Walk::default(),
            current: None,
            error: None,
        };
        match Walk::new(&trie.arena, trie.root, prefix) {
            Ok(walk) => {
                cursor.walk = walk;
                cursor.advance();
            }
            Err(err) => cursor.fail(err),
        }
        cursor
    }

    /// Move to the next key. Does nothing once the cursor is done.
    pub fn advance(&mut self) {
        if self.error.is_some() {
            return;
        }
        match self.walk.next_entry(&self.trie.arena) {
            Ok(entry) => self.current = entry,
            Err(err) => self.fail(err),
        }
    }

    fn fail(&mut self, err: Error) {
        warn!("cursor stopped: {}", err);
        self.walk.stop();
        self.current = None;
        self.error = Some(err);
    }

    /// No current key: the walk is exhausted or failed.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.current.is_none()
    }

    /// The failure that ended the walk, if any.
    #[inline]
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Current key. The buffer behind it is reused by the next `advance`.
    #[inline]
    pub fn key(&self) -> Option<&[u8]> {
        self.current.map(|_| self.walk.key())
    }

    /// Data stored under the current key.
    #[inline]
    pub fn data(&self) -> Option<&'a V> {
        self.current
    }

    pub(crate) fn take_error(&mut self) -> Option<Error> {
        self.error.take()
    }
}

impl<V> std::fmt::Debug for Cursor<'_, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("key", &self.key().map(String::from_utf8_lossy))
            .field("done", &self.is_done())
            .field("error", &self.error)
            .finish()
    }
}

/// Iterator adapter over a [`Cursor`], yielding owned keys.
///
/// An allocation failure is yielded once as `Err`, after which the iterator
/// is exhausted.
pub struct Iter<'a, V> {
    cursor: Cursor<'a, V>,
    started: bool,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(cursor: Cursor<'a, V>) -> Self {
        Self {
            cursor,
            started: false,
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = Result<(Vec<u8>, &'a V)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.started {
            self.cursor.advance();
        }
        self.started = true;

        if let Some(err) = self.cursor.take_error() {
            return Some(Err(err));
        }
        let data = self.cursor.data()?;
        let key = self.cursor.key()?.to_vec();
        Some(Ok((key, data)))
    }
}

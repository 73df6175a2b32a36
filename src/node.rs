//! Table nodes and the arenas that own them.
//!
//! The bucket array never stores records, only handles. A `NodeArena`
//! resolves a handle back to the `TableNode` embedded in the caller's
//! record, which is all the probing code needs to read.

use slotmap::SlotMap;

/// The part of a caller record the table reads: the full, unmasked hash.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TableNode {
    hash: i64,
}

impl TableNode {
    /// Create a node carrying `hash`. Must happen before the node's handle
    /// is inserted into any bucket array.
    #[inline]
    pub const fn new(hash: i64) -> Self {
        Self { hash }
    }

    /// Re-initialise a node that is not currently linked into a table.
    #[inline]
    pub fn init(&mut self, hash: i64) {
        self.hash = hash;
    }

    #[inline]
    pub const fn hash(&self) -> i64 {
        self.hash
    }

    /// Home slot for this node in an array of `2^bits` slots.
    #[inline]
    pub(crate) fn home(&self, mask: usize) -> usize {
        home_slot(self.hash, mask)
    }
}

#[inline]
pub(crate) fn home_slot(hash: i64, mask: usize) -> usize {
    (hash as u64 as usize) & mask
}

/// A caller record that embeds a `TableNode`.
pub trait Linked {
    fn table_node(&self) -> &TableNode;
}

impl Linked for TableNode {
    #[inline]
    fn table_node(&self) -> &TableNode {
        self
    }
}

/// Storage that maps a handle back to the node of the record it names.
///
/// Every handle stored in a bucket array must resolve for as long as it
/// stays linked; implementations may panic on a dangling handle.
pub trait NodeArena {
    type Handle: Copy + Eq;

    fn node(&self, handle: Self::Handle) -> &TableNode;

    #[inline]
    fn node_hash(&self, handle: Self::Handle) -> i64 {
        self.node(handle).hash()
    }
}

impl<K, T> NodeArena for SlotMap<K, T>
where
    K: slotmap::Key,
    T: Linked,
{
    type Handle = K;

    #[inline]
    fn node(&self, handle: K) -> &TableNode {
        self[handle].table_node()
    }
}

impl<T: Linked> NodeArena for [T] {
    type Handle = usize;

    #[inline]
    fn node(&self, handle: usize) -> &TableNode {
        self[handle].table_node()
    }
}

impl<T: Linked> NodeArena for Vec<T> {
    type Handle = usize;

    #[inline]
    fn node(&self, handle: usize) -> &TableNode {
        self[handle].table_node()
    }
}

//! Error types for the table and the map built on it.

use thiserror::Error;

/// Failure to insert into a `RobinHoodMap`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InsertError {
    /// An equal key is already present; the map is unchanged.
    #[error("key already present")]
    DuplicateKey,
}

/// Returned by a raw insert into an array with no empty slot.
///
/// The new handle was placed and every slot is still occupied by a valid
/// handle, but one previously linked handle no longer fits and was unlinked.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("bucket array is full; a linked handle was evicted")]
pub struct TableFull<H> {
    pub evicted: H,
}

/// A broken Robin Hood ordering found by `Buckets::verify`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("slot {slot} holds a node {dib} past its home right after an empty slot")]
    OrphanAfterEmpty { slot: usize, dib: usize },

    #[error("slot {slot} has DIB {dib} but the previous slot only has DIB {prev_dib}")]
    DibOrder {
        slot: usize,
        dib: usize,
        prev_dib: usize,
    },

    #[error("index links {found} nodes but {expected} are stored")]
    CountMismatch { expected: usize, found: usize },
}

//! rh-hashmap: a Robin Hood open-addressing table with backward-shift
//! deletion, plus a handle-based map built on it.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep the table algorithm independent of whatever owns the
//!   entries, so it can index records living in any arena.
//! - Layers:
//!   - Raw table (`buckets`, `probe`, `mutate`, `resize`): free functions
//!     over a `Buckets<H>` array of handles. Handles resolve to a
//!     `TableNode` (the stored hash) through a `NodeArena`.
//!   - RobinHoodMap<K, V, S>: keyed map that stores entries in a
//!     `slotmap` arena, indexes them with `Buckets<DefaultKey>`, drives
//!     the grow protocol and returns stable generational `Handle`s.
//!
//! Table layout
//! - `2^bits` slots, each `Some(handle)` or `None`; no tombstones.
//! - A node's home slot is `hash & mask`; its DIB is how far past home
//!   it sits. Scanning a run, DIB rises by at most one per slot.
//! - Lookups walk to the run of the query's home, then along nodes
//!   sharing that home; equal hashes are candidates and the caller
//!   compares keys.
//! - Inserts take the slot a lookup would stop at and push displaced
//!   nodes forward, poorer nodes keeping their place.
//! - Deletes pull the rest of the run one slot back until an empty slot
//!   or a node at its home.
//!
//! Growth
//! - An array of `2^bits` slots holds at most `floor(2^bits * 29 / 32)`
//!   nodes. Past that the map doubles the array and relinks every node.
//!   Arrays never shrink.
//!
//! Failure model
//! - Absence is `None`, never an error.
//! - Raw insert into a full array still terminates, links the new
//!   handle and reports the evicted one through `TableFull`. Every walk
//!   is bounded by the capacity.
//! - The map never lets its index fill, so it never sees `TableFull`.
//!
//! Constraints
//! - Single-threaded; no internal locking. The map is `!Send`/`!Sync`.
//! - The table never owns or frees nodes, only the bucket array.
//! - Stored hashes are immutable while linked; `K: Hash` runs once per
//!   insert or lookup and never during growth.
//! - Reentrancy from `K: Eq`/`K: Hash` into the same map panics in debug
//!   builds.
//!
//! Notes and non-goals
//! - No shrink-on-delete, no persistence, no iteration stability across
//!   mutation.
//! - Equal-hash probe order is not preserved across growth.

pub mod buckets;
pub mod error;
pub mod hash;
pub mod mutate;
pub mod node;
pub mod probe;
mod reentrancy;
pub mod resize;
pub mod robin_hood_map;
mod robin_hood_map_proptest;
#[cfg(feature = "stats")]
pub mod stats;

// Public surface
pub use buckets::Buckets;
pub use error::{InsertError, InvariantViolation, TableFull};
pub use hash::{hash_int, hash_long, hash_ptr, hash_str, BuildDjb2, BuildWang};
pub use node::{Linked, NodeArena, TableNode};
pub use reentrancy::DebugReentrancy;
pub use robin_hood_map::{Handle, RobinHoodMap};

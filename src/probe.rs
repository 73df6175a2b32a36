//! Probe engine: where a hash lives, or would live, in a bucket array.
//!
//! A lookup is two walks. `locate_home` finds the start of the run of nodes
//! sharing the query's home slot; `advance_from` then skips occupants of
//! that run whose full hash differs. What it lands on is a candidate only:
//! distinct keys can share a hash, so callers compare keys and continue
//! with `advance` on a mismatch.
//!
//! Every walk is bounded by the capacity and so terminates even on a full
//! array.

use crate::buckets::Buckets;
use crate::node::{home_slot, NodeArena};

/// First slot, walking from `hash`'s home, that is empty, starts the run of
/// nodes with the same home, or holds a node richer than the walk so far.
pub fn locate_home<A>(buckets: &Buckets<A::Handle>, arena: &A, hash: i64) -> usize
where
    A: NodeArena + ?Sized,
{
    let mask = buckets.mask();
    let home = home_slot(hash, mask);
    for dib in 0..buckets.capacity() {
        let k = (home + dib) & mask;
        let Some(h) = buckets.get(k) else {
            return k;
        };
        let home_k = arena.node(h).home(mask);
        if home_k == home {
            return k;
        }
        let dib_k = k.wrapping_sub(home_k) & mask;
        if dib_k < dib {
            return k;
        }
    }
    home
}

/// Walk from `index` past nodes that share `hash`'s home but not its full
/// value. Stops on an empty slot, an exact hash match, or a different home.
pub fn advance_from<A>(buckets: &Buckets<A::Handle>, arena: &A, hash: i64, index: usize) -> usize
where
    A: NodeArena + ?Sized,
{
    let mask = buckets.mask();
    let home = home_slot(hash, mask);
    for i in 0..buckets.capacity() {
        let k = (index + i) & mask;
        let Some(h) = buckets.get(k) else {
            return k;
        };
        let hash_k = arena.node_hash(h);
        if hash_k == hash || home_slot(hash_k, mask) != home {
            return k;
        }
    }
    index & mask
}

/// True iff `slot` is occupied by a node whose stored hash equals `hash`.
#[inline]
pub fn exists_at<A>(buckets: &Buckets<A::Handle>, arena: &A, slot: usize, hash: i64) -> bool
where
    A: NodeArena + ?Sized,
{
    buckets
        .get(slot)
        .is_some_and(|h| arena.node_hash(h) == hash)
}

/// First slot holding a node with exactly `hash`.
#[inline]
pub fn find<A>(buckets: &Buckets<A::Handle>, arena: &A, hash: i64) -> Option<usize>
where
    A: NodeArena + ?Sized,
{
    let k = advance_from(buckets, arena, hash, locate_home(buckets, arena, hash));
    exists_at(buckets, arena, k, hash).then_some(k)
}

/// Next slot after `slot` holding a node with exactly `hash`.
#[inline]
pub fn advance<A>(buckets: &Buckets<A::Handle>, arena: &A, hash: i64, slot: usize) -> Option<usize>
where
    A: NodeArena + ?Sized,
{
    let k = advance_from(buckets, arena, hash, slot.wrapping_add(1));
    exists_at(buckets, arena, k, hash).then_some(k)
}

/// Lazily yield `(slot, handle)` for every node linked with exactly `hash`.
pub fn candidates<'a, A>(
    buckets: &'a Buckets<A::Handle>,
    arena: &'a A,
    hash: i64,
) -> Candidates<'a, A>
where
    A: NodeArena + ?Sized,
{
    Candidates {
        buckets,
        arena,
        hash,
        next: find(buckets, arena, hash),
        first: None,
    }
}

/// Iterator returned by `candidates`.
pub struct Candidates<'a, A>
where
    A: NodeArena + ?Sized,
{
    buckets: &'a Buckets<A::Handle>,
    arena: &'a A,
    hash: i64,
    next: Option<usize>,
    // Where the chain started; reaching it again means the array was full
    // of this hash and the walk wrapped.
    first: Option<usize>,
}

impl<'a, A> Iterator for Candidates<'a, A>
where
    A: NodeArena + ?Sized,
{
    type Item = (usize, A::Handle);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.next?;
        let handle = self.buckets.get(slot)?;
        let first = *self.first.get_or_insert(slot);
        self.next = advance(self.buckets, self.arena, self.hash, slot).filter(|&k| k != first);
        Some((slot, handle))
    }
}

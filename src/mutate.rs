//! Mutation engine: Robin Hood insertion and backward-shift deletion.

use crate::buckets::Buckets;
use crate::error::TableFull;
use crate::node::NodeArena;
use crate::probe::locate_home;

/// Link `handle` into the array.
///
/// The handle takes the slot `locate_home` picks for its hash, and whatever
/// sat there is carried forward: at each later slot the carried handle
/// trades places with any occupant closer to its own home, until an empty
/// slot takes the last carried handle.
///
/// The array must have an empty slot. If it does not, the walk stops after
/// one lap with `handle` linked and every slot still holding a valid handle;
/// the handle that no longer fits comes back in `TableFull`.
pub fn insert<A>(
    buckets: &mut Buckets<A::Handle>,
    arena: &A,
    handle: A::Handle,
) -> Result<(), TableFull<A::Handle>>
where
    A: NodeArena + ?Sized,
{
    let mask = buckets.mask();
    let index = locate_home(buckets, arena, arena.node_hash(handle));
    let Some(mut carried) = buckets.replace(index, handle) else {
        return Ok(());
    };
    let mut dib = buckets.dib(arena, index, carried);
    for i in 1..buckets.capacity() {
        let k = (index + i) & mask;
        dib += 1;
        let Some(occupant) = buckets.get(k) else {
            buckets.set(k, Some(carried));
            return Ok(());
        };
        let dib_k = buckets.dib(arena, k, occupant);
        if dib_k < dib {
            buckets.set(k, Some(carried));
            carried = occupant;
            dib = dib_k;
        }
    }
    log::warn!(
        "insert into full bucket array of {} slots evicted a linked handle",
        buckets.capacity()
    );
    Err(TableFull { evicted: carried })
}

/// Unlink the handle in slot `index` and return it.
///
/// Later occupants of the same run shift one slot back until an empty slot
/// or a node already at its home ends the run. An empty `index` is left
/// alone and yields `None`.
pub fn delete<A>(buckets: &mut Buckets<A::Handle>, arena: &A, index: usize) -> Option<A::Handle>
where
    A: NodeArena + ?Sized,
{
    let mask = buckets.mask();
    let index = index & mask;
    let removed = buckets.take(index)?;
    let mut prev = index;
    for i in 1..buckets.capacity() {
        let k = (index + i) & mask;
        let Some(occupant) = buckets.get(k) else {
            break;
        };
        if buckets.dib(arena, k, occupant) == 0 {
            break;
        }
        buckets.set(prev, Some(occupant));
        buckets.set(k, None);
        prev = k;
    }
    Some(removed)
}

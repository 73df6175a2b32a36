//! Resize policy: grow-only, doubling, at a 29/32 load ceiling.

use crate::buckets::Buckets;
use crate::error::TableFull;
use crate::mutate::insert;
use crate::node::NodeArena;

/// Largest count an array of `2^bits` slots holds before it must grow.
///
/// `bits` must be below `usize::BITS`.
#[inline]
pub fn grow_threshold(bits: u32) -> usize {
    let cap = 1usize << bits;
    (cap >> 5) * 29 + (cap & 31) * 29 / 32
}

/// True when `count` linked nodes would exceed the load ceiling of an array
/// of `2^bits` slots.
#[inline]
pub fn needs_grow(count: usize, bits: u32) -> bool {
    count > grow_threshold(bits)
}

/// Smallest `bits` whose threshold admits `count` nodes, never below
/// `min_bits`.
///
/// # Panics
///
/// Panics with "capacity overflow" if no addressable array holds `count`.
pub fn bits_for(count: usize, min_bits: u32) -> u32 {
    let mut bits = min_bits;
    while needs_grow(count, bits) {
        bits += 1;
        assert!(bits < usize::BITS, "capacity overflow");
    }
    bits
}

/// Link every handle of `old` into `new`, in `old`'s slot order.
///
/// Homes and DIBs are recomputed for `new`'s capacity. Equal-hash nodes may
/// come out in a different probe order than they had in `old`.
pub fn rehash<A>(
    new: &mut Buckets<A::Handle>,
    old: &Buckets<A::Handle>,
    arena: &A,
) -> Result<(), TableFull<A::Handle>>
where
    A: NodeArena + ?Sized,
{
    for (_, handle) in old.iter() {
        insert(new, arena, handle)?;
    }
    log::trace!(
        "rehashed {} slots into {} slots",
        old.capacity(),
        new.capacity()
    );
    Ok(())
}

/// Build the doubled replacement for `old`. The caller swaps it in and
/// drops `old`.
pub fn grow<A>(
    old: &Buckets<A::Handle>,
    arena: &A,
) -> Result<Buckets<A::Handle>, TableFull<A::Handle>>
where
    A: NodeArena + ?Sized,
{
    let mut new = Buckets::with_bits(old.bits() + 1);
    log::debug!(
        "growing bucket array from {} to {} slots",
        old.capacity(),
        new.capacity()
    );
    rehash(&mut new, old, arena)?;
    Ok(new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::TableNode;
    use crate::probe::find;

    #[test]
    fn threshold_is_floor_of_29_32nds() {
        assert_eq!(grow_threshold(0), 0);
        assert_eq!(grow_threshold(2), 3);
        assert_eq!(grow_threshold(5), 29);
        assert_eq!(grow_threshold(10), 928);
        assert!(!needs_grow(3, 2));
        assert!(needs_grow(4, 2));
    }

    #[test]
    fn bits_for_respects_minimum() {
        assert_eq!(bits_for(0, 3), 3);
        assert_eq!(bits_for(7, 3), 3);
        assert_eq!(bits_for(8, 3), 4);
        assert_eq!(bits_for(1, 0), 1);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn threshold_is_exact_at_the_top_of_the_address_space() {
        assert_eq!(grow_threshold(60), (1usize << 55) * 29);
        assert_eq!(grow_threshold(63), (1usize << 58) * 29);
        assert_eq!(bits_for(grow_threshold(63), 3), 63);
        assert_eq!(bits_for(grow_threshold(62) + 1, 3), 63);
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn bits_for_unaddressable_count_panics() {
        bits_for(usize::MAX / 2, 3);
    }

    #[test]
    fn grow_doubles_and_keeps_every_node() {
        let arena: Vec<TableNode> = (0..3).map(|i| TableNode::new(i * 4)).collect();
        let mut old: Buckets<usize> = Buckets::with_bits(2);
        for h in 0..arena.len() {
            insert(&mut old, arena.as_slice(), h).unwrap();
        }
        let new = grow(&old, arena.as_slice()).unwrap();
        assert_eq!(new.bits(), 3);
        assert_eq!(new.occupied(), 3);
        assert_eq!(new.verify(arena.as_slice()), Ok(()));
        for n in &arena {
            assert!(find(&new, arena.as_slice(), n.hash()).is_some());
        }
        // 0 and 8 share home 0 in eight slots; 4 now has its own home.
        assert_eq!(new.get(4), Some(1));
    }

    #[test]
    fn rehash_into_too_small_array_reports_full() {
        let arena: Vec<TableNode> = (0..3).map(TableNode::new).collect();
        let mut old: Buckets<usize> = Buckets::with_bits(2);
        for h in 0..3 {
            insert(&mut old, arena.as_slice(), h).unwrap();
        }
        let mut small: Buckets<usize> = Buckets::with_bits(1);
        assert!(rehash(&mut small, &old, arena.as_slice()).is_err());
    }
}

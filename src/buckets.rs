//! Bucket array: `2^bits` slots of optional node handles.

use crate::error::InvariantViolation;
use crate::node::NodeArena;

/// A power-of-two array of handles. Slots hold `Some(handle)` for a linked
/// node or `None` when empty; there are no tombstones.
///
/// The array belongs to whoever drives the table. Growing produces a new
/// array (see `resize::grow`) which replaces this one wholesale.
#[derive(Clone, Debug)]
pub struct Buckets<H> {
    slots: Box<[Option<H>]>,
    bits: u32,
}

impl<H: Copy + Eq> Buckets<H> {
    /// Allocate an empty array of `2^bits` slots.
    pub fn with_bits(bits: u32) -> Self {
        assert!(
            bits < usize::BITS,
            "bucket array of 2^{bits} slots cannot be addressed"
        );
        let slots = vec![None; 1usize << bits].into_boxed_slice();
        Self { slots, bits }
    }

    #[inline]
    pub fn bits(&self) -> u32 {
        self.bits
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn mask(&self) -> usize {
        self.slots.len() - 1
    }

    /// Handle stored at `slot`, if any. Out-of-range slots read as empty.
    #[inline]
    pub fn get(&self, slot: usize) -> Option<H> {
        self.slots.get(slot).copied().flatten()
    }

    #[inline]
    pub fn is_occupied(&self, slot: usize) -> bool {
        self.get(slot).is_some()
    }

    /// Number of occupied slots. Walks the whole array.
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Lazily iterate `(slot, handle)` over occupied slots in index order.
    pub fn iter(&self) -> Occupied<'_, H> {
        Occupied {
            it: self.slots.iter().enumerate(),
        }
    }

    /// Unlink every handle. Nodes themselves are untouched.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
    }

    #[inline]
    pub(crate) fn set(&mut self, slot: usize, value: Option<H>) {
        self.slots[slot] = value;
    }

    #[inline]
    pub(crate) fn replace(&mut self, slot: usize, handle: H) -> Option<H> {
        self.slots[slot].replace(handle)
    }

    #[inline]
    pub(crate) fn take(&mut self, slot: usize) -> Option<H> {
        self.slots[slot].take()
    }

    /// Distance of the node in `slot` from its home slot.
    #[inline]
    pub(crate) fn dib<A>(&self, arena: &A, slot: usize, handle: H) -> usize
    where
        A: NodeArena<Handle = H> + ?Sized,
    {
        let mask = self.mask();
        slot.wrapping_sub(arena.node(handle).home(mask)) & mask
    }

    /// Check the Robin Hood ordering over the whole array: a node away from
    /// its home never follows an empty slot, and DIB grows by at most one
    /// from one occupied slot to the next.
    pub fn verify<A>(&self, arena: &A) -> Result<(), InvariantViolation>
    where
        A: NodeArena<Handle = H> + ?Sized,
    {
        let mask = self.mask();
        for (slot, handle) in self.iter() {
            let dib = self.dib(arena, slot, handle);
            if dib == 0 {
                continue;
            }
            let prev = slot.wrapping_sub(1) & mask;
            match self.get(prev) {
                None => return Err(InvariantViolation::OrphanAfterEmpty { slot, dib }),
                Some(p) => {
                    let prev_dib = self.dib(arena, prev, p);
                    if dib > prev_dib + 1 {
                        return Err(InvariantViolation::DibOrder {
                            slot,
                            dib,
                            prev_dib,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Iterator over occupied slots of a `Buckets`.
pub struct Occupied<'a, H> {
    it: core::iter::Enumerate<core::slice::Iter<'a, Option<H>>>,
}

impl<'a, H: Copy> Iterator for Occupied<'a, H> {
    type Item = (usize, H);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.find_map(|(i, s)| s.map(|h| (i, h)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.it.size_hint().1)
    }
}

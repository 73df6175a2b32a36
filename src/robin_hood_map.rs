//! RobinHoodMap: keyed map over a Robin Hood bucket index, with stable
//! generational handles to its entries.

use crate::buckets::{Buckets, Occupied};
use crate::error::{InsertError, InvariantViolation};
use crate::mutate;
use crate::node::{Linked, TableNode};
use crate::probe;
use crate::reentrancy::DebugReentrancy;
use crate::resize;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use slotmap::{DefaultKey, SlotMap};
use std::collections::hash_map::RandomState;

/// Bucket bits of a map built without a capacity hint (8 slots).
pub const DEFAULT_BITS: u32 = 3;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Handle(DefaultKey);

impl Handle {
    pub(crate) fn new(k: DefaultKey) -> Self {
        Handle(k)
    }
    pub(crate) fn raw_handle(&self) -> DefaultKey {
        self.0
    }

    pub fn key<'a, K, V, S>(&self, map: &'a RobinHoodMap<K, V, S>) -> Option<&'a K>
    where
        K: Eq + Hash,
        S: BuildHasher,
    {
        map.handle_key(*self)
    }

    pub fn value<'a, K, V, S>(&self, map: &'a RobinHoodMap<K, V, S>) -> Option<&'a V>
    where
        K: Eq + Hash,
        S: BuildHasher,
    {
        map.handle_value(*self)
    }

    pub fn value_mut<'a, K, V, S>(&self, map: &'a mut RobinHoodMap<K, V, S>) -> Option<&'a mut V>
    where
        K: Eq + Hash,
        S: BuildHasher,
    {
        map.handle_value_mut(*self)
    }
}

#[derive(Debug)]
struct Entry<K, V> {
    node: TableNode,
    key: K,
    value: V,
}

impl<K, V> Linked for Entry<K, V> {
    #[inline]
    fn table_node(&self) -> &TableNode {
        &self.node
    }
}

type Slots<K, V> = SlotMap<DefaultKey, Entry<K, V>>;

/// A map whose entries live in a slot arena and are indexed by a Robin Hood
/// bucket array of arena keys.
///
/// Each entry's hash is computed once on insert and kept in its node, so
/// growing never calls back into `K: Hash`.
pub struct RobinHoodMap<K, V, S = RandomState> {
    hasher: S,
    index: Buckets<DefaultKey>,
    slots: Slots<K, V>,
    reentrancy: DebugReentrancy,
}

impl<K, V> RobinHoodMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, Default::default())
    }
}

impl<K, V> Default for RobinHoodMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over entries in bucket order.
pub struct Iter<'a, K, V> {
    occupied: Occupied<'a, DefaultKey>,
    slots: &'a Slots<K, V>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (Handle, &'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (_, k) = self.occupied.next()?;
        let e = &self.slots[k];
        Some((Handle::new(k), &e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.slots.len()))
    }
}

/// Iterator over mutable entries, in arena order.
pub struct IterMut<'a, K, V> {
    it: slotmap::basic::IterMut<'a, DefaultKey, Entry<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (Handle, &'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it
            .next()
            .map(|(k, e)| (Handle::new(k), &e.key, &mut e.value))
    }
}

impl<K, V, S> RobinHoodMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_bits_and_hasher(DEFAULT_BITS, hasher)
    }

    /// Size the index so `capacity` entries fit without growing.
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self::with_bits_and_hasher(resize::bits_for(capacity, DEFAULT_BITS), hasher)
    }

    /// Start with an index of exactly `2^bits` slots.
    pub fn with_bits_and_hasher(bits: u32, hasher: S) -> Self {
        Self {
            hasher,
            index: Buckets::with_bits(bits),
            slots: SlotMap::with_key(),
            reentrancy: DebugReentrancy::new(),
        }
    }

    fn make_hash<Q>(&self, q: &Q) -> i64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q) as i64
    }

    // Walk the equal-hash chain comparing keys.
    fn locate<Q>(&self, hash: i64, q: &Q) -> Option<(usize, DefaultKey)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        probe::candidates(&self.index, &self.slots, hash)
            .find(|&(_, k)| self.slots[k].key.borrow() == q)
    }

    // Grow `index` one doubling at a time until `count` entries fit.
    // Panics with "capacity overflow" before allocating if none can.
    fn ensure_room(index: &mut Buckets<DefaultKey>, slots: &Slots<K, V>, count: usize) {
        let target = resize::bits_for(count, index.bits());
        while index.bits() < target {
            *index = resize::grow(index, slots)
                .expect("a doubled index admits every linked entry");
        }
    }

    fn link(
        index: &mut Buckets<DefaultKey>,
        slots: &mut Slots<K, V>,
        entry: Entry<K, V>,
    ) -> DefaultKey {
        Self::ensure_room(index, slots, slots.len() + 1);
        let k = slots.insert(entry);
        mutate::insert(index, &*slots, k)
            .expect("index below its load ceiling has a free slot");
        k
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Bucket bits of the index; its capacity is `2^bits`.
    pub fn bits(&self) -> u32 {
        self.index.bits()
    }
    pub fn capacity(&self) -> usize {
        self.index.capacity()
    }

    pub fn find<Q>(&self, q: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(q);
        self.locate(hash, q).map(|(_, k)| Handle::new(k))
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).is_some()
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let h = self.find(q)?;
        self.slots.get(h.raw_handle()).map(|e| &e.value)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let h = self.find(q)?;
        self.slots.get_mut(h.raw_handle()).map(|e| &mut e.value)
    }

    /// Insert a new entry. An equal key already present is an error and
    /// leaves the map untouched.
    pub fn insert(&mut self, key: K, value: V) -> Result<Handle, InsertError> {
        self.insert_with(key, || value)
    }

    /// Like `insert`, but `default` only runs when the key is absent.
    pub fn insert_with<F>(&mut self, key: K, default: F) -> Result<Handle, InsertError>
    where
        F: FnOnce() -> V,
    {
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(&key);
        if self.locate(hash, &key).is_some() {
            return Err(InsertError::DuplicateKey);
        }
        let entry = Entry {
            node: TableNode::new(hash),
            key,
            value: default(),
        };
        let k = Self::link(&mut self.index, &mut self.slots, entry);
        Ok(Handle::new(k))
    }

    /// Insert, or overwrite the value of an equal key in place. Returns the
    /// entry's handle and the value it replaced, if any.
    pub fn upsert(&mut self, key: K, value: V) -> (Handle, Option<V>) {
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(&key);
        if let Some((_, k)) = self.locate(hash, &key) {
            let old = core::mem::replace(&mut self.slots[k].value, value);
            return (Handle::new(k), Some(old));
        }
        let entry = Entry {
            node: TableNode::new(hash),
            key,
            value,
        };
        let k = Self::link(&mut self.index, &mut self.slots, entry);
        (Handle::new(k), None)
    }

    /// Unlink and return the entry behind `handle`. Stale handles yield
    /// `None`.
    pub fn remove(&mut self, handle: Handle) -> Option<(K, V)> {
        let _g = self.reentrancy.enter();
        let k = handle.raw_handle();
        let hash = self.slots.get(k)?.node.hash();
        let (slot, _) = probe::candidates(&self.index, &self.slots, hash)
            .find(|&(_, kk)| kk == k)
            .expect("live entry is linked in the index");
        mutate::delete(&mut self.index, &self.slots, slot);
        let entry = self.slots.remove(k)?;
        Some((entry.key, entry.value))
    }

    pub fn remove_key<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(q);
        let (slot, k) = self.locate(hash, q)?;
        mutate::delete(&mut self.index, &self.slots, slot);
        let entry = self.slots.remove(k)?;
        Some((entry.key, entry.value))
    }

    /// Make room for `additional` more entries without further growth.
    pub fn reserve(&mut self, additional: usize) {
        let _g = self.reentrancy.enter();
        let count = self.slots.len().saturating_add(additional);
        Self::ensure_room(&mut self.index, &self.slots, count);
    }

    /// Drop every entry. The index keeps its capacity.
    pub fn clear(&mut self) {
        log::debug!(
            "clearing {} entries from a {}-slot index",
            self.slots.len(),
            self.index.capacity()
        );
        self.index.clear();
        self.slots.clear();
    }

    pub(crate) fn handle_key(&self, h: Handle) -> Option<&K> {
        let _g = self.reentrancy.enter();
        self.slots.get(h.raw_handle()).map(|e| &e.key)
    }

    pub(crate) fn handle_value(&self, h: Handle) -> Option<&V> {
        let _g = self.reentrancy.enter();
        self.slots.get(h.raw_handle()).map(|e| &e.value)
    }

    pub(crate) fn handle_value_mut(&mut self, h: Handle) -> Option<&mut V> {
        let _g = self.reentrancy.enter();
        self.slots.get_mut(h.raw_handle()).map(|e| &mut e.value)
    }

    /// Entries in bucket order. Any mutation ends the iteration.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            occupied: self.index.iter(),
            slots: &self.slots,
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            it: self.slots.iter_mut(),
        }
    }

    /// Check that every entry is linked exactly once and the index keeps
    /// its Robin Hood ordering.
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        let found = self.index.occupied();
        if found != self.slots.len() {
            return Err(InvariantViolation::CountMismatch {
                expected: self.slots.len(),
                found,
            });
        }
        self.index.verify(&self.slots)
    }

    #[cfg(feature = "stats")]
    pub fn stats(&self) -> crate::stats::ProbeStats {
        crate::stats::ProbeStats::collect(&self.index, &self.slots)
    }
}

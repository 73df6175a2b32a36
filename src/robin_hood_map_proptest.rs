#![cfg(test)]

// Property tests for RobinHoodMap kept inside the crate so they can reach
// the index through `verify` after every step.

use crate::error::InsertError;
use crate::hash::Djb2Hasher;
use crate::robin_hood_map::{Handle, RobinHoodMap};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::cell::Cell;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hasher};
use std::rc::Rc;

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations so failures shrink toward earlier keys and
// shorter op lists.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    InsertWith(usize, i32),
    Upsert(usize, i32),
    Remove(usize),
    RemoveKey(usize),
    Find(usize),
    Contains(String),
    Mutate(usize, i32),
    Reserve(u8),
    Iterate,
    Clear,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::InsertWith(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Upsert(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::RemoveKey),
            2 => idx.clone().prop_map(OpI::Find),
            1 => prop_oneof![contains_pool, "[a-z]{0,5}"].prop_map(OpI::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => any::<u8>().prop_map(OpI::Reserve),
            1 => Just(OpI::Iterate),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Every key hashes to one value.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// djb2 folded into a handful of values: keys share homes without sharing
// hashes, and share hashes without being equal.
#[derive(Clone, Default)]
struct FewHashesBuildHasher;
struct FewHashes(Djb2Hasher);
impl BuildHasher for FewHashesBuildHasher {
    type Hasher = FewHashes;
    fn build_hasher(&self) -> Self::Hasher {
        FewHashes(Djb2Hasher::default())
    }
}
impl Hasher for FewHashes {
    fn write(&mut self, bytes: &[u8]) {
        self.0.write(bytes);
    }
    fn finish(&self) -> u64 {
        (self.0.finish() % 5) * 8
    }
}

// State-machine equivalence against std::collections::HashMap.
// Checked after every op:
// - the index passes `verify` (every entry linked once, Robin Hood order);
// - stale handles never resolve;
// - len/is_empty parity with the model.
fn run_state_machine<S: BuildHasher>(
    mut sut: RobinHoodMap<Key, i32, S>,
    pool: Vec<String>,
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<Key, i32> = HashMap::new();
    let mut live: HashMap<Key, Handle> = HashMap::new();
    let mut stale: Vec<Handle> = Vec::new();

    let default_calls = Rc::new(Cell::new(0));
    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = key_from(&pool, i);
                let already = model.contains_key(&k);
                match sut.insert(k.clone(), v) {
                    Ok(h) => {
                        prop_assert!(!already, "insert must fail on duplicate");
                        prop_assert!(live.insert(k.clone(), h).is_none());
                        model.insert(k, v);
                    }
                    Err(InsertError::DuplicateKey) => {
                        prop_assert!(already, "duplicate error only when key exists");
                    }
                }
            }
            OpI::InsertWith(i, v) => {
                let k = key_from(&pool, i);
                let already = model.contains_key(&k);
                let counter = default_calls.clone();
                let before = counter.get();
                match sut.insert_with(k.clone(), move || {
                    counter.set(counter.get() + 1);
                    v
                }) {
                    Ok(h) => {
                        prop_assert!(!already);
                        prop_assert_eq!(default_calls.get(), before + 1);
                        prop_assert!(live.insert(k.clone(), h).is_none());
                        model.insert(k, v);
                    }
                    Err(InsertError::DuplicateKey) => {
                        prop_assert!(already);
                        prop_assert_eq!(default_calls.get(), before);
                    }
                }
            }
            OpI::Upsert(i, v) => {
                let k = key_from(&pool, i);
                let (h, prev) = sut.upsert(k.clone(), v);
                prop_assert_eq!(prev, model.insert(k.clone(), v));
                let tracked = *live.entry(k).or_insert(h);
                prop_assert_eq!(tracked, h, "upsert keeps the existing handle");
            }
            OpI::Remove(i) => {
                let k = key_from(&pool, i);
                if let Some(h) = live.remove(&k) {
                    let (kk, vv) = sut.remove(h).expect("handle valid for removal");
                    prop_assert!(kk == k);
                    prop_assert_eq!(Some(vv), model.remove(&kk));
                    stale.push(h);
                } else {
                    prop_assert!(sut.find(&k).is_none());
                }
            }
            OpI::RemoveKey(i) => {
                let k = key_from(&pool, i);
                let got = sut.remove_key(k.0.as_str());
                let expected = model.remove(&k);
                prop_assert_eq!(got.map(|(_, v)| v), expected);
                if let Some(h) = live.remove(&k) {
                    stale.push(h);
                }
            }
            OpI::Find(i) => {
                let k = key_from(&pool, i);
                let s = sut.find(&k);
                prop_assert_eq!(s.is_some(), model.contains_key(&k));
                if let Some(h) = s {
                    prop_assert_eq!(Some(&h), live.get(&k));
                    prop_assert_eq!(h.value(&sut), model.get(&k));
                }
            }
            OpI::Contains(s) => {
                let has_model = model.keys().any(|k| k.0 == s);
                prop_assert_eq!(sut.contains_key(s.as_str()), has_model);
            }
            OpI::Mutate(i, d) => {
                let k = key_from(&pool, i);
                if let Some(&h) = live.get(&k) {
                    let vr = h.value_mut(&mut sut);
                    prop_assert!(vr.is_some(), "live handle should resolve");
                    if let Some(vr) = vr {
                        *vr = vr.saturating_add(d);
                    }
                    if let Some(mv) = model.get_mut(&k) {
                        *mv = mv.saturating_add(d);
                    }
                }
            }
            OpI::Reserve(n) => {
                let bits = sut.bits();
                sut.reserve(n as usize);
                prop_assert!(sut.bits() >= bits, "reserve never shrinks");
            }
            OpI::Iterate => {
                let s_keys: BTreeSet<_> = sut.iter().map(|(_, k, _)| k.clone()).collect();
                let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                prop_assert_eq!(sut.iter().count(), model.len());
                prop_assert_eq!(s_keys, m_keys);
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
                stale.extend(live.drain().map(|(_, h)| h));
            }
        }

        prop_assert_eq!(sut.verify(), Ok(()));
        for &h in &stale {
            prop_assert!(h.value(&sut).is_none());
        }
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_state_machine(RobinHoodMap::new(), pool, ops)?;
    }

    // Worst case: one equal-hash chain holds every key.
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_state_machine(RobinHoodMap::with_hasher(ConstBuildHasher), pool, ops)?;
    }

    // Start from a single slot so nearly every insert goes through growth,
    // with a few hashes that all share home 0 at small capacities.
    #[test]
    fn prop_state_machine_few_hashes_tiny_start((pool, ops) in arb_scenario()) {
        run_state_machine(RobinHoodMap::with_bits_and_hasher(0, FewHashesBuildHasher), pool, ops)?;
    }
}

// RobinHoodMap integration suite.
//
// Each test documents what behavior is being verified and which
// invariants are assumed or asserted. The core invariants exercised:
// - Round trip: inserted keys are found with their values.
// - Absence: never-inserted and removed keys are not found.
// - Uniqueness: duplicate insert rejects and leaves the map unchanged.
// - Growth: membership survives every doubling of the index.
// - Ownership: the map drops keys/values exactly once on remove/clear/drop.
mod common;

use common::init_test_logger;
use rh_hashmap::{BuildDjb2, BuildWang, InsertError, RobinHoodMap};
use std::cell::Cell;
use std::hash::{BuildHasher, Hasher};
use std::rc::Rc;

// Test: round trip and absence across growth.
// Assumes: default hasher; start at 8 slots.
// Verifies: every inserted key found; disjoint keys missed; index valid.
#[test]
fn round_trip_and_absence() {
    init_test_logger();
    let mut m = RobinHoodMap::new();
    for i in 0..2_000u32 {
        m.insert(format!("k{i}"), i).expect("fresh key");
    }
    assert_eq!(m.len(), 2_000);
    for i in 0..2_000u32 {
        assert_eq!(m.get(format!("k{i}").as_str()), Some(&i));
    }
    for i in 2_000..4_000u32 {
        assert!(!m.contains_key(format!("k{i}").as_str()));
    }
    assert_eq!(m.verify(), Ok(()));
}

// Test: delete-then-absent, with the survivors intact.
// Assumes: removal by key through backward shifting.
// Verifies: removed keys vanish immediately; others keep their values.
#[test]
fn delete_then_absent() {
    init_test_logger();
    let mut m: RobinHoodMap<u64, u64, BuildWang> = RobinHoodMap::with_hasher(BuildWang::default());
    for i in 0..1_000 {
        m.insert(i, i * i).unwrap();
    }
    for i in (0..1_000).step_by(3) {
        let (k, v) = m.remove_key(&i).expect("present");
        assert_eq!((k, v), (i, i * i));
        assert!(m.get(&i).is_none());
        assert!(m.remove_key(&i).is_none());
    }
    for i in 0..1_000 {
        let expected = if i % 3 == 0 { None } else { Some(i * i) };
        assert_eq!(m.get(&i).copied(), expected);
    }
    assert_eq!(m.verify(), Ok(()));
}

// Test: duplicate keys.
// Assumes: insert rejects, upsert replaces.
// Verifies: map unchanged by a rejected insert; upsert keeps the handle.
#[test]
fn duplicate_insert_and_upsert() {
    let mut m: RobinHoodMap<String, i32, BuildDjb2> =
        RobinHoodMap::with_hasher(BuildDjb2::default());
    let h = m.insert("dup".to_string(), 1).unwrap();
    assert_eq!(m.insert("dup".to_string(), 2), Err(InsertError::DuplicateKey));
    assert_eq!(h.value(&m), Some(&1));

    let (h2, prev) = m.upsert("dup".to_string(), 3);
    assert_eq!(h2, h);
    assert_eq!(prev, Some(1));
    assert_eq!(m.get("dup"), Some(&3));
    assert_eq!(m.len(), 1);
}

// Test: keys engineered to share one hash.
// Assumes: the hasher maps "a*" keys to 7 and others to 15, so both groups
// share a home at small capacities.
// Verifies: all retrievable; each removable without disturbing the rest.
#[test]
fn engineered_equal_hashes() {
    #[derive(Clone, Default)]
    struct PrefixBuildHasher;
    #[derive(Default)]
    struct PrefixHasher(u64);
    impl BuildHasher for PrefixBuildHasher {
        type Hasher = PrefixHasher;
        fn build_hasher(&self) -> PrefixHasher {
            PrefixHasher::default()
        }
    }
    impl Hasher for PrefixHasher {
        fn write(&mut self, bytes: &[u8]) {
            if self.0 == 0 {
                self.0 = if bytes.first() == Some(&b'a') { 7 } else { 15 };
            }
        }
        fn finish(&self) -> u64 {
            self.0
        }
    }

    let mut m: RobinHoodMap<&'static str, u8, PrefixBuildHasher> =
        RobinHoodMap::with_hasher(PrefixBuildHasher);
    let keys = ["a1", "b1", "a2", "b2", "a3"];
    for (i, k) in keys.iter().enumerate() {
        m.insert(*k, i as u8).unwrap();
    }
    assert_eq!(m.verify(), Ok(()));
    for (i, k) in keys.iter().enumerate() {
        assert_eq!(m.get(k), Some(&(i as u8)));
    }
    for (n, k) in keys.iter().enumerate() {
        assert!(m.remove_key(k).is_some());
        assert_eq!(m.verify(), Ok(()));
        for (j, rest) in keys.iter().enumerate().skip(n + 1) {
            assert_eq!(m.get(rest), Some(&(j as u8)));
        }
    }
    assert!(m.is_empty());
}

// Test: the map owns its entries.
// Assumes: remove returns ownership; clear and drop release the rest.
// Verifies: each value dropped exactly once.
#[test]
fn values_dropped_exactly_once() {
    struct Tracked(Rc<Cell<usize>>);
    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    let drops = Rc::new(Cell::new(0));
    let mut m = RobinHoodMap::new();
    let handles: Vec<_> = (0..20)
        .map(|i| m.insert(i, Tracked(drops.clone())).unwrap())
        .collect();

    let (_, v) = m.remove(handles[0]).unwrap();
    assert_eq!(drops.get(), 0);
    drop(v);
    assert_eq!(drops.get(), 1);

    m.remove_key(&1);
    assert_eq!(drops.get(), 2);

    m.clear();
    assert_eq!(drops.get(), 20);

    for i in 0..5 {
        m.insert(i, Tracked(drops.clone())).unwrap();
    }
    drop(m);
    assert_eq!(drops.get(), 25);
}

// Test: iteration visits the index in bucket order.
// Assumes: nothing mutates during iteration.
// Verifies: every handle yielded resolves to the same key and value.
#[test]
fn iter_handles_resolve() {
    let mut m = RobinHoodMap::new();
    for i in 0..100 {
        m.insert(i, -i).unwrap();
    }
    let mut seen = 0;
    for (h, k, v) in m.iter() {
        assert_eq!(h.key(&m), Some(k));
        assert_eq!(h.value(&m), Some(v));
        assert_eq!(*v, -*k);
        seen += 1;
    }
    assert_eq!(seen, 100);
}

// Test: probe statistics reflect the index.
// Assumes: the `stats` feature.
// Verifies: counts match; load stays under the grow ceiling.
#[cfg(feature = "stats")]
#[test]
fn stats_track_load() {
    let mut m = RobinHoodMap::new();
    for i in 0..1_000u32 {
        m.insert(i, ()).unwrap();
    }
    let s = m.stats();
    assert_eq!(s.len, 1_000);
    assert_eq!(s.capacity, m.capacity());
    assert_eq!(s.histogram.iter().sum::<usize>(), 1_000);
    assert!(s.load_factor <= 29.0 / 32.0);
    assert!(s.max_dib < s.capacity);
}

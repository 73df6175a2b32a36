//! Reference hash functions and `Hasher` adaptors over them.
//!
//! Nothing in the table depends on these; any source of `i64` hashes works.

use core::hash::{BuildHasherDefault, Hasher};

const DJB2_SEED: u64 = 5381;

/// djb2 over a NUL-terminated byte string: `h = h * 33 + byte`, starting
/// from 5381. Hashing stops at the first NUL byte or at the end of `s`.
pub fn hash_str(s: impl AsRef<[u8]>) -> i64 {
    s.as_ref()
        .iter()
        .take_while(|&&b| b != 0)
        .fold(DJB2_SEED, |h, &b| djb2_step(h, b)) as i64
}

#[inline]
fn djb2_step(h: u64, b: u8) -> u64 {
    (h << 5).wrapping_add(h).wrapping_add(u64::from(b))
}

/// Thomas Wang's 32-bit integer hash. The result is zero-extended, so the
/// upper 32 bits are always clear.
pub fn hash_int(i: i32) -> i64 {
    let mut key = i as u32;
    key = (!key).wrapping_add(key << 15);
    key ^= key >> 12;
    key = key.wrapping_add(key << 2);
    key ^= key >> 4;
    key = key.wrapping_mul(2057);
    key ^= key >> 16;
    i64::from(key)
}

/// Thomas Wang's 64-bit integer hash.
pub fn hash_long(l: i64) -> i64 {
    let mut key = l as u64;
    key = (!key).wrapping_add(key << 21);
    key ^= key >> 24;
    key = key.wrapping_add(key << 3).wrapping_add(key << 8);
    key ^= key >> 14;
    key = key.wrapping_add(key << 2).wrapping_add(key << 4);
    key ^= key >> 28;
    key = key.wrapping_add(key << 31);
    key as i64
}

/// Hash of an address, via `hash_long`.
pub fn hash_ptr<T: ?Sized>(ptr: *const T) -> i64 {
    hash_long(ptr.cast::<()>() as usize as i64)
}

/// Streaming djb2. Unlike `hash_str`, every byte written is mixed in,
/// NUL included.
#[derive(Clone, Copy, Debug)]
pub struct Djb2Hasher {
    state: u64,
}

impl Default for Djb2Hasher {
    fn default() -> Self {
        Self { state: DJB2_SEED }
    }
}

impl Hasher for Djb2Hasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.state = bytes.iter().fold(self.state, |h, &b| djb2_step(h, b));
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.state
    }
}

pub type BuildDjb2 = BuildHasherDefault<Djb2Hasher>;

/// Mixes each written integer through `hash_long`. Suited to integer and
/// pointer keys; byte slices are folded in eight bytes at a time.
#[derive(Clone, Copy, Debug, Default)]
pub struct WangHasher {
    state: u64,
}

impl WangHasher {
    #[inline]
    fn mix(&mut self, word: u64) {
        self.state = hash_long((self.state ^ word) as i64) as u64;
    }
}

impl Hasher for WangHasher {
    fn write(&mut self, bytes: &[u8]) {
        for chunk in bytes.chunks(8) {
            let mut word = [0u8; 8];
            word[..chunk.len()].copy_from_slice(chunk);
            self.mix(u64::from_le_bytes(word));
        }
    }

    #[inline]
    fn write_u8(&mut self, i: u8) {
        self.mix(u64::from(i));
    }

    #[inline]
    fn write_u16(&mut self, i: u16) {
        self.mix(u64::from(i));
    }

    #[inline]
    fn write_u32(&mut self, i: u32) {
        self.mix(u64::from(i));
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.mix(i);
    }

    #[inline]
    fn write_usize(&mut self, i: usize) {
        self.mix(i as u64);
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.state
    }
}

pub type BuildWang = BuildHasherDefault<WangHasher>;

#[cfg(test)]
mod tests {
    use super::*;
    use core::hash::{BuildHasher, Hash};

    #[test]
    fn djb2_known_values() {
        assert_eq!(hash_str(""), 5381);
        assert_eq!(hash_str("a"), 177670);
        assert_eq!(hash_str("hello"), 210714636441);
        assert_eq!(
            hash_str("abcdefghijklmnopqrstuvwxyz"),
            -335349779824265724
        );
    }

    #[test]
    fn djb2_stops_at_nul() {
        assert_eq!(hash_str(b"a\0bc"), hash_str("a"));
        assert_eq!(hash_str(b"\0"), 5381);
    }

    #[test]
    fn wang_32_known_values() {
        assert_eq!(hash_int(0), 3399731875);
        assert_eq!(hash_int(1), 316017654);
        assert_eq!(hash_int(42), 2006371508);
        assert_eq!(hash_int(-1), 3176528920);
        assert!((0..1000).map(hash_int).all(|h| h >> 32 == 0));
    }

    #[test]
    fn wang_64_known_values() {
        assert_eq!(hash_long(0), 8633297058295171728);
        assert_eq!(hash_long(1), 6614235796240398542);
        assert_eq!(hash_long(42), 1098236396662648698);
        assert_eq!(hash_long(-1), 2272383144869939092);
    }

    #[test]
    fn pointer_hash_is_wang_of_address() {
        let x = 7u32;
        let p: *const u32 = &x;
        assert_eq!(hash_ptr(p), hash_long(p as usize as i64));
        assert_eq!(hash_ptr(p), hash_ptr(p));
    }

    #[test]
    fn hashers_agree_with_free_functions() {
        let mut d = Djb2Hasher::default();
        d.write(b"hello");
        assert_eq!(d.finish() as i64, hash_str("hello"));

        let w = BuildWang::default();
        assert_eq!(w.hash_one(42u64) as i64, hash_long(42));

        let mut h1 = BuildDjb2::default().build_hasher();
        "key".hash(&mut h1);
        let mut h2 = BuildDjb2::default().build_hasher();
        "key".hash(&mut h2);
        assert_eq!(h1.finish(), h2.finish());
    }
}

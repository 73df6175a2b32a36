//! Debug-only guard against user code re-entering a map mid-operation.
//!
//! `RobinHoodMap` calls into `K: Hash` and `K: Eq` while it walks the
//! bucket array. Between a bucket shift and the matching arena update the
//! two disagree, so a nested call from inside those impls must not run. In
//! debug builds the guard panics on nested entry; in release builds it is a
//! zero-sized no-op.

use core::cell::Cell;
use core::marker::PhantomData;

#[derive(Debug)]
pub struct DebugReentrancy {
    #[cfg(debug_assertions)]
    busy: Cell<bool>,
    // Single-threaded: keep the owner !Send + !Sync.
    _nosend: PhantomData<*mut ()>,
}

impl DebugReentrancy {
    pub const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            busy: Cell::new(false),
            _nosend: PhantomData,
        }
    }

    /// Mark the owner busy until the returned guard drops.
    #[inline]
    pub fn enter(&self) -> ReentrancyGuard<'_> {
        #[cfg(debug_assertions)]
        {
            assert!(
                !self.busy.replace(true),
                "reentrant call into map while a probe was in progress"
            );
            ReentrancyGuard { owner: self }
        }

        #[cfg(not(debug_assertions))]
        {
            ReentrancyGuard { _z: PhantomData }
        }
    }
}

impl Default for DebugReentrancy {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ReentrancyGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.owner.busy.set(false);
    }
}

//! Probe-length statistics over a bucket array.

use crate::buckets::Buckets;
use crate::node::NodeArena;

/// Load and DIB distribution of one bucket array.
#[derive(Clone, Debug, PartialEq)]
pub struct ProbeStats {
    /// Occupied slots.
    pub len: usize,
    pub capacity: usize,
    /// `len / capacity`.
    pub load_factor: f64,
    pub max_dib: usize,
    pub mean_dib: f64,
    /// `histogram[d]` counts occupants sitting `d` slots past their home.
    pub histogram: Vec<usize>,
}

impl ProbeStats {
    pub fn collect<A>(buckets: &Buckets<A::Handle>, arena: &A) -> Self
    where
        A: NodeArena + ?Sized,
    {
        let mut histogram = Vec::new();
        let mut total = 0usize;
        let mut len = 0usize;
        for (slot, handle) in buckets.iter() {
            let dib = buckets.dib(arena, slot, handle);
            if histogram.len() <= dib {
                histogram.resize(dib + 1, 0);
            }
            histogram[dib] += 1;
            total += dib;
            len += 1;
        }
        let capacity = buckets.capacity();
        Self {
            len,
            capacity,
            load_factor: len as f64 / capacity as f64,
            max_dib: histogram.len().saturating_sub(1),
            mean_dib: if len == 0 {
                0.0
            } else {
                total as f64 / len as f64
            },
            histogram,
        }
    }
}

impl core::fmt::Display for ProbeStats {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(
            f,
            "{}/{} slots ({:.2}% load), mean DIB {:.3}, max DIB {}",
            self.len,
            self.capacity,
            self.load_factor * 100.0,
            self.mean_dib,
            self.max_dib
        )?;
        for (dib, count) in self.histogram.iter().enumerate() {
            writeln!(f, "  dib {dib:>3}: {count}")?;
        }
        Ok(())
    }
}

//! Cached mask entries and the hotness metric that drives eviction.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::mask::Mask;

/// Additive constant in the hotness formula, keeping a freshly-inserted,
/// never-accessed entry's hotness above zero so it isn't evicted on the
/// very next sweep purely for having `access_count == 0`.
pub const EVICTION_CONST: f64 = 64.0;

/// One entry in the [`crate::cache::MaskCache`]: an immutable mask plus the
/// bookkeeping `remove_random_entry` uses to score it for eviction.
///
/// Created on insertion and never mutated afterward except for the atomic
/// access counter; entries are deleted wholesale, never updated in place.
pub struct CachedMaskEntry {
    mask: Arc<Mask>,
    byte_size: u32,
    creation_instant: u32,
    access_count: AtomicU64,
}

impl CachedMaskEntry {
    /// Construct a fresh entry at tick `now` (see [`crate::cache::now_ticks`]).
    pub fn new(mask: Arc<Mask>, byte_size: u32, now: u32) -> CachedMaskEntry {
        CachedMaskEntry { mask, byte_size, creation_instant: now, access_count: AtomicU64::new(0) }
    }

    /// The entry's mask, cheaply cloned via `Arc`.
    pub fn mask(&self) -> Arc<Mask> {
        Arc::clone(&self.mask)
    }

    /// The entry's approximate in-memory footprint, as computed at insertion.
    pub fn byte_size(&self) -> u32 {
        self.byte_size
    }

    /// Atomically record a cache hit.
    pub fn bump_access(&self) {
        self.access_count.fetch_add(1, Ordering::Relaxed);
    }

    /// The number of times this entry has been returned by `get`.
    pub fn access_count(&self) -> u64 {
        self.access_count.load(Ordering::Relaxed)
    }

    /// `(EVICTION_CONST + byte_size * access_count) / max(1, now - creation_instant)`.
    ///
    /// Higher is hotter: large, frequently-accessed, recently-created
    /// entries score highest and are least likely to be swept.
    pub fn hotness(&self, now: u32) -> f64 {
        let elapsed = now.wrapping_sub(self.creation_instant).max(1) as f64;
        (EVICTION_CONST + self.byte_size as f64 * self.access_count() as f64) / elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(byte_size: u32, now: u32) -> CachedMaskEntry {
        CachedMaskEntry::new(Arc::new(Mask::empty()), byte_size, now)
    }

    #[test]
    fn fresh_entry_has_positive_hotness() {
        let e = entry(100, 0);
        assert!(e.hotness(1) > 0.0);
    }

    #[test]
    fn accessed_entry_is_hotter_than_untouched_one() {
        let cold = entry(100, 0);
        let hot = entry(100, 0);
        hot.bump_access();
        hot.bump_access();
        assert!(hot.hotness(10) > cold.hotness(10));
    }

    #[test]
    fn older_entry_cools_down_over_time() {
        let e = entry(100, 0);
        e.bump_access();
        assert!(e.hotness(100) < e.hotness(2));
    }
}

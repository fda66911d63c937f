//! The size-bounded, content-addressed mask cache.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::cache::clock::now_ticks;
use crate::cache::entry::CachedMaskEntry;
use crate::cache::key::CacheKey;
use crate::error::ConfigError;
use crate::mask::Mask;

/// The smallest `byte_size_limit` a [`MaskCache`] may be constructed with.
pub const MIN_CAPACITY: u32 = 1024;

/// How many entries `remove_random_entry` samples per sweep before picking
/// the coldest of the batch.
const SAMPLE_SIZE: usize = 10;

/// A function estimating a mask's in-memory footprint in bytes, injected at
/// construction so callers can plug in their own accounting (e.g. for a mask
/// stored as a GPU texture handle rather than a plain byte buffer).
pub type ByteSizeEstimator = dyn Fn(&Mask) -> u32 + Send + Sync;

/// Byte-size estimator for a mask stored as a plain 8-bit alpha raster.
pub fn estimate_alpha_mask(mask: &Mask) -> u32 {
    mask.estimate_alpha_byte_size()
}

/// Byte-size estimator for a mask stored as an opaque RGBA texture handle.
pub fn estimate_rgba_mask(mask: &Mask) -> u32 {
    mask.estimate_rgba_byte_size()
}

/// A thread-safe, size-bounded, content-addressed cache of rasterized masks.
///
/// `get` takes only a read lock; `put` and `remove_random_entry` take the
/// write lock solely around the map mutation. Byte accounting
/// (`bytes_available`, `lowest_bytes_available`) is atomic and correct even
/// under racing `put`s, independent of the map's own lock.
pub struct MaskCache {
    entries: RwLock<HashMap<CacheKey, CachedMaskEntry>>,
    bytes_available: AtomicU32,
    lowest_bytes_available: AtomicU32,
    byte_size_limit: u32,
    estimator: Box<ByteSizeEstimator>,
    rng: parking_lot::Mutex<StdRng>,
}

impl MaskCache {
    /// Construct a cache with the given byte budget and size estimator.
    ///
    /// Fails if `byte_size_limit < `[`MIN_CAPACITY`]. The RNG backing
    /// `remove_random_entry`'s sampling is seeded from the OS's
    /// cryptographically strong source.
    pub fn new(
        byte_size_limit: u32,
        estimator: impl Fn(&Mask) -> u32 + Send + Sync + 'static,
    ) -> Result<MaskCache, ConfigError> {
        if byte_size_limit < MIN_CAPACITY {
            return Err(ConfigError::CapacityTooSmall(byte_size_limit));
        }
        log::debug!("mask cache constructed with {byte_size_limit} byte budget");
        Ok(MaskCache {
            entries: RwLock::new(HashMap::new()),
            bytes_available: AtomicU32::new(byte_size_limit),
            lowest_bytes_available: AtomicU32::new(byte_size_limit),
            byte_size_limit,
            estimator: Box::new(estimator),
            rng: parking_lot::Mutex::new(StdRng::from_os_rng()),
        })
    }

    /// Look up `key`. On a hit, bumps the entry's access counter and returns
    /// a cheap `Arc` clone of its mask.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<Mask>> {
        let entries = self.entries.read();
        let entry = entries.get(key)?;
        entry.bump_access();
        Some(entry.mask())
    }

    /// The bytes currently charged against the limit: `limit - bytes_available`.
    pub fn approx_byte_size(&self) -> u32 {
        self.byte_size_limit - self.bytes_available.load(Ordering::Acquire)
    }

    /// The largest `approx_byte_size` has ever been: `limit - lowest_bytes_available`.
    ///
    /// Monotonically non-decreasing over the cache's lifetime.
    pub fn peak_size(&self) -> u32 {
        self.byte_size_limit - self.lowest_bytes_available.load(Ordering::Acquire)
    }

    /// Insert `mask` under `key`.
    ///
    /// If there isn't enough room, attempts up to two rounds of
    /// [`MaskCache::remove_random_entry`] using the incoming mask's hotness
    /// (at `access_count == 0`, `now == now`) as the eviction threshold. If
    /// that still doesn't free enough space, the insertion is silently
    /// dropped — the next `get` for this key simply re-rasterizes.
    ///
    /// There is no guaranteed ordering of concurrent `put`s for the same
    /// key: whichever reaches the write lock last overwrites whatever is
    /// already there, releasing the byte budget the overwritten entry held.
    pub fn put(&self, key: CacheKey, mask: Mask) {
        let byte_size = (self.estimator)(&mask);
        let now = now_ticks();
        let incoming_hotness = CachedMaskEntry::new(Arc::new(Mask::empty()), byte_size, now).hotness(now + 1);

        if !self.reserve(byte_size) {
            for _ in 0..2 {
                if self.remove_random_entry(incoming_hotness, now) == 0 {
                    break;
                }
                if self.reserve(byte_size) {
                    break;
                }
            }
            if self.bytes_available.load(Ordering::Acquire) < byte_size {
                log::trace!("cache put dropped: {byte_size} bytes unavailable after eviction attempts");
                return;
            }
        }

        let mut entries = self.entries.write();
        let old = entries.insert(key, CachedMaskEntry::new(Arc::new(mask), byte_size, now));
        if let Some(old) = old {
            self.release(old.byte_size());
        }
        self.track_low_water();
    }

    /// Sample up to [`SAMPLE_SIZE`] entries (reservoir sampling over the
    /// current entry set) and evict the coldest one if its hotness falls
    /// strictly below `threshold_hotness`. Returns the freed byte count, or
    /// `0` if the cache was empty or nothing was cold enough to evict.
    pub fn remove_random_entry(&self, threshold_hotness: f64, now: u32) -> u32 {
        let candidate = {
            let entries = self.entries.read();
            if entries.is_empty() {
                return 0;
            }
            let mut rng = self.rng.lock();
            reservoir_sample_coldest(entries.iter().map(|(k, e)| (*k, e.hotness(now))), &mut rng)
        };

        let Some((key, hotness)) = candidate else {
            return 0;
        };
        if hotness >= threshold_hotness {
            return 0;
        }

        let mut entries = self.entries.write();
        let Some(entry) = entries.get(&key) else {
            return 0;
        };
        // Re-check: another writer may have replaced or already evicted it.
        if entry.hotness(now) != hotness {
            return 0;
        }
        let byte_size = entry.byte_size();
        entries.remove(&key);
        self.release(byte_size);
        log::trace!("evicted cold entry ({byte_size} bytes, hotness {hotness})");
        byte_size
    }

    /// Atomically deduct `byte_size` from `bytes_available` if enough room
    /// remains. Returns whether the reservation succeeded.
    fn reserve(&self, byte_size: u32) -> bool {
        self.bytes_available
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |avail| {
                if avail >= byte_size {
                    Some(avail - byte_size)
                } else {
                    None
                }
            })
            .is_ok()
    }

    fn release(&self, byte_size: u32) {
        self.bytes_available.fetch_add(byte_size, Ordering::AcqRel);
    }

    fn track_low_water(&self) {
        let current = self.bytes_available.load(Ordering::Acquire);
        self.lowest_bytes_available.fetch_min(current, Ordering::AcqRel);
    }
}

/// Reservoir-sample up to [`SAMPLE_SIZE`] `(key, hotness)` pairs from
/// `items` (an iterator whose length isn't known up front, matching "random
/// iteration order" over a hash map), then return the coldest one sampled.
fn reservoir_sample_coldest(
    items: impl Iterator<Item = (CacheKey, f64)>,
    rng: &mut impl Rng,
) -> Option<(CacheKey, f64)> {
    let mut reservoir: Vec<(CacheKey, f64)> = Vec::with_capacity(SAMPLE_SIZE);
    for (i, item) in items.enumerate() {
        if reservoir.len() < SAMPLE_SIZE {
            reservoir.push(item);
        } else {
            let j = rng.random_range(0..=i);
            if j < SAMPLE_SIZE {
                reservoir[j] = item;
            }
        }
    }
    reservoir.into_iter().min_by(|a, b| a.1.total_cmp(&b.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;

    fn small_mask(w: u32, h: u32) -> Mask {
        Mask { width: w, height: h, data: vec![255; (w * h) as usize], offset_x: 0, offset_y: 0 }
    }

    fn key(glyph: u16) -> CacheKey {
        let mut k = CacheKey::default();
        k.set_glyph_index(glyph);
        k
    }

    #[test]
    fn construction_rejects_capacity_below_minimum() {
        assert!(MaskCache::new(MIN_CAPACITY - 1, estimate_alpha_mask).is_err());
        assert!(MaskCache::new(MIN_CAPACITY, estimate_alpha_mask).is_ok());
    }

    #[test]
    fn fresh_cache_reports_zero_size_and_peak() {
        let cache = MaskCache::new(MIN_CAPACITY, estimate_alpha_mask).unwrap();
        assert_eq!(cache.approx_byte_size(), 0);
        assert_eq!(cache.peak_size(), 0);
    }

    #[test]
    fn put_then_get_round_trips() {
        let cache = MaskCache::new(MIN_CAPACITY, estimate_alpha_mask).unwrap();
        let mask = small_mask(4, 4);
        cache.put(key(1), mask.clone());
        let got = cache.get(&key(1)).unwrap();
        assert_eq!(*got, mask);
        assert!(cache.approx_byte_size() > 0);
    }

    #[test]
    fn peak_size_never_decreases_after_eviction() {
        let limit = estimate_alpha_mask(&small_mask(10, 10)) * 2;
        let cache = MaskCache::new(limit.max(MIN_CAPACITY), estimate_alpha_mask).unwrap();
        for i in 0..2u16 {
            cache.put(key(i), small_mask(10, 10));
        }
        let peak_before = cache.peak_size();
        // A third insert may evict one of the first two if the limit is tight.
        cache.put(key(2), small_mask(10, 10));
        assert!(cache.peak_size() >= peak_before);
    }

    #[test]
    fn distinct_fractional_keys_do_not_collide() {
        let cache = MaskCache::new(MIN_CAPACITY, estimate_alpha_mask).unwrap();
        let mut a = CacheKey::default();
        a.set_fractional(Point::default());
        let mut b = CacheKey::default();
        b.set_fractional(Point::new(crate::fixed::Unit::from_raw(32), crate::fixed::Unit::from_raw(0)));
        cache.put(a, small_mask(2, 2));
        cache.put(b, small_mask(3, 3));
        assert_eq!(cache.get(&a).unwrap().width, 2);
        assert_eq!(cache.get(&b).unwrap().width, 3);
    }

    #[test]
    fn put_with_same_key_overwrites_and_releases_the_old_entry() {
        let cache = MaskCache::new(MIN_CAPACITY, estimate_alpha_mask).unwrap();
        cache.put(key(1), small_mask(4, 4));
        let size_after_first = cache.approx_byte_size();
        cache.put(key(1), small_mask(6, 6));
        assert_eq!(cache.get(&key(1)).unwrap().width, 6);
        assert_eq!(cache.approx_byte_size(), size_after_first - estimate_alpha_mask(&small_mask(4, 4)) + estimate_alpha_mask(&small_mask(6, 6)));
    }
}

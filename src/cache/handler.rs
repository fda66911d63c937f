//! Per-renderer façade that assembles the active cache key and forwards to
//! a shared [`MaskCache`].

use std::sync::Arc;

use crate::cache::key::CacheKey;
use crate::cache::store::MaskCache;
use crate::fixed::Unit;
use crate::geom::Point;
use crate::mask::Mask;

/// Tracks one renderer's active fingerprint components and talks to a
/// shared [`MaskCache`] on its behalf.
///
/// Not thread-safe: a renderer owns exactly one handler and drives it from
/// a single logical thread. Many handlers (one per renderer) may share one
/// cache safely, since all cross-handler interaction goes through the
/// cache's own locking.
pub struct CacheHandler<'a> {
    cache: &'a MaskCache,
    active_key: CacheKey,
}

impl<'a> CacheHandler<'a> {
    /// Create a handler bound to `cache`, with all fingerprint lanes zeroed.
    pub fn new(cache: &'a MaskCache) -> CacheHandler<'a> {
        CacheHandler { cache, active_key: CacheKey::default() }
    }

    /// Record a change of active font (writes lane 0).
    pub fn notify_font_change(&mut self, font_id: u64) {
        self.active_key.set_font(font_id);
    }

    /// Record a change of rasterizer configuration (writes lane 1).
    pub fn notify_rasterizer_change(&mut self, signature: u64) {
        self.active_key.set_rasterizer(signature);
    }

    /// Record a change of pixel size (writes the size bits of lane 2).
    pub fn notify_size_change(&mut self, size_px: Unit) {
        self.active_key.set_size(size_px);
    }

    /// Record a change of subpixel fractional offset (writes the fractional
    /// bits of lane 2).
    pub fn notify_fract_change(&mut self, point: Point) {
        self.active_key.set_fractional(point);
    }

    /// Look up the mask for `glyph_index` under the current fingerprint.
    pub fn get_mask(&self, glyph_index: u16) -> Option<Arc<Mask>> {
        let mut key = self.active_key;
        key.set_glyph_index(glyph_index);
        self.cache.get(&key)
    }

    /// Insert `mask` for `glyph_index` under the current fingerprint.
    pub fn put_mask(&self, glyph_index: u16, mask: Mask) {
        let mut key = self.active_key;
        key.set_glyph_index(glyph_index);
        self.cache.put(key, mask);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::store::estimate_alpha_mask;

    #[test]
    fn handlers_on_distinct_fonts_do_not_collide() {
        let cache = MaskCache::new(crate::cache::MIN_CAPACITY, estimate_alpha_mask).unwrap();
        let mut a = CacheHandler::new(&cache);
        a.notify_font_change(1);
        let mut b = CacheHandler::new(&cache);
        b.notify_font_change(2);

        let mask = Mask { width: 2, height: 2, data: vec![1, 2, 3, 4], offset_x: 0, offset_y: 0 };
        a.put_mask(5, mask.clone());
        assert!(b.get_mask(5).is_none());
        assert_eq!(*a.get_mask(5).unwrap(), mask);
    }
}

//! The glyph mask cache: a size-bounded, content-addressed store mapping a
//! [`CacheKey`] fingerprint to a rasterized [`crate::mask::Mask`], evicted by
//! a hotness heuristic under random sampling rather than strict LRU.
//!
//! [`MaskCache`] is the shared, thread-safe object; [`CacheHandler`] is the
//! per-renderer façade that composes the active fingerprint and forwards to
//! it. See [`crate::layout`] for how the layout engine drives a handler.

mod clock;
mod entry;
mod handler;
mod key;
mod store;

pub use clock::now_ticks;
pub use entry::{CachedMaskEntry, EVICTION_CONST};
pub use handler::CacheHandler;
pub use key::CacheKey;
pub use store::{estimate_alpha_mask, estimate_rgba_mask, ByteSizeEstimator, MaskCache, MIN_CAPACITY};

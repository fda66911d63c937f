//! Downscaled monotonic clock for the hotness metric.
//!
//! Nanoseconds since an arbitrary per-process epoch, right-shifted by 27
//! (~134 ms per tick), fit in a `u32` for roughly 18 years of uptime.
//! Overflow is harmless: it only perturbs eviction tie-breaks.

use std::sync::OnceLock;
use std::time::Instant;

fn epoch() -> Instant {
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    *EPOCH.get_or_init(Instant::now)
}

/// The current downscaled tick count.
pub fn now_ticks() -> u32 {
    (epoch().elapsed().as_nanos() >> 27) as u32
}

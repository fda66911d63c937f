//! Adaptive flattening of quadratic and cubic Bezier curves into line segments.
//!
//! The rasterizer only ever walks straight lines; [`Segmenter`] is the sole
//! place curves get subdivided, so both the edge marker and any decorator
//! (e.g. [`crate::raster::faux::FauxStyler`]) share one flattening policy.

use crate::geom::Point;

/// Curve flattening policy: how aggressively to subdivide before accepting a
/// chord as a good enough approximation of the curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segmenter {
    /// Maximum perpendicular distance, in pixels, between a curve's control
    /// point and the chord approximating it.
    pub threshold: f64,
    /// Maximum recursive subdivision depth; clamped to `[0, 255]` by
    /// [`Segmenter::new`]. The worst case segment count for one curve is
    /// `2^max_splits`, so very large values are the caller's responsibility.
    pub max_splits: u8,
}

impl Default for Segmenter {
    fn default() -> Segmenter {
        Segmenter { threshold: 0.2, max_splits: 8 }
    }
}

impl Segmenter {
    /// Construct a segmenter, clamping `max_splits` to `[0, 255]` (a `u8` is
    /// already within range; this exists so call sites that compute the
    /// depth from a wider integer type don't need to clamp themselves).
    pub fn new(threshold: f64, max_splits: u32) -> Segmenter {
        Segmenter { threshold, max_splits: max_splits.min(255) as u8 }
    }

    /// Flatten a quadratic curve from `p0` through control point `ctrl` to
    /// `p1`, appending line endpoints (not including `p0`) to `out`.
    ///
    /// Always emits at least one point (the curve's end), and always
    /// terminates: subdivision stops once the control point's distance to
    /// the chord is below `threshold`, or `max_splits` recursion levels have
    /// been spent, whichever comes first.
    pub fn flatten_quad(&self, p0: Point, ctrl: Point, p1: Point, out: &mut Vec<Point>) {
        let p0f = f64_of(p0);
        let ctrlf = f64_of(ctrl);
        let p1f = f64_of(p1);
        self.subdivide_quad(p0f, ctrlf, p1f, self.max_splits, out);
    }

    /// Flatten a cubic curve from `p0` through control points `c0`, `c1` to
    /// `p1`, appending line endpoints (not including `p0`) to `out`.
    pub fn flatten_cubic(&self, p0: Point, c0: Point, c1: Point, p1: Point, out: &mut Vec<Point>) {
        let p0f = f64_of(p0);
        let c0f = f64_of(c0);
        let c1f = f64_of(c1);
        let p1f = f64_of(p1);
        self.subdivide_cubic(p0f, c0f, c1f, p1f, self.max_splits, out);
    }

    fn subdivide_quad(&self, p0: (f64, f64), ctrl: (f64, f64), p1: (f64, f64), depth: u8, out: &mut Vec<Point>) {
        if depth == 0 || perpendicular_distance(ctrl, p0, p1) < self.threshold {
            out.push(point_of(p1));
            return;
        }

        // De Casteljau midpoint split at t = 0.5.
        let p01 = midpoint(p0, ctrl);
        let p12 = midpoint(ctrl, p1);
        let mid = midpoint(p01, p12);

        self.subdivide_quad(p0, p01, mid, depth - 1, out);
        self.subdivide_quad(mid, p12, p1, depth - 1, out);
    }

    fn subdivide_cubic(
        &self,
        p0: (f64, f64),
        c0: (f64, f64),
        c1: (f64, f64),
        p1: (f64, f64),
        depth: u8,
        out: &mut Vec<Point>,
    ) {
        let d0 = perpendicular_distance(c0, p0, p1);
        let d1 = perpendicular_distance(c1, p0, p1);
        if depth == 0 || d0.max(d1) < self.threshold {
            out.push(point_of(p1));
            return;
        }

        let p01 = midpoint(p0, c0);
        let p12 = midpoint(c0, c1);
        let p23 = midpoint(c1, p1);
        let p012 = midpoint(p01, p12);
        let p123 = midpoint(p12, p23);
        let mid = midpoint(p012, p123);

        self.subdivide_cubic(p0, p01, p012, mid, depth - 1, out);
        self.subdivide_cubic(mid, p123, p23, p1, depth - 1, out);
    }
}

fn f64_of(p: Point) -> (f64, f64) {
    (p.x.to_f64(), p.y.to_f64())
}

fn point_of((x, y): (f64, f64)) -> Point {
    use crate::fixed::Unit;
    Point::new(
        Unit::from_f64_round_toward_zero(x).unwrap_or(Unit::ZERO),
        Unit::from_f64_round_toward_zero(y).unwrap_or(Unit::ZERO),
    )
}

fn midpoint(a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
    ((a.0 + b.0) * 0.5, (a.1 + b.1) * 0.5)
}

/// Perpendicular distance from `p` to the line through `a` and `b`.
///
/// Falls back to the Euclidean distance from `a` to `p` when `a == b`, so a
/// zero-length chord still produces a meaningful (non-NaN) measurement.
fn perpendicular_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1e-9 {
        let (ex, ey) = (p.0 - a.0, p.1 - a.1);
        return (ex * ex + ey * ey).sqrt();
    }
    ((p.0 - a.0) * dy - (p.1 - a.1) * dx).abs() / len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::Unit;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(
            Unit::from_f64_round_toward_zero(x).unwrap(),
            Unit::from_f64_round_toward_zero(y).unwrap(),
        )
    }

    #[test]
    fn straight_quad_emits_single_segment() {
        let s = Segmenter::default();
        let mut out = Vec::new();
        s.flatten_quad(pt(0.0, 0.0), pt(5.0, 0.0), pt(10.0, 0.0), &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0], pt(10.0, 0.0));
    }

    #[test]
    fn curved_quad_subdivides_and_terminates() {
        let s = Segmenter::new(0.01, 8);
        let mut out = Vec::new();
        s.flatten_quad(pt(0.0, 0.0), pt(50.0, 100.0), pt(100.0, 0.0), &mut out);
        assert!(out.len() > 1);
        assert!(out.len() <= 256);
        assert_eq!(*out.last().unwrap(), pt(100.0, 0.0));
    }

    #[test]
    fn zero_max_splits_always_emits_one_segment() {
        let s = Segmenter::new(0.0001, 0);
        let mut out = Vec::new();
        s.flatten_quad(pt(0.0, 0.0), pt(50.0, 100.0), pt(100.0, 0.0), &mut out);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn cubic_terminates_and_ends_at_target() {
        let s = Segmenter::default();
        let mut out = Vec::new();
        s.flatten_cubic(pt(0.0, 0.0), pt(20.0, 60.0), pt(80.0, -60.0), pt(100.0, 0.0), &mut out);
        assert!(!out.is_empty());
        assert_eq!(*out.last().unwrap(), pt(100.0, 0.0));
    }

    #[test]
    fn new_clamps_max_splits() {
        let s = Segmenter::new(0.2, 10_000);
        assert_eq!(s.max_splits, 255);
    }
}

//! Synthetic bold and oblique styling for faces lacking a true bold/italic
//! variant.
//!
//! Both knobs are folded into the rasterizer's cache signature by the caller
//! (see [`crate::cache::CacheKey`]) so a styled and unstyled mask for the
//! same glyph never collide.

use crate::fixed::Unit;
use crate::geom::Point;
use crate::mask::Mask;
use crate::outline::OutlineSegment;
use crate::raster::marker;
use crate::segment::Segmenter;

/// The horizontal step between successive faux-bold repaints, in pixels.
const BOLD_STEP: f64 = 0.34;

/// Synthetic style parameters applied to an outline before rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FauxStyle {
    /// Non-negative extra stroke weight, in pixels. `0.0` disables faux bold.
    pub extra_width: f64,
    /// X-shear proportional to y, in `[-1, 1]`. `0.0` disables faux oblique;
    /// a typical slant uses a small positive value (e.g. `0.2` for a ~11
    /// degree lean).
    pub skew_factor: f64,
}

impl FauxStyle {
    /// The no-op style: neither bold nor oblique.
    pub const NONE: FauxStyle = FauxStyle { extra_width: 0.0, skew_factor: 0.0 };

    /// `true` if this style would change the rasterization at all.
    pub fn is_identity(&self) -> bool {
        self.extra_width == 0.0 && self.skew_factor == 0.0
    }
}

/// Rasterize `outline` with faux bold/oblique styling applied.
///
/// Oblique shears every point by `skew_factor * y` along x before
/// rasterization (a positive factor slants the top of upright glyphs to
/// the right). Bold paints the sheared outline once, then repeats the
/// paint shifted right by one [`BOLD_STEP`] at a time up to `extra_width`,
/// taking the maximum coverage per pixel so the combined alpha reads as a
/// single wider glyph. Advances and kerning are not adjusted here — pair
/// this with a padded-advance sizer.
pub fn rasterize_styled(
    outline: &[OutlineSegment],
    fractional_origin: Point,
    segmenter: &Segmenter,
    style: FauxStyle,
) -> Mask {
    if style.is_identity() {
        return marker::rasterize(outline, fractional_origin, segmenter);
    }

    let sheared = if style.skew_factor != 0.0 { shear(outline, style.skew_factor) } else { outline.to_vec() };

    if style.extra_width <= 0.0 {
        return marker::rasterize(&sheared, fractional_origin, segmenter);
    }

    let masks: Vec<Mask> = bold_offsets(style.extra_width)
        .into_iter()
        .map(|ox| {
            let shifted = translate(&sheared, ox, 0.0);
            marker::rasterize(&shifted, fractional_origin, segmenter)
        })
        .collect();

    union_max(&masks)
}

/// Shear every point in `outline` by `shear * y` along x.
fn shear(outline: &[OutlineSegment], shear: f64) -> Vec<OutlineSegment> {
    let shift = |p: Point| -> Point {
        let dx = Unit::from_f64_round_toward_zero(shear * p.y.to_f64()).unwrap_or(Unit::ZERO);
        Point::new(p.x.add(dx), p.y)
    };
    map_points(outline, shift)
}

/// Translate every point in `outline` by `(dx, dy)` pixels.
fn translate(outline: &[OutlineSegment], dx: f64, dy: f64) -> Vec<OutlineSegment> {
    let dxu = Unit::from_f64_round_toward_zero(dx).unwrap_or(Unit::ZERO);
    let dyu = Unit::from_f64_round_toward_zero(dy).unwrap_or(Unit::ZERO);
    map_points(outline, |p| p.translate(dxu, dyu))
}

fn map_points(outline: &[OutlineSegment], f: impl Fn(Point) -> Point) -> Vec<OutlineSegment> {
    outline
        .iter()
        .map(|seg| match *seg {
            OutlineSegment::MoveTo { to } => OutlineSegment::MoveTo { to: f(to) },
            OutlineSegment::LineTo { to } => OutlineSegment::LineTo { to: f(to) },
            OutlineSegment::QuadTo { ctrl, to } => OutlineSegment::QuadTo { ctrl: f(ctrl), to: f(to) },
            OutlineSegment::CubeTo { c0, c1, to } => OutlineSegment::CubeTo { c0: f(c0), c1: f(c1), to: f(to) },
        })
        .collect()
}

/// The offsets to repaint at, from `0.0` up to and including `extra_width`,
/// spaced `BOLD_STEP` pixels apart.
fn bold_offsets(extra_width: f64) -> Vec<f64> {
    let steps = (extra_width / BOLD_STEP).ceil() as u32;
    let mut out = Vec::with_capacity(steps as usize + 1);
    for i in 0..=steps {
        out.push((i as f64 * BOLD_STEP).min(extra_width));
    }
    out
}

/// Composite several same-glyph masks by taking the maximum coverage at
/// each pixel, over the union of their bounding boxes.
fn union_max(masks: &[Mask]) -> Mask {
    let Some(first) = masks.iter().find(|m| !m.is_empty()) else {
        return Mask::empty();
    };

    let mut min_x = first.offset_x;
    let mut min_y = first.offset_y;
    let mut max_x = first.offset_x + first.width as i32;
    let mut max_y = first.offset_y + first.height as i32;
    for m in masks.iter().filter(|m| !m.is_empty()) {
        min_x = min_x.min(m.offset_x);
        min_y = min_y.min(m.offset_y);
        max_x = max_x.max(m.offset_x + m.width as i32);
        max_y = max_y.max(m.offset_y + m.height as i32);
    }

    let width = (max_x - min_x) as u32;
    let height = (max_y - min_y) as u32;
    let mut data = vec![0u8; (width * height) as usize];
    for m in masks.iter().filter(|m| !m.is_empty()) {
        for y in 0..m.height as i32 {
            for x in 0..m.width as i32 {
                let v = m.sample(x, y);
                if v == 0 {
                    continue;
                }
                let dst_x = (m.offset_x + x - min_x) as u32;
                let dst_y = (m.offset_y + y - min_y) as u32;
                let idx = (dst_y * width + dst_x) as usize;
                data[idx] = data[idx].max(v);
            }
        }
    }

    Mask { width, height, data, offset_x: min_x, offset_y: min_y }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::Unit;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(Unit::from_f64_round_toward_zero(x).unwrap(), Unit::from_f64_round_toward_zero(y).unwrap())
    }

    fn square() -> Vec<OutlineSegment> {
        vec![
            OutlineSegment::MoveTo { to: pt(2.0, 2.0) },
            OutlineSegment::LineTo { to: pt(6.0, 2.0) },
            OutlineSegment::LineTo { to: pt(6.0, 6.0) },
            OutlineSegment::LineTo { to: pt(2.0, 6.0) },
        ]
    }

    #[test]
    fn identity_style_matches_plain_rasterize() {
        let plain = marker::rasterize(&square(), Point::default(), &Segmenter::default());
        let styled = rasterize_styled(&square(), Point::default(), &Segmenter::default(), FauxStyle::NONE);
        assert_eq!(plain, styled);
    }

    #[test]
    fn faux_bold_grows_the_covered_area() {
        let plain = marker::rasterize(&square(), Point::default(), &Segmenter::default());
        let bold = rasterize_styled(
            &square(),
            Point::default(),
            &Segmenter::default(),
            FauxStyle { extra_width: 1.0, skew_factor: 0.0 },
        );
        let count = |m: &Mask| m.data.iter().filter(|&&v| v > 0).count();
        assert!(count(&bold) > count(&plain));
    }

    #[test]
    fn faux_oblique_shears_without_panicking() {
        let mask = rasterize_styled(
            &square(),
            Point::default(),
            &Segmenter::default(),
            FauxStyle { extra_width: 0.0, skew_factor: 0.3 },
        );
        assert!(!mask.is_empty());
    }
}

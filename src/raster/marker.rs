//! Outline-to-mask driver: walks [`OutlineSegment`]s, flattening curves
//! through a [`Segmenter`] and marking the result into an [`EdgeBuffer`].
//! Shared by the plain rasterizer and by [`crate::raster::faux`]'s styling
//! decorator, which transforms the outline before handing it here.

use crate::fixed::Unit;
use crate::geom::Point;
use crate::mask::Mask;
use crate::outline::OutlineSegment;
use crate::raster::edge::EdgeBuffer;
use crate::segment::Segmenter;

/// Rasterize a glyph outline into an 8-bit alpha [`Mask`].
///
/// `fractional_origin` is the sub-pixel offset of the pen within the
/// destination pixel grid (each component normally in `[0, 1)` pixel); it
/// lets the cache hold one mask per glyph while still rendering crisply at
/// any subpixel phase the layout engine asks for. `outline` points are in
/// the glyph's own fixed-point coordinate space (curve flattening happens
/// there, with `segmenter`); the resulting pixel bounds fold in
/// `fractional_origin` before any point is marked into the buffer.
///
/// An outline with no segments, or one whose first command is not a
/// `MoveTo`, rasterizes as if an implicit `MoveTo` to the origin preceded
/// it — malformed input never panics.
pub fn rasterize(outline: &[OutlineSegment], fractional_origin: Point, segmenter: &Segmenter) -> Mask {
    if outline.is_empty() {
        return Mask::empty();
    }

    let (min, max) = bounding_box(outline);
    let min_x = min.x.add(fractional_origin.x).to_f64();
    let min_y = min.y.add(fractional_origin.y).to_f64();
    let max_x = max.x.add(fractional_origin.x).to_f64();
    let max_y = max.y.add(fractional_origin.y).to_f64();

    let dx = min_x.floor();
    let dy = min_y.floor();
    let width = (max_x.ceil() - dx).max(1.0) as u32;
    let height = (max_y.ceil() - dy).max(1.0) as u32;

    let mut marker = EdgeMarker::new(width, height, fractional_origin, dx, dy);
    for seg in outline {
        marker.apply(seg, segmenter);
    }
    marker.finish(dx as i32, dy as i32)
}

/// Conservative bounding box over every point in the outline, including
/// curve control points (a superset of the curve's true extent, since a
/// Bezier curve always lies within its control polygon's bounding box).
fn bounding_box(outline: &[OutlineSegment]) -> (Point, Point) {
    let mut min = Point::new(Unit::from_raw(i32::MAX), Unit::from_raw(i32::MAX));
    let mut max = Point::new(Unit::from_raw(i32::MIN), Unit::from_raw(i32::MIN));
    let mut visit = |p: Point| {
        min.x = Unit::from_raw(min.x.0.min(p.x.0));
        min.y = Unit::from_raw(min.y.0.min(p.y.0));
        max.x = Unit::from_raw(max.x.0.max(p.x.0));
        max.y = Unit::from_raw(max.y.0.max(p.y.0));
    };
    for seg in outline {
        match *seg {
            OutlineSegment::MoveTo { to } | OutlineSegment::LineTo { to } => visit(to),
            OutlineSegment::QuadTo { ctrl, to } => {
                visit(ctrl);
                visit(to);
            }
            OutlineSegment::CubeTo { c0, c1, to } => {
                visit(c0);
                visit(c1);
                visit(to);
            }
        }
    }
    (min, max)
}

struct EdgeMarker {
    buf: EdgeBuffer,
    fractional_origin: Point,
    dx: f64,
    dy: f64,
    pen: Point,
    pen_px: (f64, f64),
    contour_start_px: (f64, f64),
    open: bool,
}

impl EdgeMarker {
    fn new(width: u32, height: u32, fractional_origin: Point, dx: f64, dy: f64) -> EdgeMarker {
        EdgeMarker {
            buf: EdgeBuffer::new(width, height),
            fractional_origin,
            dx,
            dy,
            pen: Point::default(),
            pen_px: (0.0, 0.0),
            contour_start_px: (0.0, 0.0),
            open: false,
        }
    }

    fn to_px(&self, p: Point) -> (f64, f64) {
        (
            p.x.add(self.fractional_origin.x).to_f64() - self.dx,
            p.y.add(self.fractional_origin.y).to_f64() - self.dy,
        )
    }

    fn close_contour(&mut self) {
        if self.open {
            self.buf.add_line(self.pen_px, self.contour_start_px);
            self.open = false;
        }
    }

    fn move_to(&mut self, to: Point) {
        self.close_contour();
        self.pen = to;
        self.pen_px = self.to_px(to);
        self.contour_start_px = self.pen_px;
        self.open = true;
    }

    fn line_to(&mut self, to: Point) {
        let to_px = self.to_px(to);
        self.buf.add_line(self.pen_px, to_px);
        self.pen = to;
        self.pen_px = to_px;
    }

    fn apply(&mut self, seg: &OutlineSegment, segmenter: &Segmenter) {
        match *seg {
            OutlineSegment::MoveTo { to } => self.move_to(to),
            OutlineSegment::LineTo { to } => {
                if !self.open {
                    self.move_to(Point::default());
                }
                self.line_to(to);
            }
            OutlineSegment::QuadTo { ctrl, to } => {
                if !self.open {
                    self.move_to(Point::default());
                }
                let mut pts = Vec::new();
                segmenter.flatten_quad(self.pen, ctrl, to, &mut pts);
                for p in pts {
                    self.line_to(p);
                }
            }
            OutlineSegment::CubeTo { c0, c1, to } => {
                if !self.open {
                    self.move_to(Point::default());
                }
                let mut pts = Vec::new();
                segmenter.flatten_cubic(self.pen, c0, c1, to, &mut pts);
                for p in pts {
                    self.line_to(p);
                }
            }
        }
    }

    fn finish(mut self, offset_x: i32, offset_y: i32) -> Mask {
        self.close_contour();
        let data = self.buf.accumulate();
        Mask {
            width: self.buf_width(),
            height: self.buf_height(),
            data,
            offset_x,
            offset_y,
        }
    }

    fn buf_width(&self) -> u32 {
        self.buf.width() as u32
    }

    fn buf_height(&self) -> u32 {
        self.buf.height() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::Unit;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(Unit::from_f64_round_toward_zero(x).unwrap(), Unit::from_f64_round_toward_zero(y).unwrap())
    }

    #[test]
    fn empty_outline_yields_empty_mask() {
        let mask = rasterize(&[], Point::default(), &Segmenter::default());
        assert!(mask.is_empty());
    }

    #[test]
    fn closed_square_mask_is_covered_inside_and_clear_outside() {
        let outline = vec![
            OutlineSegment::MoveTo { to: pt(0.0, 0.0) },
            OutlineSegment::LineTo { to: pt(4.0, 0.0) },
            OutlineSegment::LineTo { to: pt(4.0, 4.0) },
            OutlineSegment::LineTo { to: pt(0.0, 4.0) },
        ];
        let mask = rasterize(&outline, Point::default(), &Segmenter::default());
        assert_eq!(mask.width, 4);
        assert_eq!(mask.height, 4);
        assert_eq!(mask.sample(1, 1), 255);
        assert_eq!(mask.sample(-1, 1), 0);
    }

    #[test]
    fn unclosed_contour_is_implicitly_closed() {
        // A triangle with no explicit return-to-start should still bound ink.
        let outline = vec![
            OutlineSegment::MoveTo { to: pt(0.0, 0.0) },
            OutlineSegment::LineTo { to: pt(4.0, 0.0) },
            OutlineSegment::LineTo { to: pt(0.0, 4.0) },
        ];
        let mask = rasterize(&outline, Point::default(), &Segmenter::default());
        assert!(mask.data.iter().any(|&v| v > 0));
    }

    #[test]
    fn line_to_with_no_prior_move_to_starts_at_origin() {
        let outline = vec![OutlineSegment::LineTo { to: pt(4.0, 4.0) }];
        let mask = rasterize(&outline, Point::default(), &Segmenter::default());
        // Degenerate: a single line contributes zero area once implicitly closed
        // back on itself, but rasterization must not panic.
        assert!(mask.width > 0 && mask.height > 0);
    }
}

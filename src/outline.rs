//! Vector outline path segments, as supplied by a [`crate::font::FontProvider`].

use crate::geom::Point;

/// One command in a glyph outline.
///
/// A contour begins with [`OutlineSegment::MoveTo`] and is implicitly closed
/// by the next `MoveTo` or by the end of the outline; callers never need an
/// explicit close command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineSegment {
    /// Start a new contour at `to`.
    MoveTo { to: Point },
    /// A straight line to `to`.
    LineTo { to: Point },
    /// A quadratic Bezier curve through control point `ctrl` to `to`.
    QuadTo { ctrl: Point, to: Point },
    /// A cubic Bezier curve through control points `c0`, `c1` to `to`.
    CubeTo { c0: Point, c1: Point, to: Point },
}

impl OutlineSegment {
    /// The segment's terminal point, used to track the current pen position
    /// while walking an outline.
    pub fn end_point(&self) -> Point {
        match *self {
            OutlineSegment::MoveTo { to }
            | OutlineSegment::LineTo { to }
            | OutlineSegment::QuadTo { to, .. }
            | OutlineSegment::CubeTo { to, .. } => to,
        }
    }
}

/// A glyph outline: an ordered sequence of [`OutlineSegment`]s forming zero or
/// more contours, in 26.6 fixed-point pixel coordinates.
pub type Outline = Vec<OutlineSegment>;

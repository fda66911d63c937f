//! Minimal geometry shared by outlines, masks and layout.

use crate::fixed::Unit;

/// A point in 26.6 fixed-point pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: Unit,
    pub y: Unit,
}

impl Point {
    /// Construct a point from fixed-point coordinates.
    pub const fn new(x: Unit, y: Unit) -> Point {
        Point { x, y }
    }

    /// Translate by `(dx, dy)`.
    pub fn translate(self, dx: Unit, dy: Unit) -> Point {
        Point::new(self.x.add(dx), self.y.add(dy))
    }
}

/// An axis-aligned rectangle with an integer-pixel origin and extent.
///
/// Used for measurement results and clipping bounds, where sub-pixel
/// precision no longer matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// The zero-sized rectangle at the origin.
    pub const ZERO: Rect = Rect { x: 0, y: 0, width: 0, height: 0 };

    /// Construct a rectangle.
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Rect {
        Rect { x, y, width, height }
    }

    /// `true` if this rectangle has no area.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// The exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }
}

//! Scanline coverage accumulator.
//!
//! [`EdgeBuffer`] holds one signed `f32` accumulator per pixel. Each line
//! segment contributes the horizontal extent it covers above itself within
//! every pixel cell it crosses, positive when the segment travels downward
//! and negative when it travels upward (the Y direction of travel gives the
//! non-zero winding sign). A final left-to-right running sum per row turns
//! these signed deltas into coverage: `accumulate` is where that scanline
//! pass happens.

/// Per-pixel signed coverage accumulator for one glyph rasterization pass.
pub struct EdgeBuffer {
    width: usize,
    height: usize,
    // One extra slot of headroom absorbs the `x1i` contribution in `add_line`
    // landing exactly on the right edge of the last column.
    acc: Vec<f32>,
}

impl EdgeBuffer {
    /// Allocate a zeroed buffer for a `width x height` pixel grid.
    pub fn new(width: u32, height: u32) -> EdgeBuffer {
        let width = width as usize;
        let height = height as usize;
        EdgeBuffer { width, height, acc: vec![0.0; width * height + 1] }
    }

    /// The buffer's pixel width.
    pub fn width(&self) -> u32 {
        self.width as u32
    }

    /// The buffer's pixel height.
    pub fn height(&self) -> u32 {
        self.height as u32
    }

    fn add(&mut self, index: usize, delta: f32) {
        if let Some(slot) = self.acc.get_mut(index) {
            *slot += delta;
        }
    }

    /// Mark a line segment from `p0` to `p1`, in buffer-local pixel space
    /// (i.e. `(0.0, 0.0)` is the buffer's top-left corner).
    ///
    /// Horizontal lines contribute no coverage and are skipped. Input
    /// coordinates may lie outside `[0, width) x [0, height)`; contributions
    /// that fall outside the buffer are silently clipped.
    pub fn add_line(&mut self, p0: (f64, f64), p1: (f64, f64)) {
        if (p0.1 - p1.1).abs() < f64::EPSILON {
            return;
        }

        let (dir, p0, p1) = if p0.1 < p1.1 { (1.0, p0, p1) } else { (-1.0, p1, p0) };
        let dxdy = (p1.0 - p0.0) / (p1.1 - p0.1);
        let mut x = p0.0;

        let y_start = p0.1.max(0.0) as usize;
        let y_end = self.height.min(p1.1.ceil().max(0.0) as usize);
        if p0.1 < 0.0 {
            x -= p0.1 * dxdy;
        }

        for y in y_start..y_end {
            let row = y * self.width;
            let dy = ((y + 1) as f64).min(p1.1) - (y as f64).max(p0.1);
            let x_next = x + dxdy * dy;
            let delta = (dy * dir) as f32;

            let (xa, xb) = if x < x_next { (x, x_next) } else { (x_next, x) };
            let xa_floor = xa.floor();
            let xa_i = xa_floor as i64;
            let xb_ceil = xb.ceil();
            let xb_i = xb_ceil as i64;

            if xb_i <= xa_i + 1 {
                // Entire sub-segment lives within one column.
                let mid_frac = 0.5 * (x + x_next) - xa_floor;
                self.add_col(row, xa_i, delta - delta * mid_frac as f32);
                self.add_col(row, xa_i + 1, delta * mid_frac as f32);
            } else {
                let span = (xb - xa).recip();
                let xa_frac = xa - xa_floor;
                let a0 = 0.5 * span * (1.0 - xa_frac) * (1.0 - xa_frac);
                let xb_frac = xb - xb_ceil + 1.0;
                let a_last = 0.5 * span * xb_frac * xb_frac;

                self.add_col(row, xa_i, delta * a0 as f32);
                if xb_i == xa_i + 2 {
                    self.add_col(row, xa_i + 1, delta * (1.0 - a0 - a_last) as f32);
                } else {
                    let a1 = span * (1.5 - xa_frac);
                    self.add_col(row, xa_i + 1, delta * (a1 - a0) as f32);
                    for xi in (xa_i + 2)..(xb_i - 1) {
                        self.add_col(row, xi, delta * span as f32);
                    }
                    let a2 = a1 + (xb_i - xa_i - 3) as f64 * span;
                    self.add_col(row, xb_i - 1, delta * (1.0 - a2 - a_last) as f32);
                }
                self.add_col(row, xb_i, delta * a_last as f32);
            }

            x = x_next;
        }
    }

    fn add_col(&mut self, row: usize, col: i64, delta: f32) {
        if col < 0 || col as usize >= self.width {
            return;
        }
        self.add(row + col as usize, delta);
    }

    /// Run the left-to-right scanline pass: a running sum of the signed
    /// deltas per row, with the running absolute value clamped to
    /// `[0, 255]`. This implements the non-zero winding fill rule.
    pub fn accumulate(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width * self.height);
        for row in 0..self.height {
            let mut running = 0.0f32;
            let base = row * self.width;
            for col in 0..self.width {
                running += self.acc[base + col];
                out.push((255.0 * running.abs().min(1.0)) as u8);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_line_covers_full_row_to_its_right() {
        // A line straight down the left edge of column 2 should leave
        // columns to its right fully covered and columns to its left empty.
        let mut buf = EdgeBuffer::new(4, 1);
        buf.add_line((2.0, 0.0), (2.0, 1.0));
        let out = buf.accumulate();
        assert_eq!(out, vec![0, 0, 255, 255]);
    }

    #[test]
    fn closed_square_fully_covers_its_interior() {
        let mut buf = EdgeBuffer::new(4, 4);
        buf.add_line((1.0, 1.0), (1.0, 3.0));
        buf.add_line((1.0, 3.0), (3.0, 3.0));
        buf.add_line((3.0, 3.0), (3.0, 1.0));
        buf.add_line((3.0, 1.0), (1.0, 1.0));
        let out = buf.accumulate();
        for y in 1..3 {
            for x in 1..3 {
                assert_eq!(out[y * 4 + x], 255, "pixel ({x},{y})");
            }
        }
        assert_eq!(out[0], 0);
    }

    #[test]
    fn horizontal_line_contributes_nothing() {
        let mut buf = EdgeBuffer::new(4, 4);
        buf.add_line((0.0, 2.0), (4.0, 2.0));
        assert!(buf.accumulate().iter().all(|&v| v == 0));
    }

    #[test]
    fn out_of_bounds_contributions_are_clipped_not_panicking() {
        let mut buf = EdgeBuffer::new(2, 2);
        buf.add_line((-10.0, -10.0), (10.0, 10.0));
        let _ = buf.accumulate();
    }
}

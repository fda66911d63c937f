//! The driver that measures, wraps and draws text.

use std::sync::Arc;

use unicode_segmentation::UnicodeSegmentation;

use crate::cache::{CacheHandler, MaskCache};
use crate::error::RasterError;
use crate::fixed::Unit;
use crate::geom::{Point, Rect};
use crate::layout::align::{Direction, HorizontalAlign, VerticalAlign};
use crate::layout::state::RendererState;
use crate::mask::Mask;
use crate::target::{Blitter, Rgba, Target};

/// The opaque tag folded into every cache signature this engine produces.
/// Distinct engines sharing one cache should use distinct tags if they must
/// never alias each other's masks even when every other parameter matches.
const DEFAULT_USER_TAG: u8 = 0;

/// Traverses text, manages subpixel quantization, computes per-glyph
/// origins with kerning/advance, talks to the mask cache, and emits glyph
/// masks at the right positions for measurement, line wrapping, and
/// drawing.
///
/// Not thread-safe — see [`CacheHandler`]'s own docs. A single [`MaskCache`]
/// may back many engines.
pub struct LayoutEngine<'a> {
    state: RendererState,
    cache_handler: CacheHandler<'a>,
}

struct Placement {
    glyph_index: u16,
    visible: bool,
    pen_x: Unit,
}

impl<'a> LayoutEngine<'a> {
    /// Build an engine over `state`, backed by `cache`.
    pub fn new(state: RendererState, cache: &'a MaskCache) -> LayoutEngine<'a> {
        LayoutEngine { state, cache_handler: CacheHandler::new(cache) }
    }

    /// Mutable access to the configuration bag, for setter calls between
    /// draws.
    pub fn state_mut(&mut self) -> &mut RendererState {
        &mut self.state
    }

    pub fn state(&self) -> &RendererState {
        &self.state
    }

    // ---- measurement --------------------------------------------------

    /// `measure(text) -> Rect`: the origin-zero bounding rectangle of the
    /// longest line's quantized width and the block's total quantized
    /// vertical extent. Empty input yields the zero rect.
    pub fn measure(&self, text: &str) -> Rect {
        if text.is_empty() {
            return Rect::ZERO;
        }
        let lines: Vec<&str> = text.split('\n').collect();
        self.measure_lines(&lines)
    }

    /// As [`LayoutEngine::measure`], but lines exceeding `max_width` are
    /// broken at the most recent space, or (if the first word itself
    /// overflows) after the last character that fits. Trailing spaces at a
    /// wrap point are dropped and do not widen the line.
    pub fn measure_with_wrap(&self, text: &str, max_width: Unit) -> Rect {
        if text.is_empty() {
            return Rect::ZERO;
        }
        let wrapped = self.wrap_into_lines(text, max_width);
        let refs: Vec<&str> = wrapped.iter().map(String::as_str).collect();
        self.measure_lines(&refs)
    }

    /// Wrap `text` into lines no wider than `max_width`, inserting `'\n'` at
    /// each chosen break point. Existing `'\n'`s in `text` are preserved as
    /// paragraph boundaries.
    pub fn wrap_text(&self, text: &str, max_width: Unit) -> String {
        self.wrap_into_lines(text, max_width).join("\n")
    }

    fn measure_lines(&self, lines: &[&str]) -> Rect {
        let mut max_width = Unit::ZERO;
        let mut height = self.state.quantization.quantize_y(self.state.sizer().ascent(self.state.font(), self.state.size_px));

        for (i, line) in lines.iter().enumerate() {
            let (_, width) = self.place_line(line);
            max_width = Unit::from_raw(max_width.0.max(width.0));
            if i + 1 < lines.len() {
                height = height.add(
                    self.state
                        .quantization
                        .quantize_y(self.state.sizer().line_advance(self.state.font(), self.state.size_px, (i + 1) as u32)),
                );
            }
        }
        height = height.add(self.state.quantization.quantize_y(self.state.sizer().descent(self.state.font(), self.state.size_px)));

        Rect::new(0, 0, max_width.to_int_ceil().max(0) as u32, height.to_int_ceil().max(0) as u32)
    }

    // ---- drawing --------------------------------------------------------

    /// `draw(target, text, x, y)`: render `text` positioned relative to
    /// `(x, y)` per the engine's current alignment. Empty input is a no-op.
    ///
    /// Propagates a [`RasterError`] if the font returns a malformed outline;
    /// a missing glyph goes through the configured miss handler instead (by
    /// default, panicking).
    pub fn draw(&mut self, target: &mut dyn Target, text: &str, x: i32, y: i32) -> Result<(), RasterError> {
        if text.is_empty() {
            return Ok(());
        }
        self.cache_handler.notify_font_change(self.state.font().stable_font_id());
        self.cache_handler.notify_rasterizer_change(self.state.rasterizer().cache_signature(DEFAULT_USER_TAG));
        self.cache_handler.notify_size_change(self.state.size_px);

        let lines: Vec<&str> = text.split('\n').collect();
        let ascent = self.state.quantization.quantize_y(self.state.sizer().ascent(self.state.font(), self.state.size_px));
        let descent = self.state.quantization.quantize_y(self.state.sizer().descent(self.state.font(), self.state.size_px));

        let mut line_advances = Vec::with_capacity(lines.len().saturating_sub(1));
        for i in 1..lines.len() {
            line_advances.push(
                self.state
                    .quantization
                    .quantize_y(self.state.sizer().line_advance(self.state.font(), self.state.size_px, i as u32)),
            );
        }
        let total_block_height = ascent.add(line_advances.iter().fold(Unit::ZERO, |a, &b| a.add(b))).add(descent);

        let metrics = self.state.font().metrics(self.state.size_px);

        let mut first_baseline = match self.state.align.vertical {
            VerticalAlign::Top => Unit::from_int(y).add(ascent),
            VerticalAlign::Baseline => Unit::from_int(y),
            VerticalAlign::VertCenter => Unit::from_int(y).sub(total_block_height.scale(1, 2)).add(ascent),
            VerticalAlign::Bottom => {
                let sum_advances = line_advances.iter().fold(Unit::ZERO, |a, &b| a.add(b));
                Unit::from_int(y).sub(descent).sub(sum_advances)
            }
            VerticalAlign::LastBaseline => {
                let sum_advances = line_advances.iter().fold(Unit::ZERO, |a, &b| a.add(b));
                Unit::from_int(y).sub(sum_advances)
            }
            VerticalAlign::CapLine => Unit::from_int(y).add(metrics.cap_height),
            VerticalAlign::Midline => Unit::from_int(y).add(metrics.x_height),
        };
        first_baseline = self.state.quantization.quantize_y(first_baseline);

        let mut baseline = first_baseline;
        let bounds = target.bounds();

        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                baseline = baseline.add(line_advances[i - 1]);
            }

            let baseline_top = baseline.sub(ascent);
            let baseline_bottom = baseline.add(descent);
            if baseline_bottom.to_int_ceil() < bounds.y || baseline_top.to_int_floor() > bounds.bottom() {
                continue;
            }

            self.draw_line(target, line, x, baseline)?;
        }
        Ok(())
    }

    fn draw_line(&mut self, target: &mut dyn Target, line: &str, x: i32, baseline: Unit) -> Result<(), RasterError> {
        let (placements, total_width) = self.place_line(line);
        let min_pen = if self.state.direction == Direction::RightToLeft { total_width.neg() } else { Unit::ZERO };
        let adjustment = match self.state.align.horizontal {
            HorizontalAlign::Left => Unit::ZERO,
            HorizontalAlign::Right => total_width.neg(),
            HorizontalAlign::Center => total_width.scale(1, 2).neg(),
        };
        let base_x = Unit::from_int(x).sub(min_pen).add(adjustment);

        for placement in placements {
            if !placement.visible {
                continue;
            }
            let abs_x = self.state.quantization.quantize_x(base_x.add(placement.pen_x));
            let (int_x, frac_x) = abs_x.split();
            let (int_y, frac_y) = baseline.split();

            let fractional = Point::new(frac_x, frac_y);
            let mask = self.mask_for(placement.glyph_index, fractional)?;

            let draw_fn = self.state.draw_fn.as_ref();
            match draw_fn {
                Some(f) => f(target, &mask, int_x, int_y, self.state.color, self.state.blend_mode),
                None => Blitter::blit(target, &mask, int_x, int_y, self.state.color, self.state.blend_mode),
            }
        }
        Ok(())
    }

    fn mask_for(&mut self, glyph_index: u16, fractional: Point) -> Result<Arc<Mask>, RasterError> {
        self.cache_handler.notify_fract_change(fractional);
        if let Some(mask) = self.cache_handler.get_mask(glyph_index) {
            return Ok(mask);
        }
        let outline = self.state.font().load_outline(glyph_index, self.state.size_px)?;
        let mask = self.state.rasterizer().rasterize(&outline, fractional);
        self.cache_handler.put_mask(glyph_index, mask.clone());
        Ok(Arc::new(mask))
    }

    // ---- shared glyph walk ---------------------------------------------

    fn resolve_glyph(&self, code_point: char) -> (u16, bool) {
        match self.state.font().glyph_index(code_point) {
            Some(glyph_index) => (glyph_index, true),
            None => self.state.miss_handler.resolve(self.state.font(), code_point),
        }
    }

    fn quantized_advance(&self, glyph_index: u16) -> Unit {
        let raw = self.state.scale_horizontal(self.state.sizer().advance(self.state.font(), glyph_index, self.state.size_px));
        self.state.quantization.quantize_x(raw)
    }

    fn quantized_kern(&self, prev_glyph_index: u16, glyph_index: u16) -> Unit {
        let raw = self
            .state
            .scale_horizontal(self.state.sizer().kern(self.state.font(), prev_glyph_index, glyph_index, self.state.size_px));
        self.state.quantization.quantize_x(raw)
    }

    /// Walk one line's code points (excluding any `'\n'`), producing each
    /// glyph's relative pen position and the line's total signed width.
    ///
    /// LTR accumulates kern then advance per glyph; RTL mirrors this,
    /// accumulating advance then kern (see the layout engine's draw
    /// contract), so RTL positions are negative, growing toward `-width`.
    fn place_line(&self, line: &str) -> (Vec<Placement>, Unit) {
        let mut placements = Vec::new();
        let mut pen_x = Unit::ZERO;
        let mut prev_glyph: Option<u16> = None;

        for code_point in line.chars() {
            let (glyph_index, visible) = self.resolve_glyph(code_point);

            let pen_at_glyph = if self.state.direction == Direction::RightToLeft {
                pen_x = pen_x.sub(self.quantized_advance(glyph_index));
                if let Some(prev) = prev_glyph {
                    pen_x = pen_x.sub(self.quantized_kern(prev, glyph_index));
                }
                pen_x
            } else {
                if let Some(prev) = prev_glyph {
                    pen_x = pen_x.add(self.quantized_kern(prev, glyph_index));
                }
                let at = pen_x;
                pen_x = pen_x.add(self.quantized_advance(glyph_index));
                at
            };

            placements.push(Placement { glyph_index, visible, pen_x: pen_at_glyph });
            prev_glyph = Some(glyph_index);
        }

        let total_width = Unit::from_raw(pen_x.raw().abs());
        (placements, total_width)
    }

    // ---- wrapping --------------------------------------------------------

    fn wrap_into_lines(&self, text: &str, max_width: Unit) -> Vec<String> {
        let mut lines = Vec::new();
        for paragraph in text.split('\n') {
            self.wrap_paragraph(paragraph, max_width, &mut lines);
        }
        lines
    }

    /// Break `paragraph` into lines no wider than `max_width`.
    ///
    /// Units are grapheme clusters (via `unicode-segmentation`), so a
    /// multi-codepoint cluster never splits across a line; each cluster's
    /// width is the sum of its constituent code points' quantized
    /// kern+advance, matching [`LayoutEngine::place_line`]'s per-glyph walk.
    fn wrap_paragraph(&self, paragraph: &str, max_width: Unit, lines: &mut Vec<String>) {
        let units: Vec<(usize, &str)> = paragraph.grapheme_indices(true).collect();
        if units.is_empty() {
            lines.push(String::new());
            return;
        }

        let mut i = 0usize;
        while i < units.len() {
            let mut width = Unit::ZERO;
            let mut prev_glyph: Option<u16> = None;
            let mut last_space: Option<usize> = None;
            let mut fit_end = i;
            let mut j = i;

            while j < units.len() {
                let (_, grapheme) = units[j];
                let mut candidate = width;
                let mut last_glyph = prev_glyph;
                for ch in grapheme.chars() {
                    let (glyph_index, _) = self.resolve_glyph(ch);
                    if let Some(prev) = last_glyph {
                        candidate = candidate.add(self.quantized_kern(prev, glyph_index));
                    }
                    candidate = candidate.add(self.quantized_advance(glyph_index));
                    last_glyph = Some(glyph_index);
                }

                if candidate.0 > max_width.0 && j > i {
                    break;
                }
                width = candidate;
                prev_glyph = last_glyph;
                fit_end = j + 1;
                if grapheme == " " {
                    last_space = Some(j);
                }
                j += 1;
            }

            let break_at = if j >= units.len() {
                units.len()
            } else if let Some(space_idx) = last_space {
                space_idx
            } else {
                fit_end.max(i + 1)
            };
            let break_at = break_at.clamp(i + 1, units.len());

            let end_byte = units.get(break_at).map(|&(b, _)| b).unwrap_or(paragraph.len());
            let start_byte = units[i].0;
            let line = paragraph[start_byte..end_byte].trim_end_matches(' ');
            lines.push(line.to_string());

            let mut next = break_at;
            if next < units.len() && units[next].1 == " " {
                next += 1;
            }
            i = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{estimate_alpha_mask, MaskCache, MIN_CAPACITY};
    use crate::error::RasterError as RErr;
    use crate::font::{FontMetrics, FontProvider};
    use crate::outline::Outline;
    use crate::raster::EdgeMarkerRasterizer;

    struct MonoFont;

    impl FontProvider for MonoFont {
        fn glyph_index(&self, code_point: char) -> Option<u16> {
            if code_point == '\u{FFFF}' {
                None
            } else {
                Some(code_point as u16)
            }
        }

        fn load_outline(&self, _glyph_index: u16, _size_px: Unit) -> Result<Outline, RErr> {
            Ok(vec![
                crate::outline::OutlineSegment::MoveTo { to: Point::new(Unit::from_int(1), Unit::from_int(1)) },
                crate::outline::OutlineSegment::LineTo { to: Point::new(Unit::from_int(9), Unit::from_int(1)) },
                crate::outline::OutlineSegment::LineTo { to: Point::new(Unit::from_int(9), Unit::from_int(9)) },
                crate::outline::OutlineSegment::LineTo { to: Point::new(Unit::from_int(1), Unit::from_int(9)) },
            ])
        }

        fn advance(&self, _glyph_index: u16, _size_px: Unit) -> Unit {
            Unit::from_int(10)
        }

        fn kern(&self, _prev: u16, _curr: u16, _size_px: Unit) -> Unit {
            Unit::ZERO
        }

        fn metrics(&self, _size_px: Unit) -> FontMetrics {
            FontMetrics {
                ascent: Unit::from_int(12),
                descent: Unit::from_int(4),
                line_height: Unit::from_int(16),
                cap_height: Unit::from_int(9),
                x_height: Unit::from_int(6),
            }
        }

        fn stable_font_id(&self) -> u64 {
            42
        }
    }

    struct Buffer {
        width: u32,
        height: u32,
        pixels: Vec<Rgba>,
    }

    impl Buffer {
        fn new(width: u32, height: u32) -> Buffer {
            Buffer { width, height, pixels: vec![Rgba::default(); (width * height) as usize] }
        }
    }

    impl Target for Buffer {
        fn bounds(&self) -> Rect {
            Rect::new(0, 0, self.width, self.height)
        }

        fn get_pixel(&self, x: i32, y: i32) -> Rgba {
            self.pixels[(y as u32 * self.width + x as u32) as usize]
        }

        fn set_pixel(&mut self, x: i32, y: i32, color: Rgba) {
            self.pixels[(y as u32 * self.width + x as u32) as usize] = color;
        }
    }

    fn engine(cache: &MaskCache) -> LayoutEngine<'_> {
        let state = RendererState::new(Box::new(MonoFont), Box::new(EdgeMarkerRasterizer::default()), Unit::from_int(10));
        LayoutEngine::new(state, cache)
    }

    #[test]
    fn measure_empty_text_is_zero_rect() {
        let _ = env_logger::try_init();
        let cache = MaskCache::new(MIN_CAPACITY, estimate_alpha_mask).unwrap();
        let e = engine(&cache);
        assert_eq!(e.measure(""), Rect::ZERO);
    }

    #[test]
    fn measure_single_line_width_is_sum_of_advances() {
        let cache = MaskCache::new(MIN_CAPACITY, estimate_alpha_mask).unwrap();
        let e = engine(&cache);
        let rect = e.measure("AB");
        assert_eq!(rect.width, 20);
    }

    #[test]
    fn measure_multiline_height_grows_by_line_advance_per_break() {
        let cache = MaskCache::new(MIN_CAPACITY, estimate_alpha_mask).unwrap();
        let e = engine(&cache);
        let one_line = e.measure("A");
        let two_lines = e.measure("A\nB");
        assert_eq!(two_lines.height, one_line.height + 16);
    }

    #[test]
    fn wrap_breaks_at_the_last_space_and_drops_it() {
        let cache = MaskCache::new(MIN_CAPACITY, estimate_alpha_mask).unwrap();
        let e = engine(&cache);
        // Each glyph advances 10px; max_width 25 fits two glyphs ("AB") but not
        // a trailing space before "C".
        let wrapped = e.wrap_text("AB C", Unit::from_int(25));
        assert_eq!(wrapped, "AB\nC");
    }

    #[test]
    fn wrap_breaks_mid_word_when_the_first_word_overflows() {
        let cache = MaskCache::new(MIN_CAPACITY, estimate_alpha_mask).unwrap();
        let e = engine(&cache);
        let wrapped = e.wrap_text("ABCDE", Unit::from_int(25));
        assert_eq!(wrapped, "AB\nCD\nE");
    }

    #[test]
    fn draw_top_left_places_first_glyph_ascent_below_origin() {
        let cache = MaskCache::new(MIN_CAPACITY, estimate_alpha_mask).unwrap();
        let mut e = engine(&cache);
        let mut buf = Buffer::new(20, 20);
        e.draw(&mut buf, "A", 0, 0).unwrap();
        // Top align puts the baseline at ascent (12px); the glyph spans y in
        // [1,9) of its own outline, so some ink should land inside the buffer.
        assert!(buf.pixels.iter().any(|p| p.a > 0));
    }

    #[test]
    fn draw_is_a_no_op_for_empty_text() {
        let cache = MaskCache::new(MIN_CAPACITY, estimate_alpha_mask).unwrap();
        let mut e = engine(&cache);
        let mut buf = Buffer::new(4, 4);
        e.draw(&mut buf, "", 0, 0).unwrap();
        assert!(buf.pixels.iter().all(|p| p.a == 0));
    }

    #[test]
    fn rtl_direction_produces_mirrored_positions_of_ltr() {
        let cache = MaskCache::new(MIN_CAPACITY, estimate_alpha_mask).unwrap();
        let mut e = engine(&cache);
        e.state_mut().set_direction(crate::layout::align::Direction::RightToLeft);
        let (_, width) = e.place_line("AB");
        assert_eq!(width, Unit::from_int(20));
    }
}

//! Advance, kerning and line-metrics policies.
//!
//! A [`Sizer`] is immutable for the duration of a `draw`/`measure` call and
//! is the single seam through which callers override what a font's own
//! metrics would otherwise dictate — most commonly to pad glyph spacing for
//! a faux-bold rasterizer, which does not grow advances on its own (see
//! [`crate::raster::faux`]).

use crate::fixed::Unit;
use crate::font::FontProvider;

/// Computes advance, kerning, and line metrics for a font at a given pixel
/// size. See the module docs for why this is a separate seam from
/// [`FontProvider`] itself.
pub trait Sizer {
    /// The glyph's horizontal advance.
    fn advance(&self, font: &dyn FontProvider, glyph_index: u16, size_px: Unit) -> Unit;

    /// The kerning adjustment between two consecutive glyphs.
    fn kern(&self, font: &dyn FontProvider, prev_glyph_index: u16, curr_glyph_index: u16, size_px: Unit) -> Unit;

    /// The font's nominal line height.
    fn line_height(&self, font: &dyn FontProvider, size_px: Unit) -> Unit;

    /// The vertical advance for the `nth_consecutive_break`-th line break in
    /// an unbroken run of breaks (`1` for the first, `2` for the next
    /// immediately following it, and so on). The shipped variants all
    /// return a constant `line_height()` regardless of `nth_consecutive_break`;
    /// the parameter exists for custom sizers that want extra paragraph
    /// spacing on repeated blank lines.
    fn line_advance(&self, font: &dyn FontProvider, size_px: Unit, nth_consecutive_break: u32) -> Unit;

    /// The font's ascent.
    fn ascent(&self, font: &dyn FontProvider, size_px: Unit) -> Unit;

    /// The font's descent.
    fn descent(&self, font: &dyn FontProvider, size_px: Unit) -> Unit;
}

/// Delegates every query straight to the font's own metrics and kerning
/// tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSizer;

impl Sizer for DefaultSizer {
    fn advance(&self, font: &dyn FontProvider, glyph_index: u16, size_px: Unit) -> Unit {
        font.advance(glyph_index, size_px)
    }

    fn kern(&self, font: &dyn FontProvider, prev_glyph_index: u16, curr_glyph_index: u16, size_px: Unit) -> Unit {
        font.kern(prev_glyph_index, curr_glyph_index, size_px)
    }

    fn line_height(&self, font: &dyn FontProvider, size_px: Unit) -> Unit {
        font.metrics(size_px).line_height
    }

    fn line_advance(&self, font: &dyn FontProvider, size_px: Unit, _nth_consecutive_break: u32) -> Unit {
        self.line_height(font, size_px)
    }

    fn ascent(&self, font: &dyn FontProvider, size_px: Unit) -> Unit {
        font.metrics(size_px).ascent
    }

    fn descent(&self, font: &dyn FontProvider, size_px: Unit) -> Unit {
        font.metrics(size_px).descent
    }
}

/// As [`DefaultSizer`], but kerning is always zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoKernSizer;

impl Sizer for NoKernSizer {
    fn advance(&self, font: &dyn FontProvider, glyph_index: u16, size_px: Unit) -> Unit {
        DefaultSizer.advance(font, glyph_index, size_px)
    }

    fn kern(&self, _font: &dyn FontProvider, _prev_glyph_index: u16, _curr_glyph_index: u16, _size_px: Unit) -> Unit {
        Unit::ZERO
    }

    fn line_height(&self, font: &dyn FontProvider, size_px: Unit) -> Unit {
        DefaultSizer.line_height(font, size_px)
    }

    fn line_advance(&self, font: &dyn FontProvider, size_px: Unit, nth: u32) -> Unit {
        DefaultSizer.line_advance(font, size_px, nth)
    }

    fn ascent(&self, font: &dyn FontProvider, size_px: Unit) -> Unit {
        DefaultSizer.ascent(font, size_px)
    }

    fn descent(&self, font: &dyn FontProvider, size_px: Unit) -> Unit {
        DefaultSizer.descent(font, size_px)
    }
}

/// Every glyph advances by the same constant; kerning is always zero.
/// Pairs naturally with monospaced layout.
#[derive(Debug, Clone, Copy)]
pub struct FixedAdvanceSizer {
    pub advance: Unit,
}

impl Sizer for FixedAdvanceSizer {
    fn advance(&self, _font: &dyn FontProvider, _glyph_index: u16, _size_px: Unit) -> Unit {
        self.advance
    }

    fn kern(&self, _font: &dyn FontProvider, _prev_glyph_index: u16, _curr_glyph_index: u16, _size_px: Unit) -> Unit {
        Unit::ZERO
    }

    fn line_height(&self, font: &dyn FontProvider, size_px: Unit) -> Unit {
        DefaultSizer.line_height(font, size_px)
    }

    fn line_advance(&self, font: &dyn FontProvider, size_px: Unit, nth: u32) -> Unit {
        DefaultSizer.line_advance(font, size_px, nth)
    }

    fn ascent(&self, font: &dyn FontProvider, size_px: Unit) -> Unit {
        DefaultSizer.ascent(font, size_px)
    }

    fn descent(&self, font: &dyn FontProvider, size_px: Unit) -> Unit {
        DefaultSizer.descent(font, size_px)
    }
}

/// [`DefaultSizer`] plus a constant added to every kerning value. Useful for
/// loosening tightly-kerned faces.
#[derive(Debug, Clone, Copy)]
pub struct PaddedKernSizer {
    pub pad: Unit,
}

impl Sizer for PaddedKernSizer {
    fn advance(&self, font: &dyn FontProvider, glyph_index: u16, size_px: Unit) -> Unit {
        DefaultSizer.advance(font, glyph_index, size_px)
    }

    fn kern(&self, font: &dyn FontProvider, prev_glyph_index: u16, curr_glyph_index: u16, size_px: Unit) -> Unit {
        DefaultSizer.kern(font, prev_glyph_index, curr_glyph_index, size_px).add(self.pad)
    }

    fn line_height(&self, font: &dyn FontProvider, size_px: Unit) -> Unit {
        DefaultSizer.line_height(font, size_px)
    }

    fn line_advance(&self, font: &dyn FontProvider, size_px: Unit, nth: u32) -> Unit {
        DefaultSizer.line_advance(font, size_px, nth)
    }

    fn ascent(&self, font: &dyn FontProvider, size_px: Unit) -> Unit {
        DefaultSizer.ascent(font, size_px)
    }

    fn descent(&self, font: &dyn FontProvider, size_px: Unit) -> Unit {
        DefaultSizer.descent(font, size_px)
    }
}

/// [`DefaultSizer`] plus a constant added to every advance. The paired
/// collaborator for a faux-bold rasterizer, which widens a glyph's ink
/// without touching its advance.
#[derive(Debug, Clone, Copy)]
pub struct PaddedAdvanceSizer {
    pub pad: Unit,
}

impl Sizer for PaddedAdvanceSizer {
    fn advance(&self, font: &dyn FontProvider, glyph_index: u16, size_px: Unit) -> Unit {
        DefaultSizer.advance(font, glyph_index, size_px).add(self.pad)
    }

    fn kern(&self, font: &dyn FontProvider, prev_glyph_index: u16, curr_glyph_index: u16, size_px: Unit) -> Unit {
        DefaultSizer.kern(font, prev_glyph_index, curr_glyph_index, size_px)
    }

    fn line_height(&self, font: &dyn FontProvider, size_px: Unit) -> Unit {
        DefaultSizer.line_height(font, size_px)
    }

    fn line_advance(&self, font: &dyn FontProvider, size_px: Unit, nth: u32) -> Unit {
        DefaultSizer.line_advance(font, size_px, nth)
    }

    fn ascent(&self, font: &dyn FontProvider, size_px: Unit) -> Unit {
        DefaultSizer.ascent(font, size_px)
    }

    fn descent(&self, font: &dyn FontProvider, size_px: Unit) -> Unit {
        DefaultSizer.descent(font, size_px)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RasterError;
    use crate::outline::Outline;

    struct StubFont;

    impl FontProvider for StubFont {
        fn glyph_index(&self, code_point: char) -> Option<u16> {
            Some(code_point as u16)
        }

        fn load_outline(&self, _glyph_index: u16, _size_px: Unit) -> Result<Outline, RasterError> {
            Ok(Vec::new())
        }

        fn advance(&self, _glyph_index: u16, _size_px: Unit) -> Unit {
            Unit::from_int(10)
        }

        fn kern(&self, _prev: u16, _curr: u16, _size_px: Unit) -> Unit {
            Unit::from_int(1)
        }

        fn metrics(&self, _size_px: Unit) -> crate::font::FontMetrics {
            crate::font::FontMetrics {
                ascent: Unit::from_int(12),
                descent: Unit::from_int(4),
                line_height: Unit::from_int(16),
                cap_height: Unit::from_int(9),
                x_height: Unit::from_int(6),
            }
        }

        fn stable_font_id(&self) -> u64 {
            1
        }
    }

    #[test]
    fn no_kern_sizer_zeros_kerning_but_keeps_advance() {
        let font = StubFont;
        let sizer = NoKernSizer;
        assert_eq!(sizer.kern(&font, 1, 2, Unit::from_int(16)), Unit::ZERO);
        assert_eq!(sizer.advance(&font, 1, Unit::from_int(16)), Unit::from_int(10));
    }

    #[test]
    fn fixed_advance_sizer_ignores_font_advance() {
        let font = StubFont;
        let sizer = FixedAdvanceSizer { advance: Unit::from_int(20) };
        assert_eq!(sizer.advance(&font, 1, Unit::from_int(16)), Unit::from_int(20));
        assert_eq!(sizer.kern(&font, 1, 2, Unit::from_int(16)), Unit::ZERO);
    }

    #[test]
    fn padded_kern_sizer_adds_constant() {
        let font = StubFont;
        let sizer = PaddedKernSizer { pad: Unit::from_int(2) };
        assert_eq!(sizer.kern(&font, 1, 2, Unit::from_int(16)), Unit::from_int(3));
    }

    #[test]
    fn padded_advance_sizer_adds_constant() {
        let font = StubFont;
        let sizer = PaddedAdvanceSizer { pad: Unit::from_int(5) };
        assert_eq!(sizer.advance(&font, 1, Unit::from_int(16)), Unit::from_int(15));
    }

    #[test]
    fn line_advance_ignores_nth_by_default() {
        let font = StubFont;
        let sizer = DefaultSizer;
        let size = Unit::from_int(16);
        assert_eq!(sizer.line_advance(&font, size, 1), sizer.line_advance(&font, size, 2));
    }
}

//! Alignment, direction, and quantization policy types.

use crate::error::ConfigError;
use crate::fixed::Unit;
use crate::font::FontProvider;

/// Horizontal anchor: how `x` relates to a line's own extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical anchor: how `y` relates to the text block's own extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlign {
    #[default]
    Top,
    /// The font's cap-height anchor of the first line.
    CapLine,
    /// The font's x-height anchor of the first line.
    Midline,
    /// Centers the total measured block height at `y`.
    VertCenter,
    /// The first line's baseline.
    Baseline,
    /// The last line's baseline.
    LastBaseline,
    /// The last line's descent.
    Bottom,
}

/// Combined horizontal/vertical anchor for `draw`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Align {
    pub horizontal: HorizontalAlign,
    pub vertical: VerticalAlign,
}

/// The direction glyphs advance along a line.
///
/// This crate does not perform BiDi analysis or script shaping: `direction`
/// only controls which way the per-glyph advance/kern accounting runs. A
/// caller driving mixed-direction text is expected to have already split it
/// into directionally-uniform runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    LeftToRight,
    RightToLeft,
}

/// Subpixel rounding applied to positions before they become cache keys or
/// pen coordinates — the sole knob controlling subpixel rendering variation.
///
/// Each step must divide 64 evenly. `step == 1` disables quantization (every
/// fractional pixel renders and caches distinctly); `step == 64` collapses
/// all positions to whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantization {
    pub horizontal_step: u8,
    pub vertical_step: u8,
}

impl Quantization {
    /// No quantization: full subpixel precision on both axes.
    pub const NONE: Quantization = Quantization { horizontal_step: 1, vertical_step: 1 };

    /// Full quantization: both axes snap to whole pixels.
    pub const FULL: Quantization = Quantization { horizontal_step: 64, vertical_step: 64 };

    /// Construct a quantization policy, validating that both steps divide 64.
    pub fn new(horizontal_step: u8, vertical_step: u8) -> Result<Quantization, ConfigError> {
        Unit::validate_step(horizontal_step)?;
        Unit::validate_step(vertical_step)?;
        Ok(Quantization { horizontal_step, vertical_step })
    }

    pub fn quantize_x(&self, u: Unit) -> Unit {
        u.quantize_up(self.horizontal_step as i32)
    }

    pub fn quantize_y(&self, u: Unit) -> Unit {
        u.quantize_up(self.vertical_step as i32)
    }
}

impl Default for Quantization {
    fn default() -> Quantization {
        Quantization::NONE
    }
}

/// Resolves a code point with no glyph in the active font.
///
/// The default policy panics with a message identifying the code point,
/// treating a missing glyph as a programmer error rather than a recoverable
/// condition. [`MissHandler::notdef`] instead substitutes the font's
/// `.notdef` glyph (conventionally glyph index `0`) and keeps rendering.
pub struct MissHandler(Box<dyn Fn(&dyn FontProvider, char) -> (u16, bool)>);

impl MissHandler {
    /// Panic on any missing glyph (the default policy).
    pub fn panicking() -> MissHandler {
        MissHandler(Box::new(|_font, code_point| {
            log::error!("no glyph for code point U+{:04X}", code_point as u32);
            panic!("no glyph for code point U+{:04X}", code_point as u32)
        }))
    }

    /// Substitute the `.notdef` glyph and keep rendering.
    pub fn notdef() -> MissHandler {
        MissHandler(Box::new(|_font, _code_point| (0, true)))
    }

    /// Build a custom policy.
    pub fn custom(f: impl Fn(&dyn FontProvider, char) -> (u16, bool) + 'static) -> MissHandler {
        MissHandler(Box::new(f))
    }

    pub fn resolve(&self, font: &dyn FontProvider, code_point: char) -> (u16, bool) {
        (self.0)(font, code_point)
    }
}

impl Default for MissHandler {
    fn default() -> MissHandler {
        MissHandler::panicking()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantization_rejects_non_divisors_of_64() {
        assert!(Quantization::new(3, 1).is_err());
        assert!(Quantization::new(1, 64).is_ok());
    }

    #[test]
    fn quantize_full_snaps_to_whole_pixels() {
        let q = Quantization::FULL;
        let u = Unit::from_raw(100 * 64 + 32); // 100.5px
        assert_eq!(q.quantize_x(u).to_int_floor(), 101);
    }
}

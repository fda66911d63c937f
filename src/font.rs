//! The font collaborator this crate consumes but never implements.
//!
//! Font file parsing (`.ttf`/`.otf`, gzipped or not) lives entirely outside
//! this crate; a [`FontProvider`] is whatever the caller plugs in to answer
//! these queries.

use crate::error::RasterError;
use crate::fixed::Unit;
use crate::outline::Outline;

/// Font metrics at a given pixel size, in 26.6 fixed-point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FontMetrics {
    pub ascent: Unit,
    pub descent: Unit,
    pub line_height: Unit,
    pub cap_height: Unit,
    pub x_height: Unit,
}

/// Resolves code points to glyph indices and supplies outlines, metrics and
/// kerning at a given pixel size.
///
/// The core never parses font files directly: a separate collaborator opens
/// the font and implements this trait. Implementations are expected to be
/// cheap to query repeatedly — the layout engine calls these once per glyph
/// on a cache miss, never on a hit.
pub trait FontProvider {
    /// Resolve a Unicode code point to this font's glyph index, or `None` if
    /// the font has no glyph for it.
    fn glyph_index(&self, code_point: char) -> Option<u16>;

    /// Load the outline for `glyph_index` at `size_px`, in pixel-scaled 26.6
    /// coordinates ready for the rasterizer.
    fn load_outline(&self, glyph_index: u16, size_px: Unit) -> Result<Outline, RasterError>;

    /// The glyph's horizontal advance at `size_px`.
    fn advance(&self, glyph_index: u16, size_px: Unit) -> Unit;

    /// The kerning adjustment between two consecutive glyphs at `size_px`,
    /// or `Unit::ZERO` if the font has no kerning data for the pair.
    fn kern(&self, prev_glyph_index: u16, curr_glyph_index: u16, size_px: Unit) -> Unit;

    /// Font-wide metrics at `size_px`.
    fn metrics(&self, size_px: Unit) -> FontMetrics;

    /// An opaque identifier stable for the font's lifetime, used as lane 0
    /// of the cache key.
    fn stable_font_id(&self) -> u64;
}

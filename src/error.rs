//! Error types for configuration failures and fatal rasterization faults.
//!
//! Hot-path operations (`draw`, `measure`, cache `get`/`put`) never allocate an
//! error value for expected conditions: clipping is silent, a missing glyph
//! goes through the miss handler, and a full cache with no eviction candidate
//! simply skips caching. Only construction, setters and malformed outlines
//! produce an [`Error`] of one of the kinds below.

use thiserror::Error;

/// Errors raised while constructing or reconfiguring a component.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The requested cache capacity is below the 1024 byte minimum.
    #[error("cache capacity {0} is below the minimum of {min} bytes", min = crate::cache::MIN_CAPACITY)]
    CapacityTooSmall(u32),

    /// A quantization step must divide 64 evenly.
    #[error("quantization step {0} does not divide 64")]
    InvalidQuantizationStep(u8),

    /// A floating-point input was NaN, infinite, or out of the representable
    /// fixed-point range.
    #[error("value {0} is not representable as a fixed-point Unit")]
    NotRepresentable(f64),
}

/// Fatal errors surfaced from `draw`/`measure` when a collaborator misbehaves.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    /// The font provider returned an outline with no segments, or a curve
    /// whose control points are non-finite.
    #[error("malformed outline for glyph {glyph_index}")]
    MalformedOutline {
        /// The glyph index that produced the malformed outline.
        glyph_index: u16,
    },

    /// The font provider failed to resolve a code point and the configured
    /// miss handler chose not to substitute a replacement glyph.
    #[error("no glyph for code point U+{0:04X}")]
    MissingGlyph(u32),
}

//! textraster: outline glyph rasterization, mask caching and text layout core.
//!
//! This crate implements the hard engineering behind rendering vector-outlined
//! text glyphs into raster image buffers:
//!
//! - [`fixed`]: a 26.6 fixed-point number type used for every pen position.
//! - [`segment`]: adaptive flattening of quadratic/cubic curves into lines.
//! - [`raster`]: an edge-marking scanline rasterizer producing 8-bit alpha masks.
//! - [`cache`]: a size-bounded, thread-safe content-addressed mask cache.
//! - [`sizer`]: advance/kerning/line-metrics policies.
//! - [`layout`]: the driver that measures, wraps and draws text.
//! - [`target`]: the blitter that composites masks onto a caller-owned surface.
//!
//! Font file parsing, image encoding, windowing/GPU backends, text shaping and
//! BiDi analysis are deliberately out of scope: this crate consumes a
//! [`font::FontProvider`] and emits masks to a [`target::Target`] through a
//! pluggable blit function. See the module docs for the contract each
//! collaborator must uphold.

pub mod cache;
pub mod error;
pub mod fixed;
pub mod font;
pub mod geom;
pub mod layout;
pub mod mask;
pub mod outline;
pub mod raster;
pub mod segment;
pub mod sizer;
pub mod target;

pub use error::{ConfigError, RasterError};
pub use fixed::Unit;
pub use geom::{Point, Rect};
pub use mask::Mask;

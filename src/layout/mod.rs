//! The driver that measures, wraps and draws text.
//!
//! [`state::RendererState`] holds one renderer's configuration (font,
//! rasterizer, sizer, alignment, direction, quantization, color, blend mode);
//! [`engine::LayoutEngine`] owns a state bag plus a handle to a shared
//! [`crate::cache::MaskCache`] and implements measurement, word wrapping and
//! drawing against it.

pub mod align;
pub mod engine;
pub mod state;

pub use align::{Align, Direction, HorizontalAlign, MissHandler, Quantization, VerticalAlign};
pub use engine::LayoutEngine;
pub use state::RendererState;

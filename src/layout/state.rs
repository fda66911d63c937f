//! The renderer's configuration bag.

use crate::fixed::Unit;
use crate::font::FontProvider;
use crate::layout::align::{Align, Direction, MissHandler, Quantization};
use crate::mask::Mask;
use crate::raster::Rasterizer;
use crate::sizer::{DefaultSizer, Sizer};
use crate::target::{BlendMode, Rgba, Target};

/// Override for how a mask reaches the target surface, in place of the
/// default [`crate::target::Blitter`].
pub type DrawFn = dyn Fn(&mut dyn Target, &Mask, i32, i32, Rgba, BlendMode);

/// All tunable state for one renderer: active collaborators plus layout
/// policy. Created in a valid default state (a [`DefaultSizer`], no
/// styling, `Over` blending, top-left alignment); fields are only ever
/// mutated in isolation by setters, never mid-`draw`.
pub struct RendererState {
    pub(crate) font: Box<dyn FontProvider>,
    pub(crate) rasterizer: Box<dyn Rasterizer>,
    pub(crate) sizer: Box<dyn Sizer>,
    /// The scaled pixel size actually handed to the font/rasterizer, 26.6.
    pub(crate) size_px: Unit,
    /// The nominal, caller-facing size before device scaling is applied.
    pub(crate) logical_size: Unit,
    /// Horizontal stretch applied to every advance/kern as a `num/den`
    /// ratio, via [`Unit::scale`].
    pub(crate) horizontal_scale: (i32, i32),
    pub(crate) align: Align,
    pub(crate) direction: Direction,
    pub(crate) quantization: Quantization,
    pub(crate) color: Rgba,
    pub(crate) blend_mode: BlendMode,
    pub(crate) draw_fn: Option<Box<DrawFn>>,
    pub(crate) miss_handler: MissHandler,
}

impl RendererState {
    /// Construct a state bag for `font` at `size_px`, with the standard
    /// edge-marker rasterizer, [`DefaultSizer`], and every other knob at its
    /// default.
    pub fn new(font: Box<dyn FontProvider>, rasterizer: Box<dyn Rasterizer>, size_px: Unit) -> RendererState {
        RendererState {
            font,
            rasterizer,
            sizer: Box::new(DefaultSizer),
            size_px,
            logical_size: size_px,
            horizontal_scale: (1, 1),
            align: Align::default(),
            direction: Direction::default(),
            quantization: Quantization::default(),
            color: Rgba::BLACK,
            blend_mode: BlendMode::default(),
            draw_fn: None,
            miss_handler: MissHandler::default(),
        }
    }

    pub fn set_font(&mut self, font: Box<dyn FontProvider>) {
        self.font = font;
    }

    pub fn set_rasterizer(&mut self, rasterizer: Box<dyn Rasterizer>) {
        self.rasterizer = rasterizer;
    }

    pub fn set_sizer(&mut self, sizer: Box<dyn Sizer>) {
        self.sizer = sizer;
    }

    pub fn set_size_px(&mut self, size_px: Unit) {
        self.size_px = size_px;
    }

    pub fn set_logical_size(&mut self, logical_size: Unit) {
        self.logical_size = logical_size;
    }

    pub fn set_horizontal_scale(&mut self, num: i32, den: i32) {
        self.horizontal_scale = (num, den);
    }

    pub fn set_align(&mut self, align: Align) {
        self.align = align;
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn set_quantization(&mut self, quantization: Quantization) {
        self.quantization = quantization;
    }

    pub fn set_color(&mut self, color: Rgba) {
        self.color = color;
    }

    pub fn set_blend_mode(&mut self, blend_mode: BlendMode) {
        self.blend_mode = blend_mode;
    }

    pub fn set_draw_fn(&mut self, draw_fn: Option<Box<DrawFn>>) {
        self.draw_fn = draw_fn;
    }

    pub fn set_miss_handler(&mut self, miss_handler: MissHandler) {
        self.miss_handler = miss_handler;
    }

    pub fn font(&self) -> &dyn FontProvider {
        self.font.as_ref()
    }

    pub fn rasterizer(&self) -> &dyn Rasterizer {
        self.rasterizer.as_ref()
    }

    pub fn sizer(&self) -> &dyn Sizer {
        self.sizer.as_ref()
    }

    /// Apply the configured horizontal scale ratio to a raw advance/kern.
    pub(crate) fn scale_horizontal(&self, u: Unit) -> Unit {
        let (num, den) = self.horizontal_scale;
        if num == den {
            u
        } else {
            u.scale(num, den)
        }
    }
}

//! The pixel surface collaborator and the blitter that composites glyph
//! masks onto it.

use crate::geom::Rect;
use crate::mask::Mask;

/// An RGBA color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba { r: 0, g: 0, b: 0, a: 255 };

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Rgba {
        Rgba { r, g, b, a }
    }
}

/// A caller-owned pixel surface the blitter writes into.
///
/// Image encoding, windowing and GPU backends are all out of scope here:
/// whatever owns the pixels (an in-memory buffer, a window's framebuffer, a
/// GPU-mapped texture) implements this trait.
pub trait Target {
    /// The surface's pixel bounds. The blitter clips all writes to this
    /// rectangle; out-of-bounds mask regions are silently dropped.
    fn bounds(&self) -> Rect;

    /// Read the pixel at `(x, y)`. Only called for blend modes that read
    /// before they write (`Add`, `Sub`, `Multiply`, `Hue`, `Cut`).
    fn get_pixel(&self, x: i32, y: i32) -> Rgba;

    /// Write the pixel at `(x, y)`. Never called outside `bounds()`.
    fn set_pixel(&mut self, x: i32, y: i32, color: Rgba);
}

/// How the blitter combines a glyph's color with the target's existing
/// pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Standard source-over alpha compositing.
    #[default]
    Over,
    /// Overwrite the target pixel outright.
    Replace,
    /// Erase the target wherever the mask is opaque.
    Cut,
    /// Additive blending.
    Add,
    /// Subtractive blending.
    Sub,
    /// Multiplicative blending.
    Multiply,
    /// Convert both colors to HSL and replace the target's hue.
    Hue,
}

/// Composites an alpha mask onto a [`Target`] under a [`BlendMode`].
pub struct Blitter;

impl Blitter {
    /// Blit `mask` at `(pen_x, pen_y)` (the pen's integer pixel position;
    /// the mask's own `offset_x`/`offset_y` are added on top), tinted by
    /// `color`, under `mode`. Regions outside `target.bounds()` are clipped.
    pub fn blit(target: &mut dyn Target, mask: &Mask, pen_x: i32, pen_y: i32, color: Rgba, mode: BlendMode) {
        if mask.is_empty() {
            return;
        }
        let bounds = target.bounds();
        let origin_x = pen_x + mask.offset_x;
        let origin_y = pen_y + mask.offset_y;

        for my in 0..mask.height as i32 {
            let ty = origin_y + my;
            if ty < bounds.y || ty >= bounds.bottom() {
                continue;
            }
            for mx in 0..mask.width as i32 {
                let tx = origin_x + mx;
                if tx < bounds.x || tx >= bounds.right() {
                    continue;
                }
                let coverage = mask.sample(mx, my);
                if coverage == 0 {
                    continue;
                }
                let src = scale_alpha(color, coverage);
                let blended = blend(mode, target.get_pixel(tx, ty), src);
                target.set_pixel(tx, ty, blended);
            }
        }
    }
}

fn scale_alpha(color: Rgba, coverage: u8) -> Rgba {
    Rgba::new(color.r, color.g, color.b, ((color.a as u16 * coverage as u16) / 255) as u8)
}

fn blend(mode: BlendMode, dst: Rgba, src: Rgba) -> Rgba {
    match mode {
        BlendMode::Over => over(dst, src),
        BlendMode::Replace => src,
        BlendMode::Cut => {
            let a = dst.a.saturating_sub(src.a);
            Rgba::new(dst.r, dst.g, dst.b, a)
        }
        BlendMode::Add => Rgba::new(
            dst.r.saturating_add(channel(src.r, src.a)),
            dst.g.saturating_add(channel(src.g, src.a)),
            dst.b.saturating_add(channel(src.b, src.a)),
            dst.a.saturating_add(src.a),
        ),
        BlendMode::Sub => Rgba::new(
            dst.r.saturating_sub(channel(src.r, src.a)),
            dst.g.saturating_sub(channel(src.g, src.a)),
            dst.b.saturating_sub(channel(src.b, src.a)),
            dst.a,
        ),
        BlendMode::Multiply => {
            let mul = |a: u8, b: u8| ((a as u16 * b as u16) / 255) as u8;
            let mixed = Rgba::new(mul(dst.r, src.r), mul(dst.g, src.g), mul(dst.b, src.b), dst.a);
            over(dst, Rgba::new(mixed.r, mixed.g, mixed.b, src.a))
        }
        BlendMode::Hue => {
            let (_, s, l) = rgb_to_hsl(dst.r, dst.g, dst.b);
            let (h, _, _) = rgb_to_hsl(src.r, src.g, src.b);
            let (r, g, b) = hsl_to_rgb(h, s, l);
            over(dst, Rgba::new(r, g, b, src.a))
        }
    }
}

fn channel(value: u8, alpha: u8) -> u8 {
    ((value as u16 * alpha as u16) / 255) as u8
}

fn over(dst: Rgba, src: Rgba) -> Rgba {
    let sa = src.a as u16;
    let inv = 255 - sa;
    let mix = |s: u8, d: u8| (((s as u16 * sa) + (d as u16 * inv)) / 255) as u8;
    Rgba::new(mix(src.r, dst.r), mix(src.g, dst.g), mix(src.b, dst.b), dst.a.saturating_add(channel(src.a, 255)))
}

fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (f32, f32, f32) {
    let (r, g, b) = (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    if (max - min).abs() < f32::EPSILON {
        return (0.0, 0.0, l);
    }
    let d = max - min;
    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    (h * 60.0, s, l)
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (u8, u8, u8) {
    if s.abs() < f32::EPSILON {
        let v = (l * 255.0).round() as u8;
        return (v, v, v);
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let h = h / 360.0;
    let to_channel = |t: f32| {
        let t = t.rem_euclid(1.0);
        let v = if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        };
        (v * 255.0).round() as u8
    };
    (to_channel(h + 1.0 / 3.0), to_channel(h), to_channel(h - 1.0 / 3.0))
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn solid_mask(w: u32, h: u32) -> Mask {
        Mask { width: w, height: h, data: vec![255; (w * h) as usize], offset_x: 0, offset_y: 0 }
    }

    #[test]
    fn over_mode_writes_opaque_color() {
        let mut buf = Buffer::new(4, 4);
        Blitter::blit(&mut buf, &solid_mask(2, 2), 1, 1, Rgba::BLACK, BlendMode::Over);
        assert_eq!(buf.get_pixel(1, 1), Rgba::BLACK);
        assert_eq!(buf.get_pixel(0, 0), Rgba::default());
    }

    #[test]
    fn clipped_blit_does_not_panic_out_of_bounds() {
        let mut buf = Buffer::new(4, 4);
        Blitter::blit(&mut buf, &solid_mask(4, 4), 2, 2, Rgba::BLACK, BlendMode::Over);
        assert_eq!(buf.get_pixel(3, 3), Rgba::BLACK);
    }

    #[test]
    fn cut_mode_erases_existing_alpha() {
        let mut buf = Buffer::new(2, 2);
        buf.set_pixel(0, 0, Rgba::new(10, 20, 30, 200));
        Blitter::blit(&mut buf, &solid_mask(1, 1), 0, 0, Rgba::BLACK, BlendMode::Cut);
        assert_eq!(buf.get_pixel(0, 0).a, 0);
    }
}

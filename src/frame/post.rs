use image::imageops::{self, FilterType};
use rand::Rng;

use crate::{
    foundation::{
        core::{Canvas, Rgba8},
        error::{LoopError, LoopResult},
    },
    frame::raster::Raster,
};

/// Per-frame knobs for [`PostProcessor::process`]. Derived fresh every frame, never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameParams {
    /// Mosaic block side in source pixels. Clamped before use.
    pub pixelate: u32,
    /// Replaces every sampled alpha when set.
    pub alpha: Option<u8>,
    /// Quantize RGB to this many levels when set. Applied as `2..=256`; configs reject
    /// values outside that range up front.
    pub posterize: Option<u32>,
}

impl Default for FrameParams {
    fn default() -> Self {
        Self {
            pixelate: 1,
            alpha: None,
            posterize: None,
        }
    }
}

/// Turns a buffered image into a display-sized frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PostProcessor {
    display: Canvas,
    max_pixelate: u32,
}

impl PostProcessor {
    /// Fails when `max_pixelate` is 0.
    pub fn new(display: Canvas, max_pixelate: u32) -> LoopResult<Self> {
        if max_pixelate == 0 {
            return Err(LoopError::validation("max_pixelate must be >= 1"));
        }
        Ok(Self {
            display,
            max_pixelate,
        })
    }

    /// Output frame size.
    pub fn display(&self) -> Canvas {
        self.display
    }

    /// Clamp a block size into `[1, max_pixelate]`; zero would never advance the sampler.
    pub fn clamp_pixelate(&self, block: u32) -> u32 {
        block.clamp(1, self.max_pixelate)
    }

    /// Upsample `src` to the display size with block mosaic, then posterize if asked.
    pub fn process(&self, src: &Raster, params: &FrameParams) -> Raster {
        let block = self.clamp_pixelate(params.pixelate);
        let mut out = pixelate(src, self.display, block, params.alpha);
        if let Some(levels) = params.posterize {
            posterize_in_place(&mut out, levels);
        }
        out
    }
}

/// Nearest-neighbor block replication from `src` onto a `display`-sized raster.
///
/// Every `block`-th source pixel on both axes is stretched over a
/// `(block * scale_x) x (block * scale_y)` destination block, where
/// `scale = ceil(display / src)`. Blocks are clipped at the display edge.
pub fn pixelate(src: &Raster, display: Canvas, block: u32, alpha: Option<u8>) -> Raster {
    let mut out = Raster::new(display);
    if src.width() == 0 || src.height() == 0 {
        return out;
    }

    let block = block.max(1);
    let scale_x = display.width.div_ceil(src.width());
    let scale_y = display.height.div_ceil(src.height());
    let block_w = block.saturating_mul(scale_x);
    let block_h = block.saturating_mul(scale_y);

    for y in (0..src.height()).step_by(block as usize) {
        for x in (0..src.width()).step_by(block as usize) {
            let mut color = src.pixel(x, y);
            if let Some(a) = alpha {
                color[3] = a;
            }
            out.fill_block(
                x.saturating_mul(scale_x),
                y.saturating_mul(scale_y),
                block_w,
                block_h,
                color,
            );
        }
    }
    out
}

/// Snap one channel onto `levels` evenly spaced values across `0..=255`.
pub fn posterize_channel(value: u8, levels: u32) -> u8 {
    let steps = (levels.clamp(2, 256) - 1) as f32;
    let level = (f32::from(value) / 255.0 * steps).round();
    (level * 255.0 / steps).round() as u8
}

/// Quantize R, G and B to `levels` values each. Alpha is left alone.
pub fn posterize_in_place(raster: &mut Raster, levels: u32) {
    for px in raster.pixels_mut() {
        for c in px.iter_mut().take(3) {
            *c = posterize_channel(*c, levels);
        }
    }
}

/// Nearest-neighbor resize of a whole frame, e.g. the shrunken frame shown while the
/// pointer is held.
pub fn shrink(src: &Raster, size: Canvas) -> LoopResult<Raster> {
    let img = src.to_rgba_image()?;
    let resized = imageops::resize(&img, size.width, size.height, FilterType::Nearest);
    Ok(Raster::from_rgba_image(resized))
}

/// Copy `src` onto a transparent `display`-sized raster with its top-left corner at
/// `(x, y)`. Anything outside the display is clipped.
pub fn place(src: &Raster, display: Canvas, x: i64, y: i64) -> Raster {
    let mut out = Raster::new(display);
    for sy in 0..src.height() {
        let Ok(dy) = u32::try_from(y + i64::from(sy)) else {
            continue;
        };
        for sx in 0..src.width() {
            let Ok(dx) = u32::try_from(x + i64::from(sx)) else {
                continue;
            };
            if out.contains(dx, dy) {
                out.set_pixel(dx, dy, src.pixel(sx, sy));
            }
        }
    }
    out
}

/// Stamp `color` over each pixel independently with the given probability.
pub fn speckle_in_place<R: Rng + ?Sized>(
    raster: &mut Raster,
    rng: &mut R,
    probability: f64,
    color: Rgba8,
) {
    let p = if probability.is_finite() {
        probability.clamp(0.0, 1.0)
    } else {
        0.0
    };
    for px in raster.pixels_mut() {
        if rng.gen_bool(p) {
            px.copy_from_slice(&color);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/post.rs"]
mod tests;

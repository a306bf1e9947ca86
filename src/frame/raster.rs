use anyhow::Context as _;

use crate::foundation::{
    core::{Canvas, Rgba8},
    error::{LoopError, LoopResult},
};

/// Owned straight-alpha RGBA8 pixels, row-major and tightly packed.
///
/// Addressing is internal; callers go through [`Raster::pixel`] / [`Raster::set_pixel`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Raster {
    /// A fully transparent raster.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0u8; canvas.byte_len()],
        }
    }

    /// A raster with every pixel set to `color`.
    pub fn filled(canvas: Canvas, color: Rgba8) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            data: color.repeat(canvas.pixel_count()),
        }
    }

    /// Wrap tightly packed RGBA8 bytes, checking the length.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> LoopResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| LoopError::validation("raster size overflow"))?;
        if data.len() != expected {
            return Err(LoopError::validation(format!(
                "raster data length {} does not match {width}x{height}x4",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Take ownership of an `image` buffer.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }

    /// Copy into an `image` buffer, e.g. for PNG encoding.
    pub fn to_rgba_image(&self) -> LoopResult<image::RgbaImage> {
        let img = image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .context("raster buffer does not fit its dimensions")?;
        Ok(img)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions as a [`Canvas`].
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Raw RGBA8 bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume into raw RGBA8 bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        debug_assert!(
            x < self.width && y < self.height,
            "pixel ({x},{y}) outside {}x{}",
            self.width,
            self.height
        );
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }

    /// Whether `(x, y)` lies inside the raster.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    /// Read one pixel. Out-of-bounds access is a bug; debug builds assert on it.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        let i = self.offset(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Read one pixel, or `None` outside the raster.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        self.contains(x, y).then(|| self.pixel(x, y))
    }

    /// Write one pixel. Same bounds contract as [`Raster::pixel`].
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba8) {
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&color);
    }

    /// Fill a `w x h` block at `(x, y)`, clipped to the raster bounds.
    pub fn fill_block(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba8) {
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);
        for py in y.min(y_end)..y_end {
            for px in x.min(x_end)..x_end {
                self.set_pixel(px, py, color);
            }
        }
    }

    /// Mutable 4-byte pixel slices, row-major.
    pub fn pixels_mut(&mut self) -> impl Iterator<Item = &mut [u8]> {
        self.data.chunks_exact_mut(4)
    }

    /// 4-byte pixel slices, row-major.
    pub fn pixels(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks_exact(4)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/raster.rs"]
mod tests;

use crate::foundation::error::{LoopError, LoopResult};

/// Number of components in every latent vector the generator accepts.
pub const LATENT_DIM: usize = 128;

/// Straight (non-premultiplied) RGBA8.
pub type Rgba8 = [u8; 4];

/// Width and height of a raster, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a canvas, rejecting zero dimensions.
    pub fn new(width: u32, height: u32) -> LoopResult<Self> {
        if width == 0 || height == 0 {
            return Err(LoopError::validation("canvas width/height must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// `width * height`.
    pub fn pixel_count(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// RGBA8 byte length of a tightly packed raster.
    pub fn byte_len(self) -> usize {
        self.pixel_count() * 4
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;

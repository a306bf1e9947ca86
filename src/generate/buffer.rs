use crate::{
    foundation::error::{LoopError, LoopResult},
    frame::raster::Raster,
};

/// One decoded, display-resized image and the waypoint it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedImage {
    /// Index of the source waypoint in the planned path.
    pub waypoint: usize,
    /// Pixels, already resized to the configured image size.
    pub raster: Raster,
}

/// Append-only store of generated images in path order.
///
/// Images are never removed or reordered. Once sealed for playback, further appends fail.
#[derive(Clone, Debug, Default)]
pub struct ImageBuffer {
    images: Vec<GeneratedImage>,
    sealed: bool,
}

impl ImageBuffer {
    /// An empty, unsealed buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty buffer with room for `capacity` images.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            images: Vec::with_capacity(capacity),
            sealed: false,
        }
    }

    /// Append at the end. Fails once sealed.
    pub fn push(&mut self, image: GeneratedImage) -> LoopResult<()> {
        if self.sealed {
            return Err(LoopError::validation(
                "image buffer is sealed; no appends during playback",
            ));
        }
        self.images.push(image);
        Ok(())
    }

    /// Freeze the buffer. Idempotent.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    /// Whether [`ImageBuffer::seal`] has been called.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Number of images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether no image has been appended.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Image at a buffer slot.
    pub fn get(&self, index: usize) -> Option<&GeneratedImage> {
        self.images.get(index)
    }

    /// Images in append order.
    pub fn iter(&self) -> impl Iterator<Item = &GeneratedImage> {
        self.images.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generate/buffer.rs"]
mod tests;

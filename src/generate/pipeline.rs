use image::imageops::{self, FilterType};

use crate::{
    foundation::{
        core::Canvas,
        error::{GenerationFailure, LoopResult},
    },
    frame::raster::Raster,
    generate::{
        buffer::{GeneratedImage, ImageBuffer},
        generator::LatentGenerator,
    },
    latent::path::LatentPath,
};

/// Counters for one generation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Waypoints in the path.
    pub planned: usize,
    /// Images appended to the buffer.
    pub generated: usize,
    /// Waypoints skipped after a generator failure.
    pub failed: usize,
}

impl GenerationReport {
    /// Waypoints handed to the generator so far.
    pub fn attempted(&self) -> usize {
        self.generated + self.failed
    }
}

/// Result of generating a single waypoint.
#[derive(Clone, Debug, PartialEq)]
pub enum StepOutcome {
    /// The image was buffered.
    Appended {
        /// Waypoint index.
        waypoint: usize,
        /// Buffer length after the append.
        buffer_len: usize,
    },
    /// The generator failed; nothing was buffered.
    Skipped {
        /// Waypoint index.
        waypoint: usize,
        /// The generator's error.
        error: GenerationFailure,
    },
}

/// Walks a [`LatentPath`] through a generator, one waypoint per call, strictly in order.
///
/// A failed waypoint is logged and dropped; the buffer just ends up shorter than the plan.
#[derive(Clone, Debug)]
pub struct GenerationPipeline {
    path: LatentPath,
    image_size: Canvas,
    next: usize,
    report: GenerationReport,
}

impl GenerationPipeline {
    /// Images will be resized to `image_size` before buffering.
    pub fn new(path: LatentPath, image_size: Canvas) -> Self {
        let planned = path.len();
        Self {
            path,
            image_size,
            next: 0,
            report: GenerationReport {
                planned,
                ..GenerationReport::default()
            },
        }
    }

    /// The path being generated.
    pub fn path(&self) -> &LatentPath {
        &self.path
    }

    /// Waypoints in the path.
    pub fn planned(&self) -> usize {
        self.report.planned
    }

    /// Waypoints not yet attempted.
    pub fn remaining(&self) -> usize {
        self.path.len() - self.next
    }

    /// Whether every waypoint has been attempted.
    pub fn is_finished(&self) -> bool {
        self.next >= self.path.len()
    }

    /// Counters so far.
    pub fn report(&self) -> GenerationReport {
        self.report
    }

    /// Generate the next waypoint. Returns `None` once the path is exhausted.
    pub async fn step(
        &mut self,
        generator: &mut dyn LatentGenerator,
        buffer: &mut ImageBuffer,
    ) -> LoopResult<Option<StepOutcome>> {
        let Some(waypoint) = self.path.waypoints.get(self.next) else {
            return Ok(None);
        };
        let index = waypoint.index;
        self.next += 1;

        match generator.generate(&waypoint.latent).await {
            Ok(raw) => {
                let resized = resize_to(raw, self.image_size);
                buffer.push(GeneratedImage {
                    waypoint: index,
                    raster: Raster::from_rgba_image(resized),
                })?;
                self.report.generated += 1;
                tracing::debug!(waypoint = index, buffer_len = buffer.len(), "image appended");
                Ok(Some(StepOutcome::Appended {
                    waypoint: index,
                    buffer_len: buffer.len(),
                }))
            }
            Err(error) => {
                self.report.failed += 1;
                tracing::warn!(waypoint = index, %error, "generation failed, skipping waypoint");
                Ok(Some(StepOutcome::Skipped {
                    waypoint: index,
                    error,
                }))
            }
        }
    }

    /// Drive every remaining waypoint to completion.
    #[tracing::instrument(skip_all, fields(model = generator.name(), planned = self.planned()))]
    pub async fn run(
        &mut self,
        generator: &mut dyn LatentGenerator,
        buffer: &mut ImageBuffer,
    ) -> LoopResult<GenerationReport> {
        while self.step(generator, buffer).await?.is_some() {}
        let report = self.report;
        tracing::info!(
            generated = report.generated,
            failed = report.failed,
            planned = report.planned,
            "generation complete"
        );
        Ok(report)
    }
}

/// Plan-to-buffer in one call.
pub async fn generate_images(
    path: LatentPath,
    image_size: Canvas,
    generator: &mut dyn LatentGenerator,
) -> LoopResult<(ImageBuffer, GenerationReport)> {
    let mut buffer = ImageBuffer::with_capacity(path.len());
    let mut pipeline = GenerationPipeline::new(path, image_size);
    let report = pipeline.run(generator, &mut buffer).await?;
    Ok((buffer, report))
}

/// Nearest-neighbor resize to the fixed display resolution of buffered images.
pub fn resize_to(img: image::RgbaImage, size: Canvas) -> image::RgbaImage {
    if img.dimensions() == (size.width, size.height) {
        return img;
    }
    imageops::resize(&img, size.width, size.height, FilterType::Nearest)
}

#[cfg(test)]
#[path = "../../tests/unit/generate/pipeline.rs"]
mod tests;

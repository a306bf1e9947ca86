use async_trait::async_trait;

use crate::{
    foundation::{
        core::{Canvas, Rgba8},
        error::{GenerationFailure, LoopError, LoopResult},
    },
    generate::manifest::ModelManifest,
    latent::vector::LatentVector,
};

/// A pretrained model seen from the outside: one latent vector in, one raw image out.
///
/// Calls are issued one at a time; implementations never see two requests in flight.
#[async_trait]
pub trait LatentGenerator: Send {
    /// Produce one raw image for `latent`, at whatever size the model outputs.
    async fn generate(
        &mut self,
        latent: &LatentVector,
    ) -> Result<image::RgbaImage, GenerationFailure>;

    /// Model name for logs.
    fn name(&self) -> &str;
}

/// Build the generator a manifest asks for.
pub fn load_generator(manifest: &ModelManifest) -> LoopResult<Box<dyn LatentGenerator>> {
    manifest.validate()?;
    let kind = manifest.kind.trim().to_ascii_lowercase();
    match kind.as_str() {
        "gradient" => {
            let output = Canvas::new(manifest.width, manifest.height)?;
            Ok(Box::new(GradientGenerator::new(manifest.name.clone(), output)))
        }
        _ => Err(LoopError::validation(format!("unknown model kind '{kind}'"))),
    }
}

const GRADIENT_COLUMNS: u32 = 10;

/// Deterministic stand-in model that renders looping three-stop vertical gradients.
///
/// Components 0..9 pick the three color stops (one RGB triple each) and components
/// 10..20 shift each of the ten columns vertically, so nearby latents give nearby images.
#[derive(Clone, Debug)]
pub struct GradientGenerator {
    name: String,
    output: Canvas,
}

impl GradientGenerator {
    /// A generator named `name` that outputs `output`-sized images.
    pub fn new(name: impl Into<String>, output: Canvas) -> Self {
        Self {
            name: name.into(),
            output,
        }
    }

    /// Synchronous body of [`LatentGenerator::generate`].
    pub fn render(&self, latent: &LatentVector) -> image::RgbaImage {
        let z = latent.as_slice();
        let stops: [Rgba8; 3] = std::array::from_fn(|k| {
            [
                unit_to_u8(z[k * 3]),
                unit_to_u8(z[k * 3 + 1]),
                unit_to_u8(z[k * 3 + 2]),
                255,
            ]
        });

        let Canvas { width, height } = self.output;
        let column_w = width.div_ceil(GRADIENT_COLUMNS).max(1);
        image::RgbaImage::from_fn(width, height, |x, y| {
            let column = (x / column_w).min(GRADIENT_COLUMNS - 1) as usize;
            let shift = (z[10 + column] + 1.0) * 0.5;
            let t = (y as f32 / height as f32 + shift).fract();
            image::Rgba(cycle_color(&stops, t))
        })
    }
}

#[async_trait]
impl LatentGenerator for GradientGenerator {
    async fn generate(
        &mut self,
        latent: &LatentVector,
    ) -> Result<image::RgbaImage, GenerationFailure> {
        Ok(self.render(latent))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn unit_to_u8(v: f32) -> u8 {
    ((v.clamp(-1.0, 1.0) + 1.0) * 0.5 * 255.0).round() as u8
}

// stop0 -> stop1 -> stop2 -> stop0 over t in [0, 1)
fn cycle_color(stops: &[Rgba8; 3], t: f32) -> Rgba8 {
    let pos = t.clamp(0.0, 1.0) * 3.0;
    let seg = (pos.floor() as usize).min(2);
    let local = pos - seg as f32;
    let a = stops[seg];
    let b = stops[(seg + 1) % 3];
    std::array::from_fn(|c| {
        let v = f32::from(a[c]) * (1.0 - local) + f32::from(b[c]) * local;
        v.round().clamp(0.0, 255.0) as u8
    })
}

#[cfg(test)]
#[path = "../../tests/unit/generate/generator.rs"]
mod tests;

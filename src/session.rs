use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::{
    config::{ReadinessGate, SketchConfig},
    foundation::{core::Rgba8, error::LoopResult},
    frame::{
        post::{FrameParams, PostProcessor, place, shrink, speckle_in_place},
        raster::Raster,
    },
    generate::{
        buffer::ImageBuffer,
        generator::LatentGenerator,
        pipeline::{GenerationPipeline, GenerationReport, StepOutcome},
    },
    latent::path::{LatentPath, PathPlanner},
    playback::{
        cursor::PlaybackCursor,
        drift::ImageDrift,
        modulation::{CursorMotion, FrameInput, Modulator},
    },
};

const SPECKLE_KEY: char = 'd';
const SPECKLE_PROBABILITY: f64 = 0.5;
const SPECKLE_COLOR: Rgba8 = [255, 0, 0, 255];

/// Lifecycle of a sketch. There is no way back to `Loading`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Generating; nothing is drawn.
    Loading,
    /// The readiness gate is open but no frame has been drawn yet.
    Ready,
    /// At least one frame has been drawn.
    Playing,
}

/// Owns one generation pass and the playback loop that follows it.
///
/// The buffer has one writer (generation) and one reader (drawing). Under
/// [`ReadinessGate::Complete`] the writer finishes before the reader starts; the looser
/// gates let drawing begin while images are still being appended.
pub struct Sketch {
    config: SketchConfig,
    seed: u64,
    rng: Pcg32,
    pipeline: GenerationPipeline,
    buffer: ImageBuffer,
    cursor: PlaybackCursor,
    modulator: Modulator,
    post: PostProcessor,
    drift: Option<ImageDrift>,
    pointer: (f32, f32),
    phase: Phase,
    last_params: Option<FrameParams>,
    last_index: Option<usize>,
    frames_drawn: u64,
}

impl Sketch {
    /// Validate the config, sample anchors and plan the path. No generation happens yet.
    pub fn new(config: SketchConfig) -> LoopResult<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = Pcg32::seed_from_u64(seed);
        let planner = PathPlanner::new(config.anchors, config.step_frequency)?;
        let path = planner.plan(&mut rng);
        tracing::info!(
            seed,
            planned = path.len(),
            anchors = config.anchors,
            "latent path planned"
        );

        let post = PostProcessor::new(config.display, config.pixelate_max)?;
        let modulator = Modulator::new(
            config.drive.clone(),
            config.display,
            config.pixelate_min,
            config.pixelate_max,
        );
        Ok(Self {
            seed,
            rng,
            buffer: ImageBuffer::with_capacity(path.len()),
            pipeline: GenerationPipeline::new(path, config.image),
            cursor: PlaybackCursor::new(config.wrap),
            modulator,
            post,
            drift: config.drift.map(ImageDrift::new),
            pointer: (0.0, 0.0),
            phase: Phase::Loading,
            last_params: None,
            last_index: None,
            frames_drawn: 0,
            config,
        })
    }

    /// The validated config.
    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    /// Seed the anchors were sampled with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The planned loop.
    pub fn path(&self) -> &LatentPath {
        self.pipeline.path()
    }

    /// Images generated so far.
    pub fn buffer(&self) -> &ImageBuffer {
        &self.buffer
    }

    /// Playback cursor.
    pub fn cursor(&self) -> &PlaybackCursor {
        &self.cursor
    }

    /// Input modulation state.
    pub fn modulator(&self) -> &Modulator {
        &self.modulator
    }

    /// Generation counters so far.
    pub fn report(&self) -> GenerationReport {
        self.pipeline.report()
    }

    /// Whether waypoints remain to be generated.
    pub fn is_generating(&self) -> bool {
        !self.pipeline.is_finished()
    }

    /// Frames returned by [`Sketch::draw`].
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Parameters used for the most recent drawn frame.
    pub fn last_params(&self) -> Option<FrameParams> {
        self.last_params
    }

    /// Buffer slot shown by the most recent drawn frame.
    pub fn last_index(&self) -> Option<usize> {
        self.last_index
    }

    /// Image drift state, when drift is configured.
    pub fn drift(&self) -> Option<&ImageDrift> {
        self.drift.as_ref()
    }

    /// Generate a single waypoint so a host can draw between calls.
    pub async fn load_step(
        &mut self,
        generator: &mut dyn LatentGenerator,
    ) -> LoopResult<Option<StepOutcome>> {
        let outcome = self.pipeline.step(generator, &mut self.buffer).await?;
        self.refresh_phase();
        Ok(outcome)
    }

    /// Generate every remaining waypoint.
    pub async fn load(
        &mut self,
        generator: &mut dyn LatentGenerator,
    ) -> LoopResult<GenerationReport> {
        let report = self.pipeline.run(generator, &mut self.buffer).await?;
        self.refresh_phase();
        Ok(report)
    }

    /// Whether the configured readiness gate is satisfied.
    ///
    /// A finished pass always counts as ready, even if failures kept the buffer short of a
    /// `MinImages` threshold.
    pub fn is_ready(&self) -> bool {
        if self.pipeline.is_finished() {
            return true;
        }
        match self.config.readiness {
            ReadinessGate::Complete => false,
            ReadinessGate::MinImages(n) => self.buffer.len() >= n,
            ReadinessGate::NonEmpty => !self.buffer.is_empty(),
        }
    }

    fn refresh_phase(&mut self) {
        if self.pipeline.is_finished() && !self.buffer.is_sealed() {
            self.buffer.seal();
        }
        if self.phase == Phase::Loading && self.is_ready() {
            self.phase = Phase::Ready;
            tracing::info!(images = self.buffer.len(), "sketch ready");
        }
    }

    /// Render one frame, or `None` while loading or when nothing was generated.
    ///
    /// With drift configured the frame sits at the drifting offset on a transparent
    /// display; while the pointer is held it shrinks to `pressed_size` first.
    pub fn draw(&mut self, input: &FrameInput) -> Option<Raster> {
        if self.phase == Phase::Loading {
            self.refresh_phase();
            if self.phase == Phase::Loading {
                return None;
            }
        }

        let len = self.buffer.len();
        let modulation = self
            .modulator
            .update(input, len, self.config.step_frequency, &mut self.rng);
        let index = match modulation.motion {
            CursorMotion::Advance(step) => self.cursor.advance(step, len),
            CursorMotion::Seek { target, amt } => self.cursor.ease_toward(target, amt, len),
        }?;
        let image = self.buffer.get(index)?;

        let params = FrameParams {
            alpha: self.config.alpha_override,
            ..modulation.params
        };
        let mut frame = self.post.process(&image.raster, &params);

        if let Some(p) = input.pointer {
            self.pointer = p;
        }
        let offset = match self.drift.as_mut() {
            Some(drift) => {
                drift.update(self.pointer);
                Some(drift.offset())
            }
            None => None,
        };
        if input.pressed {
            match shrink(&frame, self.config.pressed_size) {
                Ok(small) => frame = small,
                Err(error) => tracing::warn!(%error, "could not shrink pressed frame"),
            }
        }
        if offset.is_some() || input.pressed {
            let (x, y) = offset.unwrap_or((0, 0));
            frame = place(&frame, self.config.display, x, y);
        }

        if input.key.is_some_and(|k| k.eq_ignore_ascii_case(&SPECKLE_KEY)) {
            speckle_in_place(&mut frame, &mut self.rng, SPECKLE_PROBABILITY, SPECKLE_COLOR);
        }

        if self.phase == Phase::Ready {
            self.phase = Phase::Playing;
            tracing::info!("sketch playing");
        }
        self.last_params = Some(params);
        self.last_index = Some(index);
        self.frames_drawn += 1;
        Some(frame)
    }

    /// Overlay text: generation progress while loading, oscillator readouts after.
    pub fn status_lines(&self) -> Vec<String> {
        if self.phase == Phase::Loading {
            return vec![
                "Loading Generated Images...".to_string(),
                format!(
                    "Generated Images {}/{}",
                    self.buffer.len(),
                    self.pipeline.planned()
                ),
            ];
        }
        let mut lines = Vec::new();
        if let Some(params) = self.last_params {
            lines.push(format!("Pixel Factor: {}", params.pixelate));
        }
        if let Some(r) = self.modulator.readout() {
            lines.push(format!("Oscillator Freq: {:.1}", r.pointer_freq));
            lines.push(format!("Oscillator Amp: {:.3}", r.pointer_amp));
            lines.push(format!("Keyboard Oscillator Freq: {:.1}", r.keyboard_freq));
        }
        lines
    }
}

#[cfg(test)]
#[path = "../tests/unit/session/session.rs"]
mod tests;

use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context as _;

use crate::{
    foundation::{
        core::Canvas,
        error::{LoopError, LoopResult},
    },
    latent::path,
    playback::{cursor::WrapMode, drift::DriftConfig, modulation::Drive},
};

/// When playback may start reading the image buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "gate", content = "images", rename_all = "snake_case")]
pub enum ReadinessGate {
    /// Wait for every waypoint to be attempted.
    #[default]
    Complete,
    /// Start once the buffer holds at least this many images.
    MinImages(usize),
    /// Start as soon as any image exists.
    NonEmpty,
}

/// Everything a sketch needs to plan, generate, and play back a latent loop.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    /// Randomly sampled anchors the loop passes through.
    pub anchors: usize,
    /// Interpolation step between consecutive anchors, in `(0, 1]`.
    pub step_frequency: f32,
    /// Every generated image is resized to this before buffering.
    pub image: Canvas,
    /// Output frame size.
    pub display: Canvas,
    /// Smallest mosaic block the oscillator drive produces.
    pub pixelate_min: u32,
    /// Largest mosaic block; every block size is clamped to this.
    pub pixelate_max: u32,
    /// When drawing may start.
    pub readiness: ReadinessGate,
    /// Source of per-frame cursor motion and post-processing.
    pub drive: Drive,
    /// Replaces the alpha of every drawn pixel when set.
    pub alpha_override: Option<u8>,
    /// Cursor behaviour at the end of the buffer.
    pub wrap: WrapMode,
    /// Pointer-attracted image drift; frames stay anchored at the origin when absent.
    pub drift: Option<DriftConfig>,
    /// Size the frame shrinks to while the pointer is held.
    pub pressed_size: Canvas,
    /// Fixes anchor sampling; a fresh seed is drawn per run when absent.
    pub seed: Option<u64>,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            anchors: 2,
            step_frequency: 0.5,
            image: Canvas {
                width: 128,
                height: 128,
            },
            display: Canvas {
                width: 755,
                height: 720,
            },
            pixelate_min: 1,
            pixelate_max: 18,
            readiness: ReadinessGate::Complete,
            drive: Drive::default(),
            alpha_override: None,
            wrap: WrapMode::Reset,
            drift: None,
            pressed_size: Canvas {
                width: 10,
                height: 10,
            },
            seed: None,
        }
    }
}

impl SketchConfig {
    /// Read and validate a JSON config.
    pub fn load(path: &Path) -> LoopResult<Self> {
        let f =
            File::open(path).with_context(|| format!("open sketch config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse sketch config '{}'", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check every field; errors are [`LoopError::Config`].
    pub fn validate(&self) -> LoopResult<()> {
        self.planned_waypoints()?;
        for (name, c) in [
            ("image", self.image),
            ("display", self.display),
            ("pressed_size", self.pressed_size),
        ] {
            if c.width == 0 || c.height == 0 {
                return Err(LoopError::config(format!(
                    "{name} width/height must be > 0"
                )));
            }
        }
        if self.pixelate_min == 0 {
            return Err(LoopError::config("pixelate_min must be >= 1"));
        }
        if self.pixelate_min > self.pixelate_max {
            return Err(LoopError::config("pixelate_min must be <= pixelate_max"));
        }
        if let Some(drift) = self.drift
            && !(0.0..1.0).contains(&drift.damping)
        {
            return Err(LoopError::config("drift damping must be in [0, 1)"));
        }
        self.drive.validate()
    }

    /// Waypoints a full generation pass will attempt.
    pub fn planned_waypoints(&self) -> LoopResult<usize> {
        path::planned_waypoints(self.anchors, self.step_frequency).map_err(|e| match e {
            LoopError::Validation(msg) => LoopError::Config(msg),
            other => other,
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;

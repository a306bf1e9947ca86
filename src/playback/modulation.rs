use rand::Rng;

use crate::{
    foundation::{
        core::Canvas,
        error::{LoopError, LoopResult},
        math::{constrain, lerp, map_range},
    },
    frame::post::FrameParams,
};

/// Raw input sampled for one rendered frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Pointer position in display pixels; retargets the smoothed pointer.
    pub pointer: Option<(f32, f32)>,
    /// Key pressed this frame, if any.
    pub key: Option<char>,
    /// Audio level in `[0, 1]` from an amplitude analyser.
    pub amplitude: Option<f32>,
    /// Pointer button held; the frame is drawn shrunken while set.
    pub pressed: bool,
}

/// How frame parameters and cursor motion are derived from input.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Drive {
    /// Fixed step and fixed post-processing.
    Constant {
        /// Cursor advance per frame.
        step: f32,
        /// Mosaic block size.
        #[serde(default = "default_constant_pixelate")]
        pixelate: u32,
        /// Posterize levels, `2..=256`.
        #[serde(default)]
        posterize: Option<u32>,
    },
    /// Pointer-driven oscillator pair with digit-key presets.
    Oscillator(OscillatorDrive),
    /// Audio level seeks a buffer position.
    Amplitude {
        /// Multiplier applied to the level before it is capped at 1.
        #[serde(default = "default_amplitude_gain")]
        gain: f32,
    },
}

impl Default for Drive {
    fn default() -> Self {
        Self::Oscillator(OscillatorDrive::default())
    }
}

fn default_constant_pixelate() -> u32 {
    1
}

fn default_amplitude_gain() -> f32 {
    5.0
}

/// Ranges for the pointer and keyboard oscillators.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OscillatorDrive {
    /// Frequency at the left edge of the display.
    pub min_freq: f32,
    /// Frequency at the right edge of the display.
    pub max_freq: f32,
    /// Posterize levels at `min_freq` on the keyboard oscillator.
    pub posterize_min: u32,
    /// Posterize levels at `max_freq` on the keyboard oscillator.
    pub posterize_max: u32,
    /// Fraction of the remaining distance the pointer covers each frame.
    pub pointer_smoothing: f32,
}

impl Default for OscillatorDrive {
    fn default() -> Self {
        Self {
            min_freq: 100.0,
            max_freq: 400.0,
            posterize_min: 2,
            posterize_max: 15,
            pointer_smoothing: 0.05,
        }
    }
}

impl Drive {
    /// Reject ranges the modulator cannot map through.
    pub fn validate(&self) -> LoopResult<()> {
        match self {
            Self::Constant {
                step, posterize, ..
            } => {
                if !step.is_finite() || *step < 0.0 {
                    return Err(LoopError::config("constant step must be finite and >= 0"));
                }
                if let Some(levels) = posterize
                    && !(2..=256).contains(levels)
                {
                    return Err(LoopError::config(format!(
                        "constant posterize must be in 2..=256, got {levels}"
                    )));
                }
            }
            Self::Oscillator(osc) => {
                if !(osc.min_freq.is_finite() && osc.max_freq.is_finite())
                    || osc.min_freq >= osc.max_freq
                {
                    return Err(LoopError::config(
                        "oscillator min_freq must be finite and < max_freq",
                    ));
                }
                if osc.posterize_min < 2
                    || osc.posterize_min > osc.posterize_max
                    || osc.posterize_max > 256
                {
                    return Err(LoopError::config(
                        "oscillator posterize range must satisfy 2 <= min <= max <= 256",
                    ));
                }
                if !(osc.pointer_smoothing > 0.0 && osc.pointer_smoothing <= 1.0) {
                    return Err(LoopError::config("pointer_smoothing must be in (0, 1]"));
                }
            }
            Self::Amplitude { gain } => {
                if !gain.is_finite() || *gain <= 0.0 {
                    return Err(LoopError::config("amplitude gain must be finite and > 0"));
                }
            }
        }
        Ok(())
    }
}

/// How the cursor should move this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CursorMotion {
    /// Step forward by this much.
    Advance(f32),
    /// Ease toward a buffer position.
    Seek {
        /// Fractional buffer position to approach.
        target: f32,
        /// Share of the remaining distance covered this frame.
        amt: f32,
    },
}

/// One frame's worth of modulation output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Modulation {
    /// Cursor movement for this frame.
    pub motion: CursorMotion,
    /// Post-processing for this frame, before the sketch applies its alpha override.
    pub params: FrameParams,
}

/// Last oscillator values, for on-screen readouts.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OscillatorReadout {
    /// Pointer oscillator frequency, from the smoothed x position.
    pub pointer_freq: f32,
    /// Pointer oscillator amplitude, from the smoothed y position.
    pub pointer_amp: f32,
    /// Frequency set by the last digit key.
    pub keyboard_freq: f32,
}

/// Per-sketch modulation state: the smoothed pointer and both oscillators.
#[derive(Clone, Debug)]
pub struct Modulator {
    drive: Drive,
    display: Canvas,
    pixelate_min: u32,
    pixelate_max: u32,
    pointer: (f32, f32),
    target: (f32, f32),
    keyboard_freq: f32,
    readout: OscillatorReadout,
}

impl Modulator {
    /// Pointer and target start at the origin; the keyboard oscillator starts at
    /// `min_freq`.
    pub fn new(drive: Drive, display: Canvas, pixelate_min: u32, pixelate_max: u32) -> Self {
        let keyboard_freq = match &drive {
            Drive::Oscillator(osc) => osc.min_freq,
            _ => 0.0,
        };
        Self {
            drive,
            display,
            pixelate_min,
            pixelate_max,
            pointer: (0.0, 0.0),
            target: (0.0, 0.0),
            keyboard_freq,
            readout: OscillatorReadout {
                keyboard_freq,
                ..OscillatorReadout::default()
            },
        }
    }

    /// The configured drive.
    pub fn drive(&self) -> &Drive {
        &self.drive
    }

    /// Smoothed pointer position.
    pub fn pointer(&self) -> (f32, f32) {
        self.pointer
    }

    /// Where the smoothed pointer is heading.
    pub fn target(&self) -> (f32, f32) {
        self.target
    }

    /// Current keyboard oscillator frequency.
    pub fn keyboard_freq(&self) -> f32 {
        self.keyboard_freq
    }

    /// Oscillator readout, only for the oscillator drive.
    pub fn readout(&self) -> Option<OscillatorReadout> {
        matches!(self.drive, Drive::Oscillator(_)).then_some(self.readout)
    }

    /// Digit keys retune the keyboard oscillator and throw the pointer target into the
    /// matching tenth of the display. Other keys are ignored.
    pub fn press_key<R: Rng + ?Sized>(&mut self, key: char, rng: &mut R) {
        let Drive::Oscillator(osc) = &self.drive else {
            return;
        };
        let Some(digit) = key.to_digit(10) else {
            return;
        };
        let i = digit as f32;
        let width = self.display.width as f32;
        let height = self.display.height as f32;
        self.keyboard_freq = (osc.max_freq - osc.min_freq) / 10.0 * i + 1.0;
        self.target = (
            width / 10.0 * i + rng.gen_range(0.0..1.0f32) * (width / 10.0),
            rng.gen_range(0.0..1.0f32) * height,
        );
    }

    /// Fold one frame of input into cursor motion and frame parameters.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        input: &FrameInput,
        buffer_len: usize,
        step_frequency: f32,
        rng: &mut R,
    ) -> Modulation {
        if let Some(key) = input.key {
            self.press_key(key, rng);
        }
        if let Some(p) = input.pointer {
            self.target = p;
        }

        match self.drive.clone() {
            Drive::Constant {
                step,
                pixelate,
                posterize,
            } => Modulation {
                motion: CursorMotion::Advance(step),
                params: FrameParams {
                    pixelate,
                    posterize,
                    ..FrameParams::default()
                },
            },
            Drive::Oscillator(osc) => self.update_oscillators(&osc),
            Drive::Amplitude { gain } => {
                let level = input.amplitude.unwrap_or(0.0).max(0.0);
                let rms = (level * gain).min(1.0);
                Modulation {
                    motion: CursorMotion::Seek {
                        target: map_range(rms, 0.0, 1.0, 0.0, buffer_len as f32),
                        amt: step_frequency,
                    },
                    params: FrameParams::default(),
                }
            }
        }
    }

    fn update_oscillators(&mut self, osc: &OscillatorDrive) -> Modulation {
        let s = osc.pointer_smoothing;
        self.pointer = (
            lerp(self.pointer.0, self.target.0, s),
            lerp(self.pointer.1, self.target.1, s),
        );

        let width = self.display.width as f32;
        let height = self.display.height as f32;
        let (min, max) = (osc.min_freq, osc.max_freq);
        let freq = constrain(map_range(self.pointer.0, 0.0, width, min, max), min, max);
        let amp = constrain(map_range(self.pointer.1, height, 0.0, 0.0, 1.0), 0.0, 1.0);

        let pmin = self.pixelate_min as f32;
        let pmax = self.pixelate_max as f32;
        let pixelate = constrain(pmax - map_range(freq, min, max, pmin, pmax), 1.0, pmax).ceil();

        let qmin = osc.posterize_min as f32;
        let qmax = osc.posterize_max as f32;
        let levels = constrain(map_range(self.keyboard_freq, min, max, qmin, qmax), qmin, qmax);

        self.readout = OscillatorReadout {
            pointer_freq: freq,
            pointer_amp: amp,
            keyboard_freq: self.keyboard_freq,
        };

        Modulation {
            motion: CursorMotion::Advance(amp),
            params: FrameParams {
                pixelate: pixelate as u32,
                posterize: Some(levels.round() as u32),
                ..FrameParams::default()
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/modulation.rs"]
mod tests;

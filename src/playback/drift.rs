use crate::foundation::math;

/// Share of velocity an image keeps from one frame to the next.
pub const DEFAULT_DAMPING: f32 = 0.95;

/// Settings for pointer-attracted image drift.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    /// Velocity multiplier applied every frame, in `[0, 1)`.
    pub damping: f32,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
        }
    }
}

/// Position of the drawn image, pulled toward the pointer with unit acceleration.
///
/// Velocity is bounded by `damping / (1 - damping)`, so the image overshoots and circles
/// the pointer rather than snapping onto it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageDrift {
    position: (f32, f32),
    velocity: (f32, f32),
    damping: f32,
}

impl ImageDrift {
    /// Starts at rest in the top-left corner.
    pub fn new(config: DriftConfig) -> Self {
        Self {
            position: (0.0, 0.0),
            velocity: (0.0, 0.0),
            damping: math::constrain(config.damping, 0.0, 1.0),
        }
    }

    /// Current top-left corner in display pixels.
    pub fn position(&self) -> (f32, f32) {
        self.position
    }

    /// Displacement per frame.
    pub fn velocity(&self) -> (f32, f32) {
        self.velocity
    }

    /// Advance one frame toward `pointer` and return the new position.
    ///
    /// Position integrates the previous velocity; the pull toward the pointer lands in the
    /// velocity for the next frame.
    pub fn update(&mut self, pointer: (f32, f32)) -> (f32, f32) {
        let pull = unit_toward(self.position, pointer);
        self.position.0 += self.velocity.0;
        self.position.1 += self.velocity.1;
        self.velocity = (
            (self.velocity.0 + pull.0) * self.damping,
            (self.velocity.1 + pull.1) * self.damping,
        );
        self.position
    }

    /// Whole-pixel offset of the image.
    pub fn offset(&self) -> (i64, i64) {
        (
            self.position.0.floor() as i64,
            self.position.1.floor() as i64,
        )
    }
}

// zero when the points coincide
fn unit_toward(from: (f32, f32), to: (f32, f32)) -> (f32, f32) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let len = dx.hypot(dy);
    if !len.is_finite() || len == 0.0 {
        return (0.0, 0.0);
    }
    (dx / len, dy / len)
}

#[cfg(test)]
#[path = "../../tests/unit/playback/drift.rs"]
mod tests;

use rand::Rng;

use crate::{
    foundation::error::{LoopError, LoopResult},
    latent::vector::LatentVector,
};

/// One interpolated latent vector on the closed path, in generation order.
#[derive(Clone, Debug, PartialEq)]
pub struct Waypoint {
    /// Position in the flattened path.
    pub index: usize,
    /// Segment `s` runs from anchor `s` to anchor `(s + 1) % anchors`.
    pub segment: usize,
    /// Step inside the segment; `amt == step * step_frequency`.
    pub step: usize,
    /// Interpolation amount from the segment's start anchor, in `[0, 1]`.
    pub amt: f32,
    /// The interpolated vector fed to the generator.
    pub latent: LatentVector,
}

/// A closed loop through latent space: the last segment returns to the first anchor.
#[derive(Clone, Debug)]
pub struct LatentPath {
    /// Sampled anchors, in visiting order.
    pub anchors: Vec<LatentVector>,
    /// Every interpolated waypoint, in generation order.
    pub waypoints: Vec<Waypoint>,
}

impl LatentPath {
    /// Number of waypoints.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether the path has no waypoints. Never true for a planned path.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Number of segments (one per anchor, the last closing the loop).
    pub fn segments(&self) -> usize {
        self.anchors.len()
    }
}

/// Upper bound on waypoints in one plan, across all segments.
///
/// Each waypoint carries a full latent vector and becomes one generator call.
pub const MAX_WAYPOINTS: usize = 65_536;

/// Number of waypoints emitted per segment for `amt = 0, f, 2f, ... <= 1`.
///
/// Counted as `floor(1/f) + 1` with a small tolerance, so `f = 0.1` gives 11 steps even
/// though `10 * 0.1` is not exactly 1 in binary. Frequencies so small that one segment
/// alone would exceed [`MAX_WAYPOINTS`] are rejected.
pub fn steps_per_segment(step_frequency: f32) -> LoopResult<usize> {
    if !step_frequency.is_finite() || step_frequency <= 0.0 || step_frequency > 1.0 {
        return Err(LoopError::validation(
            "step_frequency must be finite and in (0, 1]",
        ));
    }
    let steps = (1.0 / f64::from(step_frequency) + 1e-6).floor();
    if steps >= MAX_WAYPOINTS as f64 {
        return Err(LoopError::validation(format!(
            "step_frequency {step_frequency} needs more than {MAX_WAYPOINTS} waypoints per segment"
        )));
    }
    Ok(steps as usize + 1)
}

/// Total waypoints for `anchors` segments, or an error past [`MAX_WAYPOINTS`].
pub fn planned_waypoints(anchors: usize, step_frequency: f32) -> LoopResult<usize> {
    if anchors == 0 {
        return Err(LoopError::validation("anchors must be >= 1"));
    }
    let per_segment = steps_per_segment(step_frequency)?;
    anchors
        .checked_mul(per_segment)
        .filter(|total| *total <= MAX_WAYPOINTS)
        .ok_or_else(|| {
            LoopError::validation(format!(
                "{anchors} anchors x {per_segment} steps exceeds {MAX_WAYPOINTS} waypoints"
            ))
        })
}

/// Builds closed latent paths for a fixed anchor count and step frequency.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathPlanner {
    anchors: usize,
    step_frequency: f32,
    steps_per_segment: usize,
    planned_len: usize,
}

impl PathPlanner {
    /// Validates both inputs and the resulting waypoint count.
    pub fn new(anchors: usize, step_frequency: f32) -> LoopResult<Self> {
        let planned_len = planned_waypoints(anchors, step_frequency)?;
        Ok(Self {
            anchors,
            step_frequency,
            steps_per_segment: steps_per_segment(step_frequency)?,
            planned_len,
        })
    }

    /// Number of anchors, which is also the number of segments.
    pub fn anchors(&self) -> usize {
        self.anchors
    }

    /// Interpolation step between consecutive waypoints of a segment.
    pub fn step_frequency(&self) -> f32 {
        self.step_frequency
    }

    /// Waypoints emitted per segment, endpoints included.
    pub fn steps_per_segment(&self) -> usize {
        self.steps_per_segment
    }

    /// Total waypoints a plan will contain.
    pub fn planned_len(&self) -> usize {
        self.planned_len
    }

    /// The `amt` values of one segment, in order.
    pub fn amounts(&self) -> impl Iterator<Item = f32> + '_ {
        (0..self.steps_per_segment).map(move |step| self.amt_at(step))
    }

    fn amt_at(&self, step: usize) -> f32 {
        // Multiplying instead of accumulating keeps rounding from drifting past 1.
        (step as f32 * self.step_frequency).min(1.0)
    }

    /// Sample fresh anchors from `rng` and plan the loop through them.
    pub fn plan<R: Rng + ?Sized>(&self, rng: &mut R) -> LatentPath {
        let anchors = (0..self.anchors)
            .map(|_| LatentVector::sample(rng))
            .collect::<Vec<_>>();
        self.interpolate(anchors)
    }

    /// Plan the loop through caller-supplied anchors.
    pub fn plan_from_anchors(&self, anchors: Vec<LatentVector>) -> LoopResult<LatentPath> {
        if anchors.len() != self.anchors {
            return Err(LoopError::validation(format!(
                "expected {} anchors, got {}",
                self.anchors,
                anchors.len()
            )));
        }
        Ok(self.interpolate(anchors))
    }

    fn interpolate(&self, anchors: Vec<LatentVector>) -> LatentPath {
        let n = anchors.len();
        let mut waypoints = Vec::with_capacity(self.planned_len());
        for segment in 0..n {
            let from = &anchors[segment];
            let to = &anchors[(segment + 1) % n];
            for step in 0..self.steps_per_segment {
                let amt = self.amt_at(step);
                waypoints.push(Waypoint {
                    index: waypoints.len(),
                    segment,
                    step,
                    amt,
                    latent: from.lerp(to, amt),
                });
            }
        }
        LatentPath { anchors, waypoints }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/latent/path.rs"]
mod tests;

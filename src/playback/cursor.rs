use crate::foundation::math;

/// What happens when the cursor runs off the end of the buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapMode {
    /// Jump straight back to 0, dropping the fractional overshoot.
    #[default]
    Reset,
    /// Subtract the buffer length and keep the fractional phase.
    Carry,
}

/// Fractional index into the image buffer, moved once per rendered frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlaybackCursor {
    position: f32,
    wrap: WrapMode,
}

impl PlaybackCursor {
    /// A cursor at slot 0.
    pub fn new(wrap: WrapMode) -> Self {
        Self {
            position: 0.0,
            wrap,
        }
    }

    /// Fractional position.
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Configured wrap behaviour.
    pub fn wrap_mode(&self) -> WrapMode {
        self.wrap
    }

    /// Back to slot 0.
    pub fn reset(&mut self) {
        self.position = 0.0;
    }

    /// Move forward by `step` and return the slot to display.
    ///
    /// Negative or non-finite steps count as 0.
    pub fn advance(&mut self, step: f32, len: usize) -> Option<usize> {
        let step = if step.is_finite() { step.max(0.0) } else { 0.0 };
        self.position += step;
        self.wrap_into(len);
        self.index(len)
    }

    /// Ease toward `target` by `amt` instead of stepping; used by audio-level seeking.
    pub fn ease_toward(&mut self, target: f32, amt: f32, len: usize) -> Option<usize> {
        let target = math::constrain(target, 0.0, len as f32);
        let amt = math::constrain(amt, 0.0, 1.0);
        self.position = math::lerp(self.position, target, amt);
        self.wrap_into(len);
        self.index(len)
    }

    /// `floor(position)`, or `None` while the buffer is empty.
    pub fn index(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some((self.position.floor() as usize).min(len - 1))
    }

    fn wrap_into(&mut self, len: usize) {
        let len = len as f32;
        if self.position < len {
            return;
        }
        self.position = match self.wrap {
            WrapMode::Reset => 0.0,
            WrapMode::Carry if len > 0.0 => {
                let carried = self.position.rem_euclid(len);
                if carried < len { carried } else { 0.0 }
            }
            WrapMode::Carry => 0.0,
        };
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/cursor.rs"]
mod tests;

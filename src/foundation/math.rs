/// Linearly re-map `value` from `[start1, stop1]` onto `[start2, stop2]`.
///
/// The result is not clamped; pair with [`constrain`] when the input may leave its range.
/// A degenerate source range maps everything onto `start2`.
pub fn map_range(value: f32, start1: f32, stop1: f32, start2: f32, stop2: f32) -> f32 {
    let span = stop1 - start1;
    if span == 0.0 {
        return start2;
    }
    start2 + (stop2 - start2) * ((value - start1) / span)
}

/// Clamp `value` into `[low, high]`. NaN passes through as `low`.
pub fn constrain(value: f32, low: f32, high: f32) -> f32 {
    if value.is_nan() {
        return low;
    }
    value.max(low).min(high)
}

/// `from + (to - from) * amt`, evaluated so that `amt == 0` and `amt == 1` return the
/// endpoints bit-for-bit.
pub fn lerp(from: f32, to: f32, amt: f32) -> f32 {
    from * (1.0 - amt) + to * amt
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;

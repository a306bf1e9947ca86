use rand::Rng;

use crate::foundation::{
    core::LATENT_DIM,
    error::{LoopError, LoopResult},
    math,
};

/// A point in the generator's latent space.
///
/// The dimension is fixed by the type, so a vector can never be fed to the generator
/// with the wrong length.
#[derive(Clone, Debug, PartialEq)]
pub struct LatentVector([f32; LATENT_DIM]);

impl LatentVector {
    /// Draw every component independently and uniformly from `[-1, 1]`.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(std::array::from_fn(|_| rng.gen_range(-1.0f32..=1.0)))
    }

    /// Copy exactly [`LATENT_DIM`] components.
    pub fn from_slice(values: &[f32]) -> LoopResult<Self> {
        let arr: [f32; LATENT_DIM] = values.try_into().map_err(|_| {
            LoopError::validation(format!(
                "latent vector must have {LATENT_DIM} components, got {}",
                values.len()
            ))
        })?;
        Ok(Self(arr))
    }

    /// Componentwise linear interpolation toward `to`.
    ///
    /// `amt` is not clamped; values past 1 extrapolate beyond `to`.
    pub fn lerp(&self, to: &Self, amt: f32) -> Self {
        Self(std::array::from_fn(|i| math::lerp(self.0[i], to.0[i], amt)))
    }

    /// Components in order.
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Always [`LATENT_DIM`].
    pub fn len(&self) -> usize {
        LATENT_DIM
    }

    /// Always false.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether every component lies in `[-1, 1]`.
    pub fn in_unit_range(&self) -> bool {
        self.0.iter().all(|v| (-1.0..=1.0).contains(v))
    }
}

impl AsRef<[f32]> for LatentVector {
    fn as_ref(&self) -> &[f32] {
        &self.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/latent/vector.rs"]
mod tests;

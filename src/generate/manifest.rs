use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context as _;

use crate::foundation::{
    core::LATENT_DIM,
    error::{LoopError, LoopResult},
};

/// Describes which model to load and the raw image size it produces.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ModelManifest {
    /// Model name, used in logs.
    pub name: String,
    /// Generator implementation; only `gradient` is built in.
    #[serde(default = "default_kind")]
    pub kind: String,
    /// Input dimension; must equal [`LATENT_DIM`].
    #[serde(default = "default_latent_dim")]
    pub latent_dim: usize,
    /// Raw output width.
    pub width: u32,
    /// Raw output height.
    pub height: u32,
}

fn default_kind() -> String {
    "gradient".to_string()
}

fn default_latent_dim() -> usize {
    LATENT_DIM
}

impl ModelManifest {
    /// Read and validate a JSON manifest.
    pub fn load(path: &Path) -> LoopResult<Self> {
        let f = File::open(path)
            .with_context(|| format!("open model manifest '{}'", path.display()))?;
        let manifest: Self = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse model manifest '{}'", path.display()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Errors are [`LoopError::Config`].
    pub fn validate(&self) -> LoopResult<()> {
        if self.name.trim().is_empty() {
            return Err(LoopError::config("manifest name must be non-empty"));
        }
        if self.latent_dim != LATENT_DIM {
            return Err(LoopError::config(format!(
                "manifest latent_dim must be {LATENT_DIM}, got {}",
                self.latent_dim
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(LoopError::config("manifest width/height must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generate/manifest.rs"]
mod tests;

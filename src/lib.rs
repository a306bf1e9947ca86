//! Latentloop walks a pretrained image generator's latent space in a closed loop and plays the
//! results back as post-processed frames.
//!
//! # Pipeline overview
//!
//! 1. **Plan**: sample anchor [`LatentVector`]s and interpolate a closed [`LatentPath`]
//!    through them ([`PathPlanner`]).
//! 2. **Generate**: feed each waypoint to a [`LatentGenerator`], one call at a time, and
//!    append the resized results to an [`ImageBuffer`] ([`GenerationPipeline`]).
//! 3. **Select**: advance a [`PlaybackCursor`] once per frame, paced by a [`Drive`].
//! 4. **Post-process**: mosaic, recolor and posterize the selected image
//!    ([`PostProcessor`]) into a display-sized [`Raster`], optionally drifting toward the
//!    pointer ([`ImageDrift`]).
//!
//! [`Sketch`] ties these together behind a `Loading -> Ready -> Playing` lifecycle.
//!
//! Generator failures are logged and the waypoint is skipped, so the buffer can end up
//! shorter than the plan. Nothing here installs a `tracing` subscriber.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod foundation;
mod frame;
mod generate;
mod latent;
mod playback;
mod session;

pub use config::{ReadinessGate, SketchConfig};
pub use foundation::core::{Canvas, LATENT_DIM, Rgba8};
pub use foundation::error::{GenerationFailure, LoopError, LoopResult};
pub use foundation::math::{constrain, lerp, map_range};
pub use frame::post::{
    FrameParams, PostProcessor, pixelate, place, posterize_channel, posterize_in_place, shrink,
    speckle_in_place,
};
pub use frame::raster::Raster;
pub use generate::buffer::{GeneratedImage, ImageBuffer};
pub use generate::generator::{GradientGenerator, LatentGenerator, load_generator};
pub use generate::manifest::ModelManifest;
pub use generate::pipeline::{
    GenerationPipeline, GenerationReport, StepOutcome, generate_images, resize_to,
};
pub use latent::path::{
    LatentPath, MAX_WAYPOINTS, PathPlanner, Waypoint, planned_waypoints, steps_per_segment,
};
pub use latent::vector::LatentVector;
pub use playback::cursor::{PlaybackCursor, WrapMode};
pub use playback::drift::{DEFAULT_DAMPING, DriftConfig, ImageDrift};
pub use playback::modulation::{
    CursorMotion, Drive, FrameInput, Modulation, Modulator, OscillatorDrive, OscillatorReadout,
};
pub use session::{Phase, Sketch};

pub(crate) mod post;
pub(crate) mod raster;

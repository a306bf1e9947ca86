pub(crate) mod buffer;
pub(crate) mod generator;
pub(crate) mod manifest;
pub(crate) mod pipeline;

pub(crate) mod cursor;
pub(crate) mod drift;
pub(crate) mod modulation;

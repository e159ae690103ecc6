pub(crate) mod accumulator;
pub(crate) mod consolidate;
pub(crate) mod model;

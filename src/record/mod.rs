pub(crate) mod differ;
pub(crate) mod recorder;
pub(crate) mod registry;

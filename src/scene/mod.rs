pub(crate) mod hook;
pub(crate) mod node;
pub(crate) mod simple;

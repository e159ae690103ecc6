pub(crate) mod config;
pub(crate) mod manager;
pub(crate) mod player;

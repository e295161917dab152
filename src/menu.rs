pub(crate) mod builder;
pub(crate) mod config;
pub(crate) mod geometry;
pub(crate) mod manager;
pub(crate) mod motion;

// src/config/mod.rs
pub mod consts;
mod options;

pub use options::Config;

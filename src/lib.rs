// src/lib.rs
#[macro_use]
pub mod macros;

pub mod cli;
pub mod config;
pub mod core;
pub mod csv;
pub mod data;
pub mod error;
pub mod log;
pub mod poller;
pub mod progress;
pub mod reconcile;
pub mod runner;
pub mod scheduler;
pub mod scrape;
pub mod specs;
pub mod store;

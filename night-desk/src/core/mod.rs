//! Core runtime pieces: configuration

mod config;

pub use config::Config;

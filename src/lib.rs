//! The `blindtree` command line interface.

#![deny(missing_docs)]

pub mod commands;
pub mod config;

pub use config::Config;

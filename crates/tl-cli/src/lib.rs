//! Time log CLI library.
//!
//! This crate provides the command-line interface over `tl-core`.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, ViewArgs};
pub use config::{Config, ConfigError};

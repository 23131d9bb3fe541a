//! CLI subcommand implementations.

pub mod parse;
pub mod show;
pub mod view;
pub mod week;

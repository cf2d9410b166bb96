//! Subcommand implementations. Each returns the text to print.

pub mod config;
pub mod render;

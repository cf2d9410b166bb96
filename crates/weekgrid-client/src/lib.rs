//! weekgrid CLI: configuration, fetching and week rendering.
//!
//! This crate provides the `weekgrid` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod secret;

pub use cli::Cli;
pub use error::{ClientError, ClientResult};

//! Command-line interface module.

mod args;
pub mod build;
pub mod flatten;
pub mod info;
pub mod init;

pub use args::{BuildArgs, Cli, Commands};

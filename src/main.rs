//! nestcss - flatten nested CSS for static sites.

mod cli;
mod config;
mod css;
mod logger;
mod pipeline;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = SiteConfig::load(&cli)?;

    match &cli.command {
        Commands::Init { name, dry } => cli::init::new_site(&config, name.is_some(), *dry),
        Commands::Build { .. } => cli::build::build_site(&config, false).map(|_| ()),
        Commands::Flatten { input, output, .. } => {
            cli::flatten::flatten_file(&config, input, output.as_deref())
        }
        Commands::Info { pretty } => cli::info::print_info(&config, *pretty),
    }
}

//! Site configuration management for `nestcss.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── build      # [build], [build.css]
//! │   └── site       # [site.info]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! ├── util.rs        # Config discovery, path normalization
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! The loaded `SiteConfig` is immutable for the rest of the run and is
//! passed by reference to whatever needs it.

pub mod section;
pub mod types;
mod util;

pub use section::{
    AuthorInfo, BuildSectionConfig, CssConfig, CssStrategy, SiteMetadata, SiteSectionConfig,
};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};
pub use util::find_config_file;

use crate::{
    cli::{BuildArgs, Cli, Commands},
    log,
};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing nestcss.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub site: SiteSectionConfig,

    #[serde(default)]
    pub build: BuildSectionConfig,
}

impl SiteConfig {
    /// Load configuration for the given command.
    ///
    /// `init` never reads a config. `flatten` uses one if it can find it
    /// and falls back to defaults. `build` and `info` require it.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match &cli.command {
            Commands::Init { name, .. } => {
                let root = name.as_ref().map_or_else(|| cwd.clone(), |n| cwd.join(n));
                let mut config = Self::default();
                config.config_path = root.join(&cli.config);
                config.root = root;
                return Ok(config);
            }
            Commands::Flatten { .. } => match find_config_file(&cli.config, &cwd) {
                Some(path) => Self::from_path(&path)?,
                None => {
                    let mut config = Self::default();
                    config.root = cwd.clone();
                    config
                }
            },
            Commands::Build { .. } | Commands::Info { .. } => {
                let Some(path) = find_config_file(&cli.config, &cwd) else {
                    bail!(ConfigError::Validation(format!(
                        "config file '{}' not found, run 'nestcss init' to create one",
                        cli.config.display()
                    )));
                };
                Self::from_path(&path)?
            }
        };

        config.normalize_paths();
        config.apply_command_options(cli);
        config.validate_for(&cli.command)?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    #[cfg(test)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path, warning about unknown fields.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (mut config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        config.config_path = path.to_path_buf();
        config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Get path relative to the site root
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    /// Site metadata (`[site.info]`).
    pub fn metadata(&self) -> &SiteMetadata {
        &self.site.info
    }

    /// Absolute path of the bundle artifact.
    pub fn bundle_path(&self) -> PathBuf {
        self.build.output.join(&self.build.css.bundle)
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Build { build_args } => self.apply_build_args(build_args),
            Commands::Flatten { minify, .. } => {
                Self::update_option(&mut self.build.minify, minify.as_ref());
            }
            Commands::Init { .. } | Commands::Info { .. } => {}
        }
    }

    fn apply_build_args(&mut self, args: &BuildArgs) {
        crate::logger::set_verbose(args.verbose);

        Self::update_option(&mut self.build.minify, args.minify.as_ref());
        Self::update_option(&mut self.build.css.strategy, args.strategy.as_ref());
        self.build.clean = args.clean;
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    /// Resolve build directories against the site root.
    fn normalize_paths(&mut self) {
        let root = util::normalize_path(&self.root, Path::new(""));
        self.build.input = util::normalize_path(&self.build.input, &root);
        self.build.output = util::normalize_path(&self.build.output, &root);
        self.root = root;
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate the sections the command reads.
    ///
    /// Collects all validation errors and returns them at once.
    fn validate_for(&self, command: &Commands) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        match command {
            Commands::Build { .. } => {
                self.site.info.validate(&mut diag);
                self.build.validate(&mut diag);
            }
            Commands::Info { .. } => self.site.info.validate(&mut diag),
            Commands::Flatten { .. } | Commands::Init { .. } => {}
        }

        diag.print_warnings();
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config with minimal required `[site.info]` fields.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> SiteConfig {
    let config = format!("[site.info]\ntitle = \"Example\"\ndescription = \"Example\"\n{extra}");
    let (parsed, ignored) = SiteConfig::parse_with_ignored(&config).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

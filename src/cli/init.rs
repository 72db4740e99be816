//! Site initialization.
//!
//! Writes a starter `nestcss.toml` and a nested example stylesheet.

use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

use crate::{
    config::{SiteConfig, SiteMetadata},
    log,
};

/// Starter stylesheet, written to `<input>/styles.css`.
const STARTER_CSS: &str = r#"main {
  max-width: 42rem;
  margin: 0 auto;

  .card {
    padding: 1rem;

    &:hover {
      outline: 1px solid currentColor;
    }
  }
}
"#;

/// Generate `nestcss.toml` content.
pub fn generate_config_template() -> Result<String> {
    let starter = SiteConfig {
        site: crate::config::SiteSectionConfig {
            info: SiteMetadata {
                title: "My Site".into(),
                description: "A site with nested stylesheets".into(),
                ..SiteMetadata::default()
            },
        },
        ..SiteConfig::default()
    };

    let body = toml::to_string_pretty(&starter).context("Failed to render config template")?;
    Ok(format!(
        "# nestcss configuration file (v{})\n\n{body}",
        env!("CARGO_PKG_VERSION")
    ))
}

/// Create a new site rooted at `config.root`.
///
/// With `dry_run` only the config template is printed.
pub fn new_site(config: &SiteConfig, has_name: bool, dry_run: bool) -> Result<()> {
    let template = generate_config_template()?;
    if dry_run {
        print!("{template}");
        return Ok(());
    }

    let root = config.get_root();
    validate_target(root, &config.config_path, has_name)?;

    fs::create_dir_all(root)
        .with_context(|| format!("Failed to create directory '{}'", root.display()))?;
    fs::write(&config.config_path, template).with_context(|| {
        format!("Failed to write config file '{}'", config.config_path.display())
    })?;

    let input = root.join(&config.build.input);
    fs::create_dir_all(&input)
        .with_context(|| format!("Failed to create directory '{}'", input.display()))?;
    let stylesheet = input.join("styles.css");
    if !stylesheet.exists() {
        fs::write(&stylesheet, STARTER_CSS)
            .with_context(|| format!("Failed to write '{}'", stylesheet.display()))?;
    }

    log!("init"; "site initialized at {}", root.display());
    Ok(())
}

/// A named site must not exist yet; the current directory must not
/// already hold a config.
fn validate_target(root: &Path, config_path: &Path, has_name: bool) -> Result<()> {
    if has_name && root.exists() {
        bail!(
            "Directory '{}' already exists.\n\
             Choose a different name or remove the existing directory.",
            root.display()
        );
    }
    if config_path.exists() {
        bail!(
            "'{}' already exists, refusing to overwrite it",
            config_path.display()
        );
    }
    Ok(())
}

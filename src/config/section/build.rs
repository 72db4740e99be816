//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! input = "src"               # Scanned for content units (relative to site root)
//! output = "_site"            # Output directory (relative to site root)
//! minify = false              # Compact CSS output
//!
//! [build.css]
//! strategy = "bundle"         # bundle | template
//! bundle = "bundle.css"       # Bundle artifact name (bundle strategy)
//! extension = "css"           # Suffix claimed by the template compiler
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSectionConfig {
    /// Source directory scanned for content units.
    pub input: PathBuf,

    /// Output directory.
    pub output: PathBuf,

    /// Minify CSS output.
    pub minify: bool,

    /// Clean output directory before building (CLI only).
    #[serde(skip)]
    pub clean: bool,

    /// CSS pipeline settings.
    pub css: CssConfig,
}

impl Default for BuildSectionConfig {
    fn default() -> Self {
        Self {
            input: "src".into(),
            output: "_site".into(),
            minify: false,
            clean: false,
            css: CssConfig::default(),
        }
    }
}

impl BuildSectionConfig {
    /// Validate build configuration.
    ///
    /// `input` existence is only checked once paths are resolved against
    /// the site root, so callers pass the resolved directory.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.input.is_dir() {
            diag.error_with_hint(
                FieldPath::new("build.input"),
                format!("input directory not found: {}", self.input.display()),
                "create it or point `build.input` at your sources",
            );
        }
        if self.input == self.output {
            diag.error(
                FieldPath::new("build.output"),
                "output directory must differ from `build.input`",
            );
        } else if self.input.starts_with(&self.output) {
            diag.error_with_hint(
                FieldPath::new("build.output"),
                "output directory contains `build.input`, cleaning it would delete the sources",
                "use a sibling directory such as \"_site\"",
            );
        } else if self.output.starts_with(&self.input) {
            diag.error_with_hint(
                FieldPath::new("build.output"),
                "output directory is inside `build.input`, earlier output would be read back in",
                "move `build.input` into its own directory, e.g. \"src\"",
            );
        }
        self.css.validate(diag);
    }
}

/// Where the flattener hooks into the build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CssStrategy {
    /// Transform every css unit, then concatenate them into one bundle.
    #[default]
    Bundle,
    /// Compile each stylesheet on its own, keeping its path.
    Template,
}

impl CssStrategy {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bundle => "bundle",
            Self::Template => "template",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CssConfig {
    pub strategy: CssStrategy,

    /// Bundle file name, relative to the output directory.
    pub bundle: PathBuf,

    /// File suffix handled by the template compiler (without the dot).
    pub extension: String,
}

impl Default for CssConfig {
    fn default() -> Self {
        Self {
            strategy: CssStrategy::Bundle,
            bundle: "bundle.css".into(),
            extension: "css".into(),
        }
    }
}

pub struct CssConfigFields {
    pub strategy: FieldPath,
    pub bundle: FieldPath,
    pub extension: FieldPath,
}

impl CssConfig {
    pub const FIELDS: CssConfigFields = CssConfigFields {
        strategy: FieldPath::new("build.css.strategy"),
        bundle: FieldPath::new("build.css.bundle"),
        extension: FieldPath::new("build.css.extension"),
    };

    /// Validate CSS configuration.
    ///
    /// # Checks
    /// - `bundle` must be a non-empty relative path that stays inside output
    /// - `extension` must be a bare suffix (no dot, no separator)
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.bundle.as_os_str().is_empty() {
            diag.error(Self::FIELDS.bundle, "bundle file name is empty");
        } else if !is_contained(&self.bundle) {
            diag.error_with_hint(
                Self::FIELDS.bundle,
                format!("{} escapes the output directory", self.bundle.display()),
                "use a relative path like \"css/bundle.css\"",
            );
        }

        let ext = self.extension.as_str();
        if ext.is_empty() {
            diag.error(Self::FIELDS.extension, "extension is empty");
        } else if ext.starts_with('.') || ext.contains(['/', '\\']) {
            diag.error_with_hint(
                Self::FIELDS.extension,
                format!("'{ext}' is not a bare file suffix"),
                format!("write it without the dot, e.g. \"{}\"", ext.trim_start_matches('.')),
            );
        }
    }
}

/// Relative path with no `..`, root or prefix components.
fn is_contained(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use std::fs;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.build.input, PathBuf::from("src"));
        assert_eq!(config.build.output, PathBuf::from("_site"));
        assert!(!config.build.minify);
        assert_eq!(config.build.css.strategy, CssStrategy::Bundle);
        assert_eq!(config.build.css.bundle, PathBuf::from("bundle.css"));
        assert_eq!(config.build.css.extension, "css");
    }

    #[test]
    fn test_template_strategy() {
        let config = test_parse_config(
            r#"
[build]
input = "content"
minify = true

[build.css]
strategy = "template"
extension = "pcss"
"#,
        );
        assert_eq!(config.build.input, PathBuf::from("content"));
        assert!(config.build.minify);
        assert_eq!(config.build.css.strategy, CssStrategy::Template);
        assert_eq!(config.build.css.extension, "pcss");
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let result: Result<CssConfig, _> = toml::from_str("strategy = \"inline\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_bundle_escape() {
        let css = CssConfig {
            bundle: "../outside.css".into(),
            ..CssConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        css.validate(&mut diag);
        assert!(diag.errors().iter().any(|e| e.field == CssConfig::FIELDS.bundle));
    }

    #[test]
    fn test_validate_dotted_extension() {
        let css = CssConfig {
            extension: ".css".into(),
            ..CssConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        css.validate(&mut diag);
        let err = &diag.errors()[0];
        assert_eq!(err.field, CssConfig::FIELDS.extension);
        assert!(err.hint.as_deref().is_some_and(|h| h.contains("\"css\"")));
    }

    #[test]
    fn test_validate_default_css_ok() {
        let mut diag = ConfigDiagnostics::new();
        CssConfig::default().validate(&mut diag);
        assert!(!diag.has_errors());
    }

    #[test]
    fn test_validate_missing_input() {
        let build = BuildSectionConfig {
            input: "/definitely/not/here".into(),
            ..BuildSectionConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        build.validate(&mut diag);
        assert!(diag.has_errors());
    }

    #[test]
    fn test_validate_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src")).unwrap();

        for (input, output) in [(root.join("src"), root.to_path_buf()), (root.to_path_buf(), root.join("_site"))] {
            let build = BuildSectionConfig {
                input,
                output,
                ..BuildSectionConfig::default()
            };
            let mut diag = ConfigDiagnostics::new();
            build.validate(&mut diag);
            assert!(
                diag.errors().iter().any(|e| e.field == FieldPath::new("build.output")),
                "{} / {}",
                build.input.display(),
                build.output.display()
            );
        }
    }

    #[test]
    fn test_validate_sibling_directories_ok() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src")).unwrap();

        let build = BuildSectionConfig {
            input: root.join("src"),
            output: root.join("_site"),
            ..BuildSectionConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        build.validate(&mut diag);
        assert!(!diag.has_errors());
    }
}

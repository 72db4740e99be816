//! Content pipeline: units, extension points and the two CSS adapters.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────── bundle strategy ───────────────┐
//! │  units -> Transform* (per unit, parallel)      │
//! │        -> Bundle (css units, input order)      │
//! └────────────────────────────────────────────────┘
//!
//! ┌────────────── template strategy ──────────────┐
//! │  unit -> TemplateCompiler::prepare             │
//! │       -> CompileTask::run (deferred)           │
//! └────────────────────────────────────────────────┘
//! ```
//!
//! The strategy is picked from `[build.css].strategy`, see [`CssPipeline`].

pub mod bundle;
pub mod scan;
pub mod template;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{BuildSectionConfig, CssStrategy};
use crate::css::{Flattener, MalformedStylesheetError};

pub use bundle::{Bundle, Bundler, CssBundleTransform};
pub use template::{CssTemplate, TemplateRegistry};

// =============================================================================
// Content units
// =============================================================================

/// Type tag of a content unit, derived from the file extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContentType {
    Css,
    Html,
    Js,
    /// Any other extension (lowercased, may be empty).
    Other(String),
}

impl ContentType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "css" => Self::Css,
            "html" | "htm" => Self::Html,
            "js" | "mjs" => Self::Js,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn from_path(path: &Path) -> Self {
        Self::from_extension(path.extension().and_then(|e| e.to_str()).unwrap_or_default())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Css => "css",
            Self::Html => "html",
            Self::Js => "js",
            Self::Other(ext) => ext,
        }
    }
}

/// One piece of source text flowing through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentUnit {
    pub path: PathBuf,
    pub kind: ContentType,
    pub text: String,
}

impl ContentUnit {
    /// Create a unit, tagging it from the path's extension.
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            kind: ContentType::from_path(&path),
            path,
            text: text.into(),
        }
    }

}

// =============================================================================
// Extension points
// =============================================================================

/// What a transform may look at besides the text itself.
#[derive(Debug, Clone, Copy)]
pub struct TransformContext<'a> {
    pub kind: &'a ContentType,
    pub path: &'a Path,
}

/// A post-processing step run once per content unit.
///
/// Receives the unit's current text and returns the replacement. Units a
/// transform does not care about must come back unchanged.
pub trait Transform: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(
        &self,
        content: String,
        ctx: &TransformContext<'_>,
    ) -> Result<String, MalformedStylesheetError>;
}

/// Deferred result of a template compile.
///
/// Each `run` performs the full transform again; nothing is cached.
pub trait CompileTask: Send + Sync {
    fn source_path(&self) -> &Path;

    fn run(&self) -> Result<String, MalformedStylesheetError>;
}

/// A template language keyed by file suffix.
pub trait TemplateCompiler: Send + Sync {
    /// Suffix claimed by this compiler (without the dot).
    fn extension(&self) -> &str;

    /// Suffix of compiled output (without the dot).
    fn output_extension(&self) -> &str;

    /// Capture `source` for later compilation. Never fails and does no work.
    fn prepare(&self, source: String, path: &Path) -> Box<dyn CompileTask>;
}

// =============================================================================
// Strategy selection
// =============================================================================

/// The CSS adapter selected by configuration.
pub enum CssPipeline {
    Bundle(Bundler),
    Template(TemplateRegistry),
}

impl CssPipeline {
    pub fn from_config(build: &BuildSectionConfig) -> Self {
        let flattener = Flattener::new().with_minify(build.minify);
        match build.css.strategy {
            CssStrategy::Bundle => {
                Self::Bundle(Bundler::new().with_transform(CssBundleTransform::new(flattener)))
            }
            CssStrategy::Template => {
                let mut registry = TemplateRegistry::new();
                registry.register(CssTemplate::new(&build.css.extension, flattener));
                Self::Template(registry)
            }
        }
    }

    pub const fn strategy(&self) -> CssStrategy {
        match self {
            Self::Bundle(_) => CssStrategy::Bundle,
            Self::Template(_) => CssStrategy::Template,
        }
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Errors surfaced to the build orchestrator.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Stylesheet(#[from] MalformedStylesheetError),

    #[error("IO error on `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to walk `{}`", .0.display())]
    Walk(PathBuf, #[source] jwalk::Error),
}

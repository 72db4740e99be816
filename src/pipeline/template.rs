//! Template strategy.
//!
//! Stylesheets are a template language of their own: each `.css` source is
//! compiled on its own and written back under the same suffix. Compiling is
//! two-phase, `prepare` captures the source, `CompileTask::run` flattens it.

use std::path::{Path, PathBuf};

use super::{CompileTask, TemplateCompiler};
use crate::css::{Flattener, MalformedStylesheetError};

/// Compiler for nested stylesheets.
#[derive(Debug, Clone)]
pub struct CssTemplate {
    extension: String,
    flattener: Flattener,
}

impl CssTemplate {
    pub fn new(extension: &str, flattener: Flattener) -> Self {
        Self {
            extension: extension.trim_start_matches('.').to_ascii_lowercase(),
            flattener,
        }
    }
}

impl TemplateCompiler for CssTemplate {
    fn extension(&self) -> &str {
        &self.extension
    }

    fn output_extension(&self) -> &str {
        &self.extension
    }

    fn prepare(&self, source: String, path: &Path) -> Box<dyn CompileTask> {
        Box::new(CssCompileTask {
            source,
            path: path.to_path_buf(),
            flattener: self.flattener,
        })
    }
}

/// A captured stylesheet waiting to be flattened.
#[derive(Debug, Clone)]
pub struct CssCompileTask {
    source: String,
    path: PathBuf,
    flattener: Flattener,
}

impl CompileTask for CssCompileTask {
    fn source_path(&self) -> &Path {
        &self.path
    }

    fn run(&self) -> Result<String, MalformedStylesheetError> {
        self.flattener.flatten(&self.source, &self.path)
    }
}

/// Registered template compilers, looked up by file suffix.
#[derive(Default)]
pub struct TemplateRegistry {
    compilers: Vec<Box<dyn TemplateCompiler>>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a compiler. A later registration for the same suffix wins.
    pub fn register(&mut self, compiler: impl TemplateCompiler + 'static) {
        let ext = compiler.extension().to_string();
        self.compilers.retain(|c| c.extension() != ext);
        self.compilers.push(Box::new(compiler));
    }

    pub fn extensions(&self) -> Vec<&str> {
        self.compilers.iter().map(|c| c.extension()).collect()
    }

    /// Compiler responsible for `path`, by case-insensitive suffix.
    pub fn find(&self, path: &Path) -> Option<&dyn TemplateCompiler> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        self.compilers
            .iter()
            .find(|c| c.extension() == ext)
            .map(|c| c.as_ref())
    }

    /// Output location for a compiled template.
    ///
    /// `rel` is the source path relative to the input directory.
    pub fn output_path(compiler: &dyn TemplateCompiler, output_dir: &Path, rel: &Path) -> PathBuf {
        output_dir.join(rel).with_extension(compiler.output_extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TemplateRegistry {
        let mut registry = TemplateRegistry::new();
        registry.register(CssTemplate::new("css", Flattener::new()));
        registry
    }

    #[test]
    fn test_output_extension_matches_suffix() {
        let compiler = CssTemplate::new(".PCSS", Flattener::new());
        assert_eq!(compiler.extension(), "pcss");
        assert_eq!(compiler.output_extension(), "pcss");
    }

    #[test]
    fn test_prepare_is_lazy() {
        let registry = registry();
        let compiler = registry.find(Path::new("broken.css")).unwrap();

        // Malformed input: prepare must still succeed.
        let task = compiler.prepare(".a { color: }".into(), Path::new("broken.css"));
        assert_eq!(task.source_path(), Path::new("broken.css"));

        let err = task.run().unwrap_err();
        assert_eq!(err.path, Path::new("broken.css"));
    }

    #[test]
    fn test_run_flattens() {
        let compiler = CssTemplate::new("css", Flattener::new());
        let task = compiler.prepare(
            ".a { color: red; .b { color: blue; } }".into(),
            Path::new("site.css"),
        );
        let out = task.run().unwrap();
        assert!(out.contains(".a .b"), "got: {out}");
    }

    #[test]
    fn test_run_repeats_work() {
        let compiler = CssTemplate::new("css", Flattener::new());
        let task = compiler.prepare(".a { .b { margin: 0; } }".into(), Path::new("x.css"));
        assert_eq!(task.run().unwrap(), task.run().unwrap());

        let broken = compiler.prepare(".a { color: }".into(), Path::new("y.css"));
        assert!(broken.run().is_err());
        assert!(broken.run().is_err());
    }

    #[test]
    fn test_find_by_suffix() {
        let registry = registry();
        assert!(registry.find(Path::new("styles/main.css")).is_some());
        assert!(registry.find(Path::new("styles/MAIN.CSS")).is_some());
        assert!(registry.find(Path::new("index.html")).is_none());
        assert!(registry.find(Path::new("Makefile")).is_none());
    }

    #[test]
    fn test_register_replaces_same_suffix() {
        let mut registry = registry();
        registry.register(CssTemplate::new("css", Flattener::new().with_minify(true)));
        assert_eq!(registry.extensions(), vec!["css"]);
    }

    #[test]
    fn test_output_path() {
        let compiler = CssTemplate::new("css", Flattener::new());
        assert_eq!(
            TemplateRegistry::output_path(&compiler, Path::new("/out"), Path::new("a/b.css")),
            PathBuf::from("/out/a/b.css")
        );
    }
}

//! Bundle strategy.
//!
//! Every unit goes through the registered transforms; css units come out
//! flattened, everything else byte-identical. The css units are then
//! concatenated, in input order, into one bundle artifact.

use rayon::prelude::*;

use super::{ContentType, ContentUnit, Transform, TransformContext};
use crate::css::{Flattener, MalformedStylesheetError};
use crate::logger::ProgressLine;

/// Flattens units tagged `css`, passes the rest through.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssBundleTransform {
    flattener: Flattener,
}

impl CssBundleTransform {
    pub const fn new(flattener: Flattener) -> Self {
        Self { flattener }
    }
}

impl Transform for CssBundleTransform {
    fn name(&self) -> &'static str {
        "css-nesting"
    }

    fn apply(
        &self,
        content: String,
        ctx: &TransformContext<'_>,
    ) -> Result<String, MalformedStylesheetError> {
        if *ctx.kind != ContentType::Css {
            return Ok(content);
        }
        self.flattener.flatten(&content, ctx.path)
    }
}

/// Ordered list of transforms applied to each unit.
#[derive(Default)]
pub struct Bundler {
    transforms: Vec<Box<dyn Transform>>,
}

impl Bundler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transform(mut self, transform: impl Transform + 'static) -> Self {
        self.transforms.push(Box::new(transform));
        self
    }

    pub fn transform_names(&self) -> Vec<&'static str> {
        self.transforms.iter().map(|t| t.name()).collect()
    }

    /// Run every transform, in registration order, on one unit.
    pub fn process_unit(&self, unit: ContentUnit) -> Result<ContentUnit, MalformedStylesheetError> {
        let ContentUnit { path, kind, text } = unit;
        let ctx = TransformContext {
            kind: &kind,
            path: &path,
        };

        let mut text = text;
        for transform in &self.transforms {
            text = transform.apply(text, &ctx)?;
        }

        Ok(ContentUnit { path, kind, text })
    }

    /// Process all units in parallel.
    ///
    /// Output positions match input positions. Any failure aborts the run
    /// and no partial result is returned.
    pub fn process(
        &self,
        units: Vec<ContentUnit>,
        progress: Option<&ProgressLine>,
    ) -> Result<Vec<ContentUnit>, MalformedStylesheetError> {
        units
            .into_par_iter()
            .map(|unit| -> Result<ContentUnit, MalformedStylesheetError> {
                let counter = progress_counter(&unit.kind);
                let processed = self.process_unit(unit)?;
                if let Some(p) = progress {
                    p.inc(counter);
                }
                Ok(processed)
            })
            .collect()
    }

    /// Process units and gather the css ones into a bundle.
    pub fn bundle(
        &self,
        units: Vec<ContentUnit>,
        progress: Option<&ProgressLine>,
    ) -> Result<Bundle, MalformedStylesheetError> {
        let processed = self.process(units, progress)?;
        Ok(Bundle::collect(ContentType::Css, processed))
    }
}

/// Counter name used for a unit in the build progress line.
pub fn progress_counter(kind: &ContentType) -> &'static str {
    match kind {
        ContentType::Css => "css",
        _ => "other",
    }
}

/// Processed units of one type, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    parts: Vec<ContentUnit>,
}

impl Bundle {
    /// Keep the units tagged `kind`, preserving their order.
    pub fn collect(kind: ContentType, units: Vec<ContentUnit>) -> Self {
        let parts = units.into_iter().filter(|u| u.kind == kind).collect();
        Self { parts }
    }

    #[cfg(test)]
    pub fn parts(&self) -> &[ContentUnit] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// The artifact text: each part followed by a newline.
    pub fn concat(&self) -> String {
        let capacity = self.parts.iter().map(|p| p.text.len() + 1).sum();
        let mut out = String::with_capacity(capacity);
        for part in &self.parts {
            out.push_str(&part.text);
            if !part.text.ends_with('\n') {
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn css_bundler() -> Bundler {
        Bundler::new().with_transform(CssBundleTransform::new(Flattener::new()))
    }

    /// Appends a marker so transform ordering is observable.
    struct Marker(&'static str);

    impl Transform for Marker {
        fn name(&self) -> &'static str {
            self.0
        }

        fn apply(
            &self,
            content: String,
            _ctx: &TransformContext<'_>,
        ) -> Result<String, MalformedStylesheetError> {
            Ok(format!("{content}{}", self.0))
        }
    }

    #[test]
    fn test_non_css_passes_through() {
        let transform = CssBundleTransform::default();
        let html = "<p>.a { .b { } }</p>";
        let ctx = TransformContext {
            kind: &ContentType::Html,
            path: Path::new("index.html"),
        };
        assert_eq!(transform.apply(html.to_string(), &ctx).unwrap(), html);
    }

    #[test]
    fn test_order_preserved_and_only_css_changes() {
        let units = vec![
            ContentUnit::new("one.css", ".a { .b { color: red; } }"),
            ContentUnit::new("two.html", "<div class=\"a\"></div>"),
            ContentUnit::new("three.css", ".c { &:hover { color: blue; } }"),
        ];
        let before = units.clone();

        let out = css_bundler().process(units, None).unwrap();

        assert_eq!(out.len(), 3);
        for (orig, done) in before.iter().zip(&out) {
            assert_eq!(orig.path, done.path);
            assert_eq!(orig.kind, done.kind);
        }
        assert_eq!(out[1].text, before[1].text);
        assert!(out[0].text.contains(".a .b"));
        assert!(out[2].text.contains(".c:hover"));
    }

    #[test]
    fn test_failure_aborts_whole_run() {
        let units = vec![
            ContentUnit::new("ok.css", ".a { color: red; }"),
            ContentUnit::new("broken.css", ".a { color: }"),
            ContentUnit::new("page.html", "<p></p>"),
        ];

        let err = css_bundler().process(units, None).unwrap_err();
        assert_eq!(err.path, Path::new("broken.css"));
    }

    #[test]
    fn test_transforms_run_in_registration_order() {
        let bundler = Bundler::new().with_transform(Marker("1")).with_transform(Marker("2"));
        assert_eq!(bundler.transform_names(), vec!["1", "2"]);

        let unit = bundler
            .process_unit(ContentUnit::new("x.txt", "x"))
            .unwrap();
        assert_eq!(unit.text, "x12");
    }

    #[test]
    fn test_bundle_concat_keeps_css_in_order() {
        let units = vec![
            ContentUnit::new("b.css", ".b { .x { margin: 0; } }"),
            ContentUnit::new("page.html", "<p></p>"),
            ContentUnit::new("a.css", ".a { padding: 0; }"),
        ];

        let bundle = css_bundler().bundle(units, None).unwrap();
        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle.parts()[0].path, Path::new("b.css"));

        let text = bundle.concat();
        let b = text.find(".b .x").unwrap();
        let a = text.find(".a").unwrap();
        assert!(b < a);
        assert!(!text.contains("<p>"));
    }

    #[test]
    fn test_concat_separates_parts() {
        let bundle = Bundle::collect(
            ContentType::Css,
            vec![
                ContentUnit::new("a.css", ".a{margin:0}"),
                ContentUnit::new("b.css", ".b{margin:0}\n"),
            ],
        );
        assert_eq!(bundle.concat(), ".a{margin:0}\n.b{margin:0}\n");
    }

    #[test]
    fn test_empty_bundle() {
        let bundle = css_bundler().bundle(Vec::new(), None).unwrap();
        assert!(bundle.is_empty());
        assert_eq!(bundle.concat(), "");
    }
}

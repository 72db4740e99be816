//! Build orchestration.
//!
//! Build phases:
//! - **Init** - prepare (and optionally clean) the output directory
//! - **Collect** - read content units from `[build].input`
//! - **Compile** - run the configured CSS strategy in parallel
//! - **Write** - bundle artifact or one file per stylesheet
//!
//! Any stylesheet failure aborts the build before anything is written.

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{
    config::{CssStrategy, SiteConfig},
    debug, log,
    logger::ProgressLine,
    pipeline::{
        Bundler, ContentType, ContentUnit, CssPipeline, PipelineError, TemplateRegistry, scan,
    },
    utils::plural_count,
};

/// What a finished build produced.
#[derive(Debug)]
pub struct BuildReport {
    pub strategy: CssStrategy,
    /// Number of content units read.
    pub inputs: usize,
    /// Files written, in write order.
    pub outputs: Vec<PathBuf>,
}

/// Build the site with the strategy selected in config.
pub fn build_site(config: &SiteConfig, quiet: bool) -> Result<BuildReport> {
    init_output(&config.build.output, &config.build.input, config.build.clean)?;

    let units = scan::collect_units(&config.build.input, Some(config.build.output.as_path()))?;
    let inputs = units.len();
    debug!("build"; "collected {} from {}", plural_count(inputs, "file"), config.build.input.display());

    let pipeline = CssPipeline::from_config(&config.build);
    let strategy = pipeline.strategy();
    let outputs = match pipeline {
        CssPipeline::Bundle(bundler) => vec![run_bundle(&bundler, units, config, quiet)?],
        CssPipeline::Template(registry) => run_templates(&registry, units, config, quiet)?,
    };

    if !quiet {
        log!(
            "build";
            "done, {} written ({} strategy)",
            plural_count(outputs.len(), "file"),
            strategy.name()
        );
    }

    Ok(BuildReport {
        strategy,
        inputs,
        outputs,
    })
}

/// Create the output directory, removing it first on `--clean`.
///
/// Never clears a directory that holds the sources.
fn init_output(output: &Path, input: &Path, clean: bool) -> Result<()> {
    if clean && input.starts_with(output) {
        bail!(
            "refusing to clean {}: it contains the input directory {}",
            output.display(),
            input.display()
        );
    }
    if clean && output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("Failed to clear output directory: {}", output.display()))?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))
}

fn create_progress(units: &[ContentUnit], quiet: bool) -> Option<ProgressLine> {
    if quiet {
        return None;
    }
    let css = units.iter().filter(|u| u.kind == ContentType::Css).count();
    Some(ProgressLine::new(&[("css", css), ("other", units.len() - css)]))
}

// =============================================================================
// Bundle strategy
// =============================================================================

fn run_bundle(
    bundler: &Bundler,
    units: Vec<ContentUnit>,
    config: &SiteConfig,
    quiet: bool,
) -> Result<PathBuf> {
    debug!("bundle"; "transforms: {}", bundler.transform_names().join(", "));
    let progress = create_progress(&units, quiet);

    let bundle = match bundler.bundle(units, progress.as_ref()) {
        Ok(bundle) => bundle,
        Err(e) => {
            drop(progress);
            return Err(PipelineError::from(e).into());
        }
    };
    if let Some(p) = progress {
        p.finish();
    }

    if bundle.is_empty() && !quiet {
        log!("warning"; "no stylesheets under {}", config.root_relative(&config.build.input).display());
    }

    let dest = config.bundle_path();
    write_output(&dest, &bundle.concat())?;

    if !quiet {
        log!(
            "bundle";
            "{} -> {}",
            plural_count(bundle.len(), "stylesheet"),
            config.root_relative(&dest).display()
        );
    }
    Ok(dest)
}

// =============================================================================
// Template strategy
// =============================================================================

fn run_templates(
    registry: &TemplateRegistry,
    units: Vec<ContentUnit>,
    config: &SiteConfig,
    quiet: bool,
) -> Result<Vec<PathBuf>> {
    let input = &config.build.input;
    let output = &config.build.output;

    debug!("template"; "compilers: {}", registry.extensions().join(", "));

    // Phase one: register every matching source. Nothing is flattened yet.
    let tasks: Vec<_> = units
        .into_iter()
        .filter_map(|unit| {
            let compiler = registry.find(&unit.path)?;
            let rel = unit.path.strip_prefix(input).unwrap_or(&unit.path).to_path_buf();
            let dest = TemplateRegistry::output_path(compiler, output, &rel);
            Some((dest, compiler.prepare(unit.text, &unit.path)))
        })
        .collect();

    let progress = if quiet {
        None
    } else {
        Some(ProgressLine::new(&[("css", tasks.len())]))
    };

    // Phase two: run the deferred compiles.
    let compiled: Result<Vec<_>, PipelineError> = tasks
        .par_iter()
        .map(|(dest, task)| -> Result<(PathBuf, String), PipelineError> {
            debug!("template"; "compiling {}", config.root_relative(task.source_path()).display());
            let css = task.run()?;
            if let Some(p) = &progress {
                p.inc("css");
            }
            Ok((dest.clone(), css))
        })
        .collect();

    let compiled = match compiled {
        Ok(compiled) => compiled,
        Err(e) => {
            drop(progress);
            return Err(e.into());
        }
    };
    if let Some(p) = progress {
        p.finish();
    }

    let mut written = Vec::with_capacity(compiled.len());
    for (dest, css) in compiled {
        write_output(&dest, &css)?;
        debug!("template"; "wrote {}", config.root_relative(&dest).display());
        written.push(dest);
    }

    if !quiet {
        log!("template"; "compiled {}", plural_count(written.len(), "stylesheet"));
    }
    Ok(written)
}

fn write_output(dest: &Path, content: &str) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(dest, content).map_err(|e| PipelineError::Io(dest.to_path_buf(), e))?;
    Ok(())
}

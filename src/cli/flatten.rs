//! `flatten` command: one stylesheet in, flat CSS out.

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::{config::SiteConfig, css::Flattener, debug};

/// Name used in diagnostics when the stylesheet comes from stdin.
const STDIN_NAME: &str = "<stdin>";

/// Flatten `input` (or stdin for `-`) and write to `output` (or stdout).
pub fn flatten_file(config: &SiteConfig, input: &Path, output: Option<&Path>) -> Result<()> {
    let (source, origin) = read_source(input)?;
    let flattener = Flattener::new().with_minify(config.build.minify);

    let css = flattener.flatten(&source, &origin)?;

    match output {
        Some(dest) => {
            if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
            fs::write(dest, &css)
                .with_context(|| format!("Failed to write '{}'", dest.display()))?;
            debug!("flatten"; "{} -> {}", origin.display(), dest.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(css.as_bytes())?;
            if !css.is_empty() && !css.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Read the source text and the path to report it under.
fn read_source(input: &Path) -> Result<(String, PathBuf)> {
    if input == Path::new("-") {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("Failed to read stylesheet from stdin")?;
        return Ok((source, PathBuf::from(STDIN_NAME)));
    }

    let source = fs::read_to_string(input)
        .with_context(|| format!("Failed to read '{}'", input.display()))?;
    Ok((source, input.to_path_buf()))
}

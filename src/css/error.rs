//! Stylesheet error type.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Source position of a diagnostic (both 1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePos {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Input could not be parsed (or printed) as CSS.
///
/// Carries the path the stylesheet was read from and the parser's message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed stylesheet {}{}: {message}", .path.display(), pos_suffix(.pos))]
pub struct MalformedStylesheetError {
    pub path: PathBuf,
    pub message: String,
    pub pos: Option<SourcePos>,
}

/// `:line:column` when a position is known.
fn pos_suffix(pos: &Option<SourcePos>) -> String {
    pos.map(|p| format!(":{p}")).unwrap_or_default()
}

impl MalformedStylesheetError {
    pub fn new(path: &Path, message: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            message: message.into(),
            pos: None,
        }
    }

    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.pos = Some(SourcePos { line, column });
        self
    }
}

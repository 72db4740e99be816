//! Nested CSS flattening.
//!
//! Parses stylesheet text with lightningcss and prints it back with the
//! `Nesting` feature forced into the compile set, so every nested rule is
//! rewritten as a flat rule (`.a { .b {} }` becomes `.a .b {}`, `&` is
//! replaced by the parent selector).

use std::fmt;
use std::path::Path;

use lightningcss::error::Error as CssError;
use lightningcss::properties::Property;
use lightningcss::properties::custom::{Token, TokenOrValue};
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Features, Targets};
use lightningcss::visitor::{Visit, VisitTypes, Visitor};

use super::{MalformedStylesheetError, SourcePos};

/// Flattens nested stylesheets. Cheap to copy; holds only print options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flattener {
    minify: bool,
}

impl Flattener {
    pub const fn new() -> Self {
        Self { minify: false }
    }

    /// Emit compact output (and run lightningcss' minifier first).
    pub const fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    /// Flatten `source`, read from `path`.
    ///
    /// `path` is only used for diagnostics. Parsing runs without error
    /// recovery: the first invalid rule or declaration fails the whole sheet.
    pub fn flatten(&self, source: &str, path: &Path) -> Result<String, MalformedStylesheetError> {
        let options = ParserOptions {
            filename: path.display().to_string(),
            error_recovery: false,
            ..ParserOptions::default()
        };

        if let Some(pos) = unclosed_block(source) {
            return Err(MalformedStylesheetError::new(path, "unclosed block").at(pos.line, pos.column));
        }
        let mut sheet = StyleSheet::parse(source, options).map_err(|e| malformed(path, e))?;
        reject_empty_values(&mut sheet, path)?;

        if self.minify {
            sheet
                .minify(MinifyOptions {
                    targets: flat_targets(),
                    ..MinifyOptions::default()
                })
                .map_err(|e| malformed(path, e))?;
        }

        let printed = sheet
            .to_css(PrinterOptions {
                minify: self.minify,
                targets: flat_targets(),
                ..PrinterOptions::default()
            })
            .map_err(|e| malformed(path, e))?;

        Ok(printed.code)
    }
}

/// Flatten with default options.
pub fn flatten(source: &str, path: &Path) -> Result<String, MalformedStylesheetError> {
    Flattener::new().flatten(source, path)
}

/// No browser baseline, but nesting is always lowered.
fn flat_targets() -> Targets {
    Targets {
        browsers: None,
        include: Features::Nesting,
        exclude: Features::empty(),
    }
}

fn malformed<T: fmt::Display>(path: &Path, err: CssError<T>) -> MalformedStylesheetError {
    let error = MalformedStylesheetError::new(path, err.kind.to_string());
    match err.loc {
        // lightningcss lines are 0-based, columns 1-based
        Some(loc) => error.at(loc.line + 1, loc.column),
        None => error,
    }
}

/// lightningcss keeps `color: ;` as an unparsed property with no tokens.
/// Such a declaration has no valid value, so the sheet is rejected wherever
/// the declaration sits (nested rules, at-rules, bare nested declarations).
struct EmptyValueCheck;

impl<'i> Visitor<'i> for EmptyValueCheck {
    /// Name of the first property found without a value.
    type Error = String;

    fn visit_types(&self) -> VisitTypes {
        VisitTypes::PROPERTIES
    }

    fn visit_property(&mut self, property: &mut Property<'i>) -> Result<(), Self::Error> {
        match property {
            Property::Unparsed(unparsed) if is_blank(&unparsed.value.0) => {
                Err(unparsed.property_id.name().to_string())
            }
            _ => Ok(()),
        }
    }
}

fn reject_empty_values(
    sheet: &mut StyleSheet<'_>,
    path: &Path,
) -> Result<(), MalformedStylesheetError> {
    sheet.visit(&mut EmptyValueCheck).map_err(|name| {
        MalformedStylesheetError::new(path, format!("declaration `{name}` has no value"))
    })
}

fn is_blank(tokens: &[TokenOrValue<'_>]) -> bool {
    tokens.iter().all(|token| {
        matches!(
            token,
            TokenOrValue::Token(Token::WhiteSpace(_) | Token::Comment(_))
        )
    })
}

/// Blocks still open at end of input.
///
/// CSS syntax closes them silently; a stylesheet cut off mid-rule is
/// treated as malformed instead. Returns the 1-based position of the
/// innermost unclosed `{`.
fn unclosed_block(source: &str) -> Option<SourcePos> {
    let mut open: Vec<SourcePos> = Vec::new();
    let (mut line, mut column) = (1u32, 0u32);
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\n' {
            line += 1;
            column = 0;
            continue;
        }
        column += 1;

        match c {
            '\\' => {
                // Escaped code point, never a delimiter.
                if let Some(next) = chars.next() {
                    if next == '\n' {
                        line += 1;
                        column = 0;
                    } else {
                        column += 1;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                column += 1;
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if c == '\n' {
                        line += 1;
                        column = 0;
                    } else {
                        column += 1;
                    }
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            '"' | '\'' => {
                let quote = c;
                while let Some(c) = chars.next() {
                    if c == '\n' {
                        // Unterminated string, the parser already reported it.
                        line += 1;
                        column = 0;
                        break;
                    }
                    column += 1;
                    if c == '\\' {
                        if chars.next().is_some() {
                            column += 1;
                        }
                    } else if c == quote {
                        break;
                    }
                }
            }
            '{' => open.push(SourcePos { line, column }),
            '}' => {
                open.pop();
            }
            _ => {}
        }
    }

    open.pop()
}

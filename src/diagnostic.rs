//! Diagnostics accumulated while resolving a module.

use std::fmt;

use codespan_reporting::diagnostic::{Diagnostic as CodespanDiagnostic, Label};
use codespan_reporting::files::SimpleFile;
use codespan_reporting::term;
use termcolor::{ColorChoice, NoColor, StandardStream};

use crate::Span;

/// How serious a [`Diagnostic`] is.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// A single diagnostic record.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub span: Span,
    pub message: String,
}

impl Diagnostic {
    fn to_codespan(&self) -> CodespanDiagnostic<()> {
        let diagnostic = match self.severity {
            Severity::Warning => CodespanDiagnostic::warning(),
            Severity::Error => CodespanDiagnostic::error(),
        };
        diagnostic
            .with_message(self.message.clone())
            .with_labels(
                self.span
                    .to_range()
                    .map(|range| Label::primary((), range))
                    .into_iter()
                    .collect(),
            )
    }
}

/// Append-only list of diagnostics.
///
/// Errors beyond `max_errors` are dropped, and [`is_full`] starts returning
/// `true` so that callers can stop early.
///
/// [`is_full`]: Diagnostics::is_full
#[derive(Debug, Default)]
pub struct Diagnostics {
    list: Vec<Diagnostic>,
    source: Option<String>,
    max_errors: Option<usize>,
    error_count: usize,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the module's source text, so that [`str`](Self::str) can print
    /// `line:column` positions.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_max_errors(mut self, max_errors: Option<usize>) -> Self {
        self.max_errors = max_errors;
        self
    }

    pub fn add(&mut self, severity: Severity, message: impl Into<String>, span: Span) {
        if severity == Severity::Error {
            if self.is_full() {
                return;
            }
            self.error_count += 1;
            if self.is_full() {
                log::info!("stopping after {} errors", self.error_count);
            }
        }
        self.list.push(Diagnostic {
            severity,
            span,
            message: message.into(),
        });
    }

    pub fn add_error(&mut self, error: impl fmt::Display, span: Span) {
        self.add(Severity::Error, error.to_string(), span);
    }

    pub fn add_warning(&mut self, warning: impl fmt::Display, span: Span) {
        self.add(Severity::Warning, warning.to_string(), span);
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// `true` once the error cutoff has been reached.
    pub fn is_full(&self) -> bool {
        self.max_errors
            .map_or(false, |max| self.error_count >= max)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Diagnostic> {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Plain one-record-per-line rendering.
    pub fn str(&self) -> String {
        let mut out = String::new();
        for diagnostic in self.list.iter() {
            if let (Some(source), true) = (self.source.as_ref(), diagnostic.span.is_defined()) {
                let location = diagnostic.span.location(source);
                out += &format!("{}:{} ", location.line_number, location.line_position);
            }
            out += &format!("{}: {}\n", diagnostic.severity, diagnostic.message);
        }
        out
    }

    /// Emits all diagnostics to standard error stream.
    pub fn emit_to_stderr(&self, source: &str) {
        let files = SimpleFile::new("wgsl", source);
        let config = term::Config::default();
        let writer = StandardStream::stderr(ColorChoice::Auto);
        for diagnostic in self.list.iter() {
            term::emit(&mut writer.lock(), &config, &files, &diagnostic.to_codespan())
                .expect("cannot write error");
        }
    }

    /// Emits all diagnostics to a string, with source snippets.
    pub fn emit_to_string(&self, source: &str) -> String {
        let files = SimpleFile::new("wgsl", source);
        let config = term::Config::default();
        let mut writer = NoColor::new(Vec::new());
        for diagnostic in self.list.iter() {
            term::emit(&mut writer, &config, &files, &diagnostic.to_codespan())
                .expect("cannot write error");
        }
        String::from_utf8_lossy(&writer.into_inner()).into_owned()
    }
}

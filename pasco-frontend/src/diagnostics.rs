use crate::span::SpanLoc;
use std::fmt;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DiagnosticKind {
    Info,
    Warning,
    Error,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::Info => "info",
            DiagnosticKind::Warning => "warning",
            DiagnosticKind::Error => "error",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub locus: SpanLoc,
    pub message: String,
    pub extra_locus: Option<Vec<SpanLoc>>,
    pub extra_diagnostics: Option<Vec<Diagnostic>>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, locus: SpanLoc, message: String) -> Diagnostic {
        Diagnostic {
            kind,
            locus,
            message,
            extra_locus: None,
            extra_diagnostics: None,
        }
    }

    pub fn new_with_extra(
        kind: DiagnosticKind,
        locus: SpanLoc,
        message: String,
        extra_locus: Vec<SpanLoc>,
        extra_diagnostics: Vec<Diagnostic>,
    ) -> Diagnostic {
        Diagnostic {
            kind,
            locus,
            message,
            extra_locus: Some(extra_locus),
            extra_diagnostics: Some(extra_diagnostics),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.locus, self.kind, self.message)?;
        if let Some(extra) = &self.extra_diagnostics {
            for d in extra {
                write!(f, "\n  {}", d)?;
            }
        }
        Ok(())
    }
}

/// Collects diagnostics in the order they are detected. Checking never stops
/// because of a diagnostic, callers look at `num_error` once it is done.
#[derive(Debug, Default)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
    num_error: usize,
}

impl Diagnostics {
    pub fn new() -> Diagnostics {
        Diagnostics::default()
    }

    fn push(&mut self, diag: Diagnostic) {
        if diag.kind == DiagnosticKind::Error {
            self.num_error += 1;
        }
        self.diagnostics.push(diag);
    }

    pub fn add(&mut self, kind: DiagnosticKind, locus: SpanLoc, message: String) {
        self.push(Diagnostic::new(kind, locus, message));
    }

    pub fn add_with_extra(
        &mut self,
        kind: DiagnosticKind,
        locus: SpanLoc,
        message: String,
        extra_locus: Vec<SpanLoc>,
        extra_diagnostics: Vec<Diagnostic>,
    ) {
        self.push(Diagnostic::new_with_extra(
            kind,
            locus,
            message,
            extra_locus,
            extra_diagnostics,
        ));
    }

    pub fn report(&self, emitter: &dyn DiagnosticEmitter) {
        self.diagnostics.iter().for_each(|d| emitter.emit(d));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn num_diagnostics(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn num_error(&self) -> usize {
        self.num_error
    }
}

pub trait DiagnosticEmitter {
    fn emit(&self, diag: &Diagnostic);
}

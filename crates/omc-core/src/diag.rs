//! Diagnostic collection and the compiler's error taxonomy.
//!
//! Diagnostics are collected, not thrown, while a single file or pass is
//! being processed so that independent errors within it are all reported
//! together; `BuildError` is the typed, fatal variant that aborts a phase.

use std::fmt;
use std::path::PathBuf;

#[cfg(test)]
#[path = "diag_tests.rs"]
mod diag_tests;

/// A `(file, line, column)` triple attached to every symbol and diagnostic.
/// Column is 0 for constructs (like side-channel comments) that only track
/// a line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct SourceLoc {
    pub file: PathBuf,
    pub line: u32,
    pub column: u32,
}

impl SourceLoc {
    pub fn new(file: impl Into<PathBuf>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    pub fn unknown() -> Self {
        Self {
            file: PathBuf::new(),
            line: 0,
            column: 0,
        }
    }
}

impl fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, serde::Serialize)]
pub enum Severity {
    Warning,
    #[default]
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub loc: SourceLoc,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.loc, self.severity, self.message)
    }
}

/// Accumulates diagnostics across a phase. A phase is considered failed if
/// `has_errors()` is true once it finishes, but processing within the phase
/// is not aborted by the first error.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    messages: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, loc: SourceLoc, message: impl Into<String>) {
        self.messages.push(Diagnostic {
            severity: Severity::Error,
            loc,
            message: message.into(),
        });
    }

    pub fn warning(&mut self, loc: SourceLoc, message: impl Into<String>) {
        self.messages.push(Diagnostic {
            severity: Severity::Warning,
            loc,
            message: message.into(),
        });
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.messages.iter()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

/// Fatal build errors, grouped by the taxonomy in §7. Each variant carries
/// enough context for the CLI driver to log a useful message and map to a
/// non-zero exit code; none of them are meant to be matched on by callers
/// other than the driver.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("{loc}: parse error: {message}")]
    Parse { loc: SourceLoc, message: String },

    #[error("{loc}: unresolved type for '{symbol}'")]
    UnresolvedType { loc: SourceLoc, symbol: String },

    #[error("{loc}: '{symbol}' is not a valid enumeration")]
    NotAnEnumeration { loc: SourceLoc, symbol: String },

    #[error("non-literal argument to RNG stream function at {loc}")]
    NonLiteralRngStream { loc: SourceLoc },

    #[error("RNG stream number {stream} used more than once (first at {first}, again at {second})")]
    DuplicateRngStream {
        stream: i64,
        first: SourceLoc,
        second: SourceLoc,
    },

    #[error("{loc}: {message}")]
    Validation { loc: SourceLoc, message: String },

    #[error("missing parameter '{parameter}' in workset '{workset}'")]
    MissingWorksetParameter { parameter: String, workset: String },

    #[error("malformed aggregation expression: {message}")]
    MalformedAggregation { message: String },

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid UTF-8 after encoding conversion")]
    InvalidUtf8 { path: PathBuf },

    #[error("build failed with {errors} error(s)")]
    Failed { errors: usize },
}

impl BuildError {
    /// §6: "Exit codes: 0 on success; non-zero on any fatal error."
    /// All build errors map to 1; the CLI binary is the only place this
    /// constant is consumed.
    pub const EXIT_CODE: i32 = 1;
}

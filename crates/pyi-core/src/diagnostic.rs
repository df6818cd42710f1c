//! Diagnostics reported while reducing a source unit to a stub tree.
//!
//! The extractor never prints anything itself. Every recoverable problem it
//! finds (an unsupported construct, a dropped decorator, a type comment) is
//! handed to a [`DiagnosticSink`] that the caller threads through the whole
//! traversal. Collecting diagnostics in a `Vec` makes the traversal fully
//! deterministic to test; [`WriteSink`] renders them as text lines.
//!
//! # Format
//!
//! A diagnostic renders as one line:
//!
//! ```text
//! WARNING:<source-id>:<line>:<message>
//! ```
//!
//! # Examples
//!
//! ```
//! use pyi_core::{Diagnostic, DiagnosticSink};
//!
//! let mut sink: Vec<Diagnostic> = Vec::new();
//! sink.report(Diagnostic::new("mod.py", 3, "class decorators are currently unsupported"));
//!
//! assert_eq!(
//!     sink[0].to_string(),
//!     "WARNING:mod.py:3:class decorators are currently unsupported"
//! );
//! ```

use std::fmt;
use std::io::Write;

use serde::{Deserialize, Serialize};

/// A single recoverable problem found in a source unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Identifier of the source unit (usually its path).
    pub source_id: String,

    /// Line number (1-indexed).
    pub line: u32,

    /// Human-readable description of the problem.
    pub message: String,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    #[must_use]
    pub fn new(source_id: impl Into<String>, line: u32, message: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WARNING:{}:{}:{}", self.source_id, self.line, self.message)
    }
}

/// Receiver for diagnostics.
///
/// Implementations decide what happens to a diagnostic: collect it, print
/// it, count it, or drop it. Reports arrive synchronously and in traversal
/// order for a single unit.
pub trait DiagnosticSink {
    /// Records one diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

/// A sink that writes each diagnostic as a line to an [`io::Write`](std::io::Write).
///
/// Write failures are ignored: diagnostics are advisory and must never
/// abort processing of the unit.
///
/// # Examples
///
/// ```
/// use pyi_core::{Diagnostic, DiagnosticSink, WriteSink};
///
/// let mut sink = WriteSink::new(Vec::new());
/// sink.report(Diagnostic::new("a.py", 1, "oops"));
/// assert_eq!(sink.into_inner(), b"WARNING:a.py:1:oops\n");
/// ```
#[derive(Debug)]
pub struct WriteSink<W> {
    writer: W,
}

impl<W: Write> WriteSink<W> {
    /// Wraps a writer.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DiagnosticSink for WriteSink<W> {
    fn report(&mut self, diagnostic: Diagnostic) {
        let _ = writeln!(self.writer, "{diagnostic}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic::new("pkg/mod.py", 12, "position-only arguments are currently unsupported");
        assert_eq!(
            diagnostic.to_string(),
            "WARNING:pkg/mod.py:12:position-only arguments are currently unsupported"
        );
    }

    #[test]
    fn test_vec_sink_keeps_order() {
        let mut sink: Vec<Diagnostic> = Vec::new();
        sink.report(Diagnostic::new("a.py", 2, "second"));
        sink.report(Diagnostic::new("a.py", 1, "first"));
        let lines: Vec<u32> = sink.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![2, 1]);
    }

    #[test]
    fn test_mut_ref_sink_forwards() {
        fn report_one<S: DiagnosticSink>(mut sink: S) {
            sink.report(Diagnostic::new("a.py", 1, "x"));
        }

        let mut inner: Vec<Diagnostic> = Vec::new();
        report_one(&mut inner);
        report_one(&mut inner);
        assert_eq!(inner.len(), 2);
    }

    #[test]
    fn test_write_sink_lines() {
        let mut sink = WriteSink::new(Vec::new());
        sink.report(Diagnostic::new("a.py", 1, "one"));
        sink.report(Diagnostic::new("a.py", 5, "two"));
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(text, "WARNING:a.py:1:one\nWARNING:a.py:5:two\n");
    }
}

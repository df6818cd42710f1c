//! Indentation-aware text sink.

use std::fmt;

/// One level of indentation.
pub(crate) const INDENT: &str = "    ";

/// Wraps a [`fmt::Write`] and indents every line written through it.
///
/// Indentation is written lazily, at the first write of a line, so empty
/// lines carry no trailing whitespace.
pub(crate) struct Output<'w, W> {
    out: &'w mut W,
    depth: usize,
    line_start: bool,
}

impl<'w, W: fmt::Write> Output<'w, W> {
    pub(crate) fn new(out: &'w mut W) -> Self {
        Self {
            out,
            depth: 0,
            line_start: true,
        }
    }

    /// Ends the current line.
    pub(crate) fn finish_line(&mut self) -> fmt::Result {
        self.out.write_char('\n')?;
        self.line_start = true;
        Ok(())
    }

    pub(crate) fn indent(&mut self) {
        self.depth += 1;
    }

    pub(crate) fn unindent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

impl<W: fmt::Write> fmt::Write for Output<'_, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if s.is_empty() {
            return Ok(());
        }
        if self.line_start {
            for _ in 0..self.depth {
                self.out.write_str(INDENT)?;
            }
            self.line_start = false;
        }
        self.out.write_str(s)
    }
}

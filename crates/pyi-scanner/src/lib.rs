//! Batch conversion of Python files to `.pyi` stubs.
//!
//! This crate drives the extractor and the generator over files on disk:
//!
//! - [`FileWalker`] and [`collect_inputs`]: discovery of `*.py` files,
//!   respecting `.gitignore` patterns and skip lists
//! - [`Converter`]: parallel conversion with rayon, one parser per worker
//! - [`ScanStats`]: atomic counters for reporting
//! - [`convert_source`]: the in-memory pipeline, source text to stub text
//!
//! # Target Policy
//!
//! The stub of `pkg/mod.py` is written to `pkg/mod.pyi`; any other file
//! name gets `.pyi` appended (see [`stub_path`]). Existing stubs are left
//! alone unless [`ScanConfig::overwrite`](pyi_core::ScanConfig::overwrite)
//! is set. Files that fail to parse produce no stub at all.
//!
//! # Example
//!
//! ```
//! use pyi_core::{Config, Diagnostic};
//!
//! let mut diagnostics: Vec<Diagnostic> = Vec::new();
//! let stub = pyi_scanner::convert_source(
//!     "def greet(name, punctuation='!'):\n    print(name + punctuation)\n",
//!     "greet.py",
//!     &Config::default(),
//!     &mut diagnostics,
//! )?;
//!
//! assert_eq!(stub, "def greet(name, punctuation=...): ...\n");
//! assert!(diagnostics.is_empty());
//! # Ok::<(), pyi_extract::ParseError>(())
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod converter;
pub mod error;
mod stats;
mod walker;

use pyi_core::{Config, DiagnosticSink};
use pyi_extract::{Extractor, ParseError, PyParser};
use pyi_gen::Generator;

pub use converter::{stub_path, ConversionReport, Converter};
pub use error::ScanError;
pub use stats::{ScanStats, StatsSnapshot};
pub use walker::{collect_inputs, FileWalker};

/// Converts Python source text to stub text.
///
/// Diagnostics go to `sink`. Required `typing` imports are emitted when
/// `config.generate.emit_required_imports` is set.
///
/// # Errors
///
/// Returns [`ParseError`] if `source` is not valid Python.
pub fn convert_source<S: DiagnosticSink>(
    source: &str,
    source_id: &str,
    config: &Config,
    sink: &mut S,
) -> Result<String, ParseError> {
    let mut parser = PyParser::new()?;
    convert_with_parser(&mut parser, source, source_id, config, sink)
}

/// Like [`convert_source`], reusing an existing parser.
///
/// # Errors
///
/// Returns [`ParseError`] if `source` is not valid Python.
pub fn convert_with_parser<S: DiagnosticSink>(
    parser: &mut PyParser,
    source: &str,
    source_id: &str,
    config: &Config,
    sink: &mut S,
) -> Result<String, ParseError> {
    let tree = parser.parse(source, source_id)?;
    let extraction = Extractor::new(&config.extract).extract(&tree, sink);
    Ok(Generator::new(config.generate)
        .with_required_imports(&extraction.required_imports)
        .generate_to_string(&extraction.module))
}

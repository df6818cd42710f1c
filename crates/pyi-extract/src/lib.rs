//! Python stub extraction using tree-sitter.
//!
//! This crate turns Python source into the stub tree defined in `pyi_core`:
//!
//! - [`PyParser`] parses source into a [`SyntaxTree`], rejecting files with
//!   syntax errors
//! - [`Extractor`] reduces the tree to a [`Module`](pyi_core::Module) and
//!   reports what it had to drop as [`Diagnostic`](pyi_core::Diagnostic)s
//!
//! # Overview
//!
//! ```
//! use pyi_core::{Diagnostic, ExtractConfig, ModuleContent};
//! use pyi_extract::extract_str;
//!
//! let source = r#"
//! import os
//!
//! def walk(top: str, *, follow: bool = False) -> list:
//!     return []
//!
//! class Walker(Base):
//!     depth = 0
//! "#;
//!
//! let mut diagnostics: Vec<Diagnostic> = Vec::new();
//! let extraction = extract_str(source, "walk.py", &ExtractConfig::default(), &mut diagnostics)?;
//!
//! assert_eq!(extraction.module.imports.len(), 1);
//! assert!(matches!(&extraction.module.content[0], ModuleContent::Function(f) if f.name == "walk"));
//! assert!(matches!(&extraction.module.content[1], ModuleContent::Class(c) if c.name == "Walker"));
//! assert!(diagnostics.is_empty());
//! # Ok::<(), pyi_extract::ParseError>(())
//! ```
//!
//! # What Is Kept
//!
//! | Construct | Stub item |
//! |-----------|-----------|
//! | `import a as b` | [`Import`](pyi_core::Import) |
//! | `from .m import a` | [`ImportFrom`](pyi_core::ImportFrom) |
//! | `x: int = 1` / `x = 1` | [`Attribute`](pyi_core::Attribute) |
//! | `X = List[int]` | [`Alias`](pyi_core::Alias) |
//! | `def f(...)` | [`Function`](pyi_core::Function) |
//! | `class C(...)` | [`Class`](pyi_core::Class) |
//!
//! Bodies of functions are discarded. Class bodies keep methods and
//! assignments. `if` and `try` blocks are flattened into the enclosing
//! scope.
//!
//! # Thread Safety
//!
//! [`PyParser`] is `Send` but not `Sync`; create one per thread. An
//! [`Extractor`] only borrows configuration and can be shared freely.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
mod extractor;
mod parser;
mod syntax;

use pyi_core::{DiagnosticSink, ExtractConfig};

pub use error::ParseError;
pub use extractor::{Extraction, Extractor};
pub use parser::{PyParser, SyntaxTree};

/// Parses and extracts `source` in one step.
///
/// Creates a fresh [`PyParser`]; callers converting many files should keep
/// their own parser and call [`Extractor::extract`] directly.
///
/// # Errors
///
/// Returns [`ParseError`] if the parser cannot be created or `source` has a
/// syntax error. No diagnostics are reported in that case.
pub fn extract_str<S: DiagnosticSink>(
    source: &str,
    source_id: &str,
    config: &ExtractConfig,
    sink: &mut S,
) -> Result<Extraction, ParseError> {
    let mut parser = PyParser::new()?;
    let tree = parser.parse(source, source_id)?;
    Ok(Extractor::new(config).extract(&tree, sink))
}

//! Core types, diagnostics, and configuration for the pyi-stubs workspace.
//!
//! This crate provides the foundational pieces shared by the extractor,
//! the generator, and the batch driver:
//!
//! - The stub tree model ([`Module`] and everything it contains)
//! - Diagnostics ([`Diagnostic`]) and the [`DiagnosticSink`] trait
//! - The sequence-alignment helper [`rzip_longest`]
//! - Configuration structures ([`Config`])
//! - Error types for consistent error handling
//!
//! # The stub tree
//!
//! The stub tree is the only contract between the extractor and the
//! generator. It holds declarations only: imports, attributes, aliases,
//! function signatures, and classes. Function bodies and default values are
//! never part of it.
//!
//! ```
//! use pyi_core::{Annotation, Argument, Function, Module, ModuleContent};
//!
//! let function = Function::new("greet")
//!     .with_args(vec![Argument::new("name").with_annotation(Annotation::new("str"))])
//!     .with_return_annotation(Annotation::new("None"));
//!
//! let module = Module {
//!     content: vec![ModuleContent::Function(function)],
//!     ..Module::default()
//! };
//!
//! assert_eq!(module.content.len(), 1);
//! assert_eq!(module.content[0].name(), "greet");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod align;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod types;

pub use align::rzip_longest;
pub use config::{Config, ExtractConfig, GenerateConfig, ScanConfig};
pub use diagnostic::{Diagnostic, DiagnosticSink, WriteSink};
pub use error::{AlignmentError, ConfigError};
pub use types::{
    Alias, Annotation, Argument, Attribute, Class, ClassAssign, ClassContent, ClassKeyword,
    Decorator, DottedName, Function, Import, ImportFrom, ImportedName, Module, ModuleContent,
    RequiredImports, Type,
};

//! Rendering of stub trees as `.pyi` text.
//!
//! The [`Generator`] is the second half of the stub pipeline: it takes the
//! [`Module`] produced by `pyi-extract` and writes canonical stub text.
//! Formatting is fixed (four-space indentation, no line wrapping, bodies
//! rendered as `...`), so output never depends on how the source was laid
//! out.
//!
//! # Layout
//!
//! ```text
//! import os as so
//! from ..pkg import a as b, c
//!
//! x: Optional[Any]
//! Alias = List[int]
//! @decorator
//! def f(a, b=..., *args, c: int = ..., **kwargs) -> str: ...
//! class C(Base):
//!     x: ClassVar[Any]
//!     def method(self): ...
//! class Empty: ...
//! ```
//!
//! Imports come first, in extraction order; one blank line separates them
//! from the rest when both exist.
//!
//! # Quick Start
//!
//! ```
//! use pyi_core::{Attribute, Import, Module};
//!
//! let mut module = Module::new();
//! module.imports.push(Import::new("os", Some("so")));
//! module.content.push(Attribute::new("x", "int").into());
//!
//! assert_eq!(pyi_gen::generate(&module), "import os as so\n\nx: int\n");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod generator;
mod output;

use pyi_core::{GenerateConfig, Module};

pub use generator::Generator;

/// Renders `module` with the default configuration.
#[must_use]
pub fn generate(module: &Module) -> String {
    Generator::new(GenerateConfig::default()).generate_to_string(module)
}

//! The stub tree model.
//!
//! This module contains the reduced, declaration-only representation of a
//! Python module. The extractor builds it in one pass and the generator
//! consumes it in one pass; nothing mutates it in between.
//!
//! # Module Organization
//!
//! - [`names`] - Opaque textual wrappers ([`DottedName`], [`Annotation`], [`Type`])
//! - [`module`] - The [`Module`] root, imports, attributes, and aliases
//! - [`function`] - Functions, arguments, and decorators
//! - [`class`] - Classes and class-body assignments
//! - [`requirements`] - `typing` names the inferred annotations rely on
//!
//! # Re-exports
//!
//! All public types are re-exported at this module level and at the crate
//! root:
//!
//! ```
//! use pyi_core::types::{Class, Function, Module};
//! use pyi_core::{ClassContent, ModuleContent};
//! ```

pub mod class;
pub mod function;
pub mod module;
pub mod names;
pub mod requirements;

pub use class::{Class, ClassAssign, ClassContent, ClassKeyword};
pub use function::{Argument, Decorator, Function};
pub use module::{Alias, Attribute, Import, ImportFrom, ImportedName, Module, ModuleContent};
pub use names::{Annotation, DottedName, Type};
pub use requirements::RequiredImports;

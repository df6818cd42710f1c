//! The module root and its top-level declarations.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::class::Class;
use super::function::Function;
use super::names::{Annotation, DottedName};

/// The stub tree of one source unit.
///
/// Imports are kept apart from the rest of the content: they always render
/// first, `import` statements before `from ... import` statements, each in
/// extraction order.
///
/// # Examples
///
/// ```
/// use pyi_core::{Import, Module};
///
/// let module = Module {
///     imports: vec![Import::new("os", None)],
///     ..Module::default()
/// };
/// assert!(module.has_imports());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// `import x [as y]` statements, one entry per imported name.
    pub imports: Vec<Import>,

    /// `from m import ...` statements.
    pub import_froms: Vec<ImportFrom>,

    /// Everything else, in extraction order.
    pub content: Vec<ModuleContent>,
}

impl Module {
    /// Creates an empty module.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if there is at least one import of either kind.
    #[inline]
    #[must_use]
    pub fn has_imports(&self) -> bool {
        !self.imports.is_empty() || !self.import_froms.is_empty()
    }
}

/// A single `import name [as alias]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    /// The imported module path.
    pub name: DottedName,

    /// The local alias, if any.
    pub alias: Option<String>,
}

impl Import {
    /// Creates an import.
    #[must_use]
    pub fn new(name: impl Into<DottedName>, alias: Option<&str>) -> Self {
        Self {
            name: name.into(),
            alias: alias.map(ToOwned::to_owned),
        }
    }
}

/// One `name [as alias]` entry of a `from ... import` statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedName {
    /// The imported name (`*` for wildcard imports).
    pub name: String,

    /// The local alias, if any.
    pub alias: Option<String>,
}

impl ImportedName {
    /// Creates an imported name.
    #[must_use]
    pub fn new(name: impl Into<String>, alias: Option<&str>) -> Self {
        Self {
            name: name.into(),
            alias: alias.map(ToOwned::to_owned),
        }
    }
}

/// A `from [.]*module import a [as b], ...` statement.
///
/// # Examples
///
/// ```
/// use pyi_core::{ImportFrom, ImportedName};
///
/// // from .. import sibling
/// let import = ImportFrom::new("", 2, [ImportedName::new("sibling", None)]);
/// assert!(import.is_relative());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportFrom {
    /// The source module path. Empty for `from . import x`.
    pub module: String,

    /// Number of leading dots.
    pub level: u32,

    /// Imported names in source order.
    ///
    /// Uses `SmallVec` since most statements import a handful of names.
    pub names: SmallVec<[ImportedName; 4]>,
}

impl ImportFrom {
    /// Creates a `from ... import` statement.
    #[must_use]
    pub fn new(
        module: impl Into<String>,
        level: u32,
        names: impl IntoIterator<Item = ImportedName>,
    ) -> Self {
        Self {
            module: module.into(),
            level,
            names: names.into_iter().collect(),
        }
    }

    /// Returns `true` for relative imports (`from . import x`).
    #[inline]
    #[must_use]
    pub const fn is_relative(&self) -> bool {
        self.level > 0
    }

    /// Returns `true` if this statement binds `name` without an alias.
    #[must_use]
    pub fn imports_plain(&self, name: &str) -> bool {
        self.names
            .iter()
            .any(|imported| imported.name == name && imported.alias.is_none())
    }
}

/// A module-level value binding: `name: Annotation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// The bound name.
    pub name: String,

    /// The declared or inferred type.
    pub annotation: Annotation,
}

impl Attribute {
    /// Creates an attribute.
    #[must_use]
    pub fn new(name: impl Into<String>, annotation: impl Into<Annotation>) -> Self {
        Self {
            name: name.into(),
            annotation: annotation.into(),
        }
    }
}

/// A module-level type alias: `Name = TypeExpr`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    /// The alias name.
    pub name: String,

    /// The aliased type expression.
    pub target: Annotation,
}

impl Alias {
    /// Creates an alias.
    #[must_use]
    pub fn new(name: impl Into<String>, target: impl Into<Annotation>) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
        }
    }
}

/// A declaration at module level (other than imports).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModuleContent {
    /// `name: Annotation`
    Attribute(Attribute),
    /// `Name = TypeExpr`
    Alias(Alias),
    /// `def name(...): ...`
    Function(Function),
    /// `class Name(...): ...`
    Class(Class),
}

impl ModuleContent {
    /// Returns the name bound by this declaration.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Attribute(attribute) => &attribute.name,
            Self::Alias(alias) => &alias.name,
            Self::Function(function) => &function.name,
            Self::Class(class) => &class.name,
        }
    }
}

impl From<Attribute> for ModuleContent {
    fn from(attribute: Attribute) -> Self {
        Self::Attribute(attribute)
    }
}

impl From<Alias> for ModuleContent {
    fn from(alias: Alias) -> Self {
        Self::Alias(alias)
    }
}

impl From<Function> for ModuleContent {
    fn from(function: Function) -> Self {
        Self::Function(function)
    }
}

impl From<Class> for ModuleContent {
    fn from(class: Class) -> Self {
        Self::Class(class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_module() {
        let module = Module::new();
        assert!(!module.has_imports());
        assert!(module.content.is_empty());
    }

    #[test]
    fn test_import_from_imports_plain() {
        let import = ImportFrom::new(
            "typing",
            0,
            [
                ImportedName::new("Any", None),
                ImportedName::new("Optional", Some("Opt")),
            ],
        );
        assert!(import.imports_plain("Any"));
        assert!(!import.imports_plain("Optional"));
        assert!(!import.is_relative());
    }

    #[test]
    fn test_module_content_serialization_is_tagged() {
        let content = ModuleContent::Alias(Alias::new("Json", "Dict[str, Any]"));
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["kind"], "alias");
        assert_eq!(json["target"], "Dict[str, Any]");
    }
}

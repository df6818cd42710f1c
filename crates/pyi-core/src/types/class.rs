//! Classes and class-body members.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::function::{Decorator, Function};
use super::names::{Annotation, Type};

/// A `key=value` entry in a class header, such as `metaclass=ABCMeta`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassKeyword {
    /// The keyword name.
    pub name: String,

    /// The value text.
    pub value: String,
}

impl ClassKeyword {
    /// Creates a class keyword.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A class definition.
///
/// An empty `body` renders as `class Name: ...`.
///
/// The extractor currently never fills `decorators` or `keywords`; both are
/// reported and discarded. The generator still renders them when present.
///
/// # Examples
///
/// ```
/// use pyi_core::{Class, ClassAssign, ClassContent, Type};
///
/// let class = Class::new("Point")
///     .with_bases(vec![Type::new("NamedTuple")])
///     .with_body(vec![ClassContent::Assign(ClassAssign::annotated("x", "int"))]);
///
/// assert!(!class.is_empty());
/// assert!(class.has_header_arguments());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    /// The class name.
    pub name: String,

    /// Base class expressions in order.
    pub bases: Vec<Type>,

    /// Keyword arguments of the class header.
    pub keywords: Vec<ClassKeyword>,

    /// Class decorators in source order.
    pub decorators: SmallVec<[Decorator; 2]>,

    /// Members in extraction order.
    pub body: Vec<ClassContent>,
}

impl Class {
    /// Creates an empty class without bases.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
            keywords: Vec::new(),
            decorators: SmallVec::new(),
            body: Vec::new(),
        }
    }

    /// Sets the base classes.
    #[must_use]
    pub fn with_bases(mut self, bases: Vec<Type>) -> Self {
        self.bases = bases;
        self
    }

    /// Sets the header keywords.
    #[must_use]
    pub fn with_keywords(mut self, keywords: Vec<ClassKeyword>) -> Self {
        self.keywords = keywords;
        self
    }

    /// Sets the class body.
    #[must_use]
    pub fn with_body(mut self, body: Vec<ClassContent>) -> Self {
        self.body = body;
        self
    }

    /// Returns `true` if the class has no members.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns `true` if the header needs a parenthesized argument list.
    #[inline]
    #[must_use]
    pub fn has_header_arguments(&self) -> bool {
        !self.bases.is_empty() || !self.keywords.is_empty()
    }
}

/// An assignment inside a class body.
///
/// `class_var` distinguishes bare assignments (`x = 1`), whose type is not
/// narrowed and which render as `x: ClassVar[Any]`, from annotated fields
/// (`x: int`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassAssign {
    /// The bound name.
    pub name: String,

    /// The annotation, wrapped in `ClassVar[...]` when `class_var` is set.
    pub annotation: Annotation,

    /// Whether the binding is a class-scoped variable.
    pub class_var: bool,
}

impl ClassAssign {
    /// Creates a class variable of type `Any` from a bare assignment.
    #[must_use]
    pub fn class_var(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotation: Annotation::new("Any"),
            class_var: true,
        }
    }

    /// Creates an explicitly annotated field.
    #[must_use]
    pub fn annotated(name: impl Into<String>, annotation: impl Into<Annotation>) -> Self {
        Self {
            name: name.into(),
            annotation: annotation.into(),
            class_var: false,
        }
    }
}

/// A member of a class body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassContent {
    /// A field or class variable.
    Assign(ClassAssign),
    /// A method.
    Function(Function),
}

impl ClassContent {
    /// Returns the name bound by this member.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Assign(assign) => &assign.name,
            Self::Function(function) => &function.name,
        }
    }
}

impl From<ClassAssign> for ClassContent {
    fn from(assign: ClassAssign) -> Self {
        Self::Assign(assign)
    }
}

impl From<Function> for ClassContent {
    fn from(function: Function) -> Self {
        Self::Function(function)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_var_defaults_to_any() {
        let assign = ClassAssign::class_var("x");
        assert!(assign.class_var);
        assert_eq!(assign.annotation.as_str(), "Any");
    }

    #[test]
    fn test_empty_class() {
        let class = Class::new("Foo");
        assert!(class.is_empty());
        assert!(!class.has_header_arguments());
    }

    #[test]
    fn test_keywords_count_as_header_arguments() {
        let class = Class::new("Foo").with_keywords(vec![ClassKeyword::new("metaclass", "ABCMeta")]);
        assert!(class.has_header_arguments());
    }

    #[test]
    fn test_class_content_name() {
        let body: Vec<ClassContent> = vec![
            ClassAssign::annotated("x", "int").into(),
            Function::new("method").into(),
        ];
        let names: Vec<&str> = body.iter().map(ClassContent::name).collect();
        assert_eq!(names, vec!["x", "method"]);
    }
}

//! Functions, their arguments, and decorators.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::names::{Annotation, DottedName};

/// A function or method argument.
///
/// The default value itself is never kept, only whether one was present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    /// The parameter name, without `*` or `**`.
    pub name: String,

    /// The declared annotation, if any.
    pub annotation: Option<Annotation>,

    /// Whether the parameter has a default value.
    pub has_default: bool,
}

impl Argument {
    /// Creates an unannotated argument without a default.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotation: None,
            has_default: false,
        }
    }

    /// Sets the annotation.
    #[must_use]
    pub fn with_annotation(mut self, annotation: impl Into<Annotation>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    /// Marks the argument as having a default value.
    #[must_use]
    pub const fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }
}

/// A function decorator such as `@staticmethod` or `@functools.wraps`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Decorator {
    /// The decorator's dotted name.
    pub name: DottedName,
}

impl Decorator {
    /// Creates a decorator.
    #[must_use]
    pub fn new(name: impl Into<DottedName>) -> Self {
        Self { name: name.into() }
    }
}

/// A function or method.
///
/// There is no separate method type: a `Function` inside a class body is a
/// method.
///
/// # Examples
///
/// ```
/// use pyi_core::{Annotation, Argument, Function};
///
/// // def get(self, key: str, *, default=...) -> Any
/// let function = Function::new("get")
///     .with_args(vec![
///         Argument::new("self"),
///         Argument::new("key").with_annotation(Annotation::new("str")),
///     ])
///     .with_kw_args(vec![Argument::new("default").with_default()])
///     .with_return_annotation(Annotation::new("Any"));
///
/// assert!(function.has_star_separator());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    /// The function name.
    pub name: String,

    /// Positional parameters in order.
    pub args: Vec<Argument>,

    /// The `*args` parameter.
    pub var_arg: Option<Argument>,

    /// Keyword-only parameters in order.
    pub kw_args: Vec<Argument>,

    /// The `**kwargs` parameter.
    pub kw_arg: Option<Argument>,

    /// The return annotation, if any.
    pub return_annotation: Option<Annotation>,

    /// Decorators in source order.
    pub decorators: SmallVec<[Decorator; 2]>,
}

impl Function {
    /// Creates a function without parameters, annotation, or decorators.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            var_arg: None,
            kw_args: Vec::new(),
            kw_arg: None,
            return_annotation: None,
            decorators: SmallVec::new(),
        }
    }

    /// Sets the positional parameters.
    #[must_use]
    pub fn with_args(mut self, args: Vec<Argument>) -> Self {
        self.args = args;
        self
    }

    /// Sets the `*args` parameter.
    #[must_use]
    pub fn with_var_arg(mut self, var_arg: Argument) -> Self {
        self.var_arg = Some(var_arg);
        self
    }

    /// Sets the keyword-only parameters.
    #[must_use]
    pub fn with_kw_args(mut self, kw_args: Vec<Argument>) -> Self {
        self.kw_args = kw_args;
        self
    }

    /// Sets the `**kwargs` parameter.
    #[must_use]
    pub fn with_kw_arg(mut self, kw_arg: Argument) -> Self {
        self.kw_arg = Some(kw_arg);
        self
    }

    /// Sets the return annotation.
    #[must_use]
    pub fn with_return_annotation(mut self, annotation: impl Into<Annotation>) -> Self {
        self.return_annotation = Some(annotation.into());
        self
    }

    /// Appends a decorator.
    #[must_use]
    pub fn with_decorator(mut self, decorator: Decorator) -> Self {
        self.decorators.push(decorator);
        self
    }

    /// Returns `true` if the signature needs a `*` between positional and
    /// keyword-only parameters (either bare or as `*args`).
    #[inline]
    #[must_use]
    pub fn has_star_separator(&self) -> bool {
        self.var_arg.is_some() || !self.kw_args.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_builders() {
        let argument = Argument::new("x").with_annotation("int").with_default();
        assert_eq!(argument.annotation.as_ref().map(Annotation::as_str), Some("int"));
        assert!(argument.has_default);
    }

    #[test]
    fn test_star_separator() {
        assert!(!Function::new("f").has_star_separator());
        assert!(Function::new("f").with_var_arg(Argument::new("args")).has_star_separator());
        assert!(
            Function::new("f")
                .with_kw_args(vec![Argument::new("key")])
                .has_star_separator()
        );
        assert!(!Function::new("f").with_kw_arg(Argument::new("kwargs")).has_star_separator());
    }

    #[test]
    fn test_decorators_keep_order() {
        let function = Function::new("f")
            .with_decorator(Decorator::new("property"))
            .with_decorator(Decorator::new("abc.abstractmethod"));
        let names: Vec<&str> = function.decorators.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["property", "abc.abstractmethod"]);
    }
}

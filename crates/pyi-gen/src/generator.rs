//! Stub tree rendering.

use std::fmt::{self, Write};

use pyi_core::{
    Argument, Class, ClassAssign, ClassContent, Decorator, Function, GenerateConfig, Import,
    ImportFrom, Module, ModuleContent, RequiredImports,
};
use tracing::debug;

use crate::output::Output;

/// Renders [`Module`]s as `.pyi` text.
///
/// Output is deterministic: the same tree always renders to the same text,
/// and every line ends with `\n`.
///
/// # Examples
///
/// ```
/// use pyi_core::{Argument, Function, GenerateConfig, Module};
/// use pyi_gen::Generator;
///
/// let mut module = Module::new();
/// module.content.push(
///     Function::new("open")
///         .with_args(vec![Argument::new("path").with_annotation("str")])
///         .with_kw_args(vec![Argument::new("mode").with_default()])
///         .into(),
/// );
///
/// let text = Generator::new(GenerateConfig::default()).generate_to_string(&module);
/// assert_eq!(text, "def open(path: str, *, mode=...): ...\n");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Generator<'a> {
    config: GenerateConfig,
    required_imports: Option<&'a RequiredImports>,
}

impl<'a> Generator<'a> {
    /// Creates a generator.
    #[must_use]
    pub const fn new(config: GenerateConfig) -> Self {
        Self {
            config,
            required_imports: None,
        }
    }

    /// Supplies the `typing` names the tree relies on.
    ///
    /// They are only rendered when
    /// [`emit_required_imports`](GenerateConfig::emit_required_imports) is
    /// set.
    #[must_use]
    pub const fn with_required_imports(mut self, required: &'a RequiredImports) -> Self {
        self.required_imports = Some(required);
        self
    }

    /// Renders `module` into `out`.
    ///
    /// # Errors
    ///
    /// Returns an error only if `out` does.
    pub fn generate<W: fmt::Write>(&self, module: &Module, out: &mut W) -> fmt::Result {
        let mut output = Output::new(out);

        for import in &module.imports {
            write_import(&mut output, import)?;
        }
        for import_from in &module.import_froms {
            write_import_from(&mut output, import_from)?;
        }
        let required = self.required_lines(module);
        for (from, names) in &required {
            write!(output, "from {from} import {}", names.join(", "))?;
            output.finish_line()?;
        }

        let has_imports = module.has_imports() || !required.is_empty();
        if has_imports && !module.content.is_empty() {
            output.finish_line()?;
        }

        for content in &module.content {
            match content {
                ModuleContent::Attribute(attribute) => {
                    write!(output, "{}: {}", attribute.name, attribute.annotation)?;
                    output.finish_line()?;
                }
                ModuleContent::Alias(alias) => {
                    write!(output, "{} = {}", alias.name, alias.target)?;
                    output.finish_line()?;
                }
                ModuleContent::Function(function) => write_function(&mut output, function)?,
                ModuleContent::Class(class) => write_class(&mut output, class)?,
            }
        }

        debug!(
            imports = module.imports.len() + module.import_froms.len() + required.len(),
            items = module.content.len(),
            "generated stub"
        );
        Ok(())
    }

    /// Renders `module` into a new `String`.
    #[must_use]
    pub fn generate_to_string(&self, module: &Module) -> String {
        let mut text = String::new();
        // Writing into a String cannot fail.
        let _ = self.generate(module, &mut text);
        text
    }

    /// Returns the `from <module> import ...` groups still missing from the
    /// module's own imports.
    fn required_lines(&self, module: &Module) -> Vec<(&'a str, Vec<&'a str>)> {
        let Some(required) = self.required_imports else {
            return Vec::new();
        };
        if !self.config.emit_required_imports || required.is_empty() {
            return Vec::new();
        }

        let already_imported = |from: &str, name: &str| {
            module.import_froms.iter().any(|import_from| {
                !import_from.is_relative()
                    && import_from.module == from
                    && (import_from.imports_plain(name) || import_from.imports_plain("*"))
            })
        };

        required
            .by_module()
            .into_iter()
            .filter_map(|(from, names)| {
                let missing: Vec<&str> = names
                    .into_iter()
                    .filter(|name| !already_imported(from, name))
                    .collect();
                (!missing.is_empty()).then_some((from, missing))
            })
            .collect()
    }
}

// ============================================================================
// Imports
// ============================================================================

fn write_import<W: fmt::Write>(output: &mut Output<'_, W>, import: &Import) -> fmt::Result {
    write!(output, "import {}", import.name)?;
    if let Some(alias) = &import.alias {
        write!(output, " as {alias}")?;
    }
    output.finish_line()
}

fn write_import_from<W: fmt::Write>(
    output: &mut Output<'_, W>,
    import_from: &ImportFrom,
) -> fmt::Result {
    output.write_str("from ")?;
    for _ in 0..import_from.level {
        output.write_char('.')?;
    }
    write!(output, "{} import ", import_from.module)?;
    for (index, imported) in import_from.names.iter().enumerate() {
        if index > 0 {
            output.write_str(", ")?;
        }
        output.write_str(&imported.name)?;
        if let Some(alias) = &imported.alias {
            write!(output, " as {alias}")?;
        }
    }
    output.finish_line()
}

// ============================================================================
// Functions
// ============================================================================

fn write_decorators<W: fmt::Write>(
    output: &mut Output<'_, W>,
    decorators: &[Decorator],
) -> fmt::Result {
    for decorator in decorators {
        write!(output, "@{}", decorator.name)?;
        output.finish_line()?;
    }
    Ok(())
}

fn write_function<W: fmt::Write>(output: &mut Output<'_, W>, function: &Function) -> fmt::Result {
    write_decorators(output, &function.decorators)?;
    write!(output, "def {}(", function.name)?;

    let mut first = true;
    let mut separate = |output: &mut Output<'_, W>| {
        if first {
            first = false;
            Ok(())
        } else {
            output.write_str(", ")
        }
    };

    for argument in &function.args {
        separate(output)?;
        write_argument(output, argument)?;
    }
    if function.has_star_separator() {
        separate(output)?;
        output.write_char('*')?;
        if let Some(var_arg) = &function.var_arg {
            write_argument(output, var_arg)?;
        }
    }
    for argument in &function.kw_args {
        separate(output)?;
        write_argument(output, argument)?;
    }
    if let Some(kw_arg) = &function.kw_arg {
        separate(output)?;
        output.write_str("**")?;
        write_argument(output, kw_arg)?;
    }

    output.write_char(')')?;
    if let Some(annotation) = &function.return_annotation {
        write!(output, " -> {annotation}")?;
    }
    output.write_str(": ...")?;
    output.finish_line()
}

fn write_argument<W: fmt::Write>(output: &mut Output<'_, W>, argument: &Argument) -> fmt::Result {
    output.write_str(&argument.name)?;
    match (&argument.annotation, argument.has_default) {
        (Some(annotation), true) => write!(output, ": {annotation} = ..."),
        (Some(annotation), false) => write!(output, ": {annotation}"),
        (None, true) => output.write_str("=..."),
        (None, false) => Ok(()),
    }
}

// ============================================================================
// Classes
// ============================================================================

fn write_class<W: fmt::Write>(output: &mut Output<'_, W>, class: &Class) -> fmt::Result {
    write_decorators(output, &class.decorators)?;
    write!(output, "class {}", class.name)?;

    if class.has_header_arguments() {
        output.write_char('(')?;
        let bases = class.bases.iter().map(ToString::to_string);
        let keywords = class
            .keywords
            .iter()
            .map(|keyword| format!("{}={}", keyword.name, keyword.value));
        let arguments: Vec<String> = bases.chain(keywords).collect();
        output.write_str(&arguments.join(", "))?;
        output.write_char(')')?;
    }
    output.write_char(':')?;

    if class.is_empty() {
        output.write_str(" ...")?;
        return output.finish_line();
    }

    output.finish_line()?;
    output.indent();
    for member in &class.body {
        match member {
            ClassContent::Assign(assign) => write_class_assign(output, assign)?,
            ClassContent::Function(method) => write_function(output, method)?,
        }
    }
    output.unindent();
    Ok(())
}

fn write_class_assign<W: fmt::Write>(
    output: &mut Output<'_, W>,
    assign: &ClassAssign,
) -> fmt::Result {
    if assign.class_var {
        write!(output, "{}: ClassVar[{}]", assign.name, assign.annotation)?;
    } else {
        write!(output, "{}: {}", assign.name, assign.annotation)?;
    }
    output.finish_line()
}

#[cfg(test)]
mod tests {
    use pyi_core::{Alias, Attribute, ClassKeyword, ImportedName, Type};

    use super::*;

    fn render(module: &Module) -> String {
        Generator::new(GenerateConfig::default()).generate_to_string(module)
    }

    fn render_function(function: Function) -> String {
        let mut module = Module::new();
        module.content.push(function.into());
        render(&module)
    }

    #[test]
    fn test_empty_module() {
        assert_eq!(render(&Module::new()), "");
    }

    #[test]
    fn test_imports() {
        let mut module = Module::new();
        module.imports.push(Import::new("os", Some("so")));
        module.imports.push(Import::new("os.path", None));
        module.import_froms.push(ImportFrom::new(
            "m",
            2,
            [ImportedName::new("x", Some("y")), ImportedName::new("z", None)],
        ));
        module.import_froms.push(ImportFrom::new("", 1, [ImportedName::new("a", None)]));

        assert_eq!(
            render(&module),
            "import os as so\nimport os.path\nfrom ..m import x as y, z\nfrom . import a\n"
        );
    }

    #[test]
    fn test_blank_line_only_between_imports_and_content() {
        let mut module = Module::new();
        module.content.push(Attribute::new("x", "int").into());
        assert_eq!(render(&module), "x: int\n");

        module.imports.push(Import::new("os", None));
        assert_eq!(render(&module), "import os\n\nx: int\n");
    }

    #[test]
    fn test_attribute_and_alias() {
        let mut module = Module::new();
        module.content.push(Attribute::new("x", "Optional[Any]").into());
        module.content.push(Alias::new("X", "List[int]").into());
        assert_eq!(render(&module), "x: Optional[Any]\nX = List[int]\n");
    }

    #[test]
    fn test_function_arguments() {
        assert_eq!(
            render_function(Function::new("foo").with_args(vec![
                Argument::new("x"),
                Argument::new("y").with_default(),
                Argument::new("z").with_annotation("int").with_default(),
            ])),
            "def foo(x, y=..., z: int = ...): ...\n"
        );
    }

    #[test]
    fn test_bare_star() {
        assert_eq!(
            render_function(Function::new("foo").with_kw_args(vec![
                Argument::new("x"),
                Argument::new("y").with_annotation("str").with_default(),
            ])),
            "def foo(*, x, y: str = ...): ...\n"
        );
    }

    #[test]
    fn test_var_args_and_return() {
        let function = Function::new("foo")
            .with_args(vec![Argument::new("a")])
            .with_var_arg(Argument::new("args").with_annotation("int"))
            .with_kw_args(vec![Argument::new("b")])
            .with_kw_arg(Argument::new("kwargs"))
            .with_return_annotation("None");
        assert_eq!(
            render_function(function),
            "def foo(a, *args: int, b, **kwargs) -> None: ...\n"
        );
    }

    #[test]
    fn test_only_kwargs() {
        let function = Function::new("foo").with_kw_arg(Argument::new("kwargs"));
        assert_eq!(render_function(function), "def foo(**kwargs): ...\n");
    }

    #[test]
    fn test_decorated_function() {
        let function = Function::new("f")
            .with_decorator(Decorator::new("staticmethod"))
            .with_decorator(Decorator::new("a.b"));
        assert_eq!(render_function(function), "@staticmethod\n@a.b\ndef f(): ...\n");
    }

    #[test]
    fn test_empty_class() {
        let mut module = Module::new();
        module.content.push(Class::new("Foo").into());
        assert_eq!(render(&module), "class Foo: ...\n");
    }

    #[test]
    fn test_class_header_arguments() {
        let class = Class::new("Foo")
            .with_bases(vec![Type::new("Base"), Type::new("Generic[T]")])
            .with_keywords(vec![ClassKeyword::new("metaclass", "Meta")]);
        let mut module = Module::new();
        module.content.push(class.into());
        assert_eq!(render(&module), "class Foo(Base, Generic[T], metaclass=Meta): ...\n");
    }

    #[test]
    fn test_class_body() {
        let class = Class::new("Foo").with_body(vec![
            ClassAssign::class_var("x").into(),
            ClassAssign::annotated("y", "int").into(),
            Function::new("m")
                .with_args(vec![Argument::new("self")])
                .with_decorator(Decorator::new("property"))
                .into(),
        ]);
        let mut module = Module::new();
        module.content.push(class.into());
        module.content.push(Attribute::new("z", "str").into());

        insta::assert_snapshot!(render(&module), @r"
class Foo:
    x: ClassVar[Any]
    y: int
    @property
    def m(self): ...
z: str
");
    }

    #[test]
    fn test_required_imports_emitted_when_enabled() {
        let mut required = RequiredImports::new();
        required.require("typing.Any");
        required.require("typing.Optional");

        let mut module = Module::new();
        module.content.push(Attribute::new("x", "Optional[Any]").into());

        let disabled = Generator::new(GenerateConfig::default())
            .with_required_imports(&required)
            .generate_to_string(&module);
        assert_eq!(disabled, "x: Optional[Any]\n");

        let config = GenerateConfig {
            emit_required_imports: true,
        };
        let enabled = Generator::new(config)
            .with_required_imports(&required)
            .generate_to_string(&module);
        assert_eq!(enabled, "from typing import Any, Optional\n\nx: Optional[Any]\n");
    }

    #[test]
    fn test_required_imports_skip_existing() {
        let mut required = RequiredImports::new();
        required.require("typing.Any");
        required.require("typing.List");

        let mut module = Module::new();
        module
            .import_froms
            .push(ImportFrom::new("typing", 0, [ImportedName::new("List", None)]));
        module.content.push(Attribute::new("x", "List[Any]").into());

        let config = GenerateConfig {
            emit_required_imports: true,
        };
        let text = Generator::new(config)
            .with_required_imports(&required)
            .generate_to_string(&module);
        assert_eq!(
            text,
            "from typing import List\nfrom typing import Any\n\nx: List[Any]\n"
        );
    }
}

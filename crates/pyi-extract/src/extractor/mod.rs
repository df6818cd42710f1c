//! Reduction of a Python syntax tree to a stub tree.
//!
//! The [`Extractor`] walks the statements of a [`SyntaxTree`] once, keeps the
//! declaration-relevant ones, and reports everything it cannot express to a
//! [`DiagnosticSink`]. Nothing it encounters is fatal: an unsupported
//! construct (or only its unsupported aspect) is dropped, and the walk
//! continues.
//!
//! # Module Organization
//!
//! - `imports` - `import` and `from ... import` statements
//! - `assignments` - Attributes, aliases, and class-body assignments
//! - `functions` - Signatures and decorators
//! - `classes` - Class headers and bodies
//! - `annotations` - Annotations, dotted names, and base-class types
//!
//! # Conditionals
//!
//! For `if`/`elif`/`else`, a condition that is a configured type-checking
//! name (by default `TYPE_CHECKING`) selects only its own branch, and
//! `not TYPE_CHECKING` selects only the `else` side. Any other condition
//! extracts every branch, so mutually exclusive definitions can both end up
//! in the stub.
//!
//! For `try`, the body, the `else` clause, and the `finally` clause are
//! extracted in that order. Exception handlers are ignored.

mod annotations;
mod assignments;
mod classes;
mod functions;
mod imports;


use pyi_core::{Diagnostic, DiagnosticSink, ExtractConfig, Module, RequiredImports};
use smallvec::SmallVec;
use tracing::debug;
use tree_sitter::Node;

use crate::parser::SyntaxTree;
use crate::syntax::{first_named, line_of, statements, text_of, Expr, Stmt};

/// The result of extracting one source unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// The stub tree.
    pub module: Module,

    /// `typing` names the inferred annotations rely on.
    pub required_imports: RequiredImports,
}

/// Reduces syntax trees to stub trees.
///
/// An `Extractor` only holds configuration. Each call to
/// [`extract`](Self::extract) is independent, so one extractor can be shared
/// by any number of threads.
///
/// # Examples
///
/// ```
/// use pyi_core::{Diagnostic, ExtractConfig, ModuleContent};
/// use pyi_extract::{Extractor, PyParser};
///
/// let mut parser = PyParser::new()?;
/// let tree = parser.parse("x = None\nprint(x)\n", "mod.py")?;
///
/// let config = ExtractConfig::default();
/// let mut diagnostics: Vec<Diagnostic> = Vec::new();
/// let extraction = Extractor::new(&config).extract(&tree, &mut diagnostics);
///
/// match &extraction.module.content[0] {
///     ModuleContent::Attribute(attribute) => {
///         assert_eq!(attribute.annotation.as_str(), "Optional[Any]");
///     }
///     other => panic!("unexpected {other:?}"),
/// }
/// assert_eq!(
///     diagnostics[0].to_string(),
///     "WARNING:mod.py:2:unsupported ast type 'call' in 'expression_statement'"
/// );
/// assert!(extraction.required_imports.contains("typing.Optional"));
/// # Ok::<(), pyi_extract::ParseError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Extractor<'cfg> {
    config: &'cfg ExtractConfig,
}

impl<'cfg> Extractor<'cfg> {
    /// Creates an extractor.
    #[must_use]
    pub const fn new(config: &'cfg ExtractConfig) -> Self {
        Self { config }
    }

    /// Extracts the stub tree of a parsed source unit.
    ///
    /// Diagnostics are reported to `sink` synchronously and in traversal
    /// order.
    pub fn extract<S: DiagnosticSink>(&self, tree: &SyntaxTree<'_>, sink: &mut S) -> Extraction {
        let mut context = ExtractContext {
            source: tree.source(),
            source_id: tree.source_id(),
            config: self.config,
            sink,
            required: RequiredImports::new(),
            reported: 0,
        };

        let mut module = Module::new();
        context.extract_block(tree.root(), &mut module);

        debug!(
            source_id = tree.source_id(),
            imports = module.imports.len() + module.import_froms.len(),
            items = module.content.len(),
            required = context.required.len(),
            diagnostics = context.reported,
            "extracted stub tree"
        );

        Extraction {
            module,
            required_imports: context.required,
        }
    }
}

/// Outcome of inspecting an `if` condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Guard {
    TypeChecking,
    NotTypeChecking,
    Unknown,
}

/// Per-unit traversal state.
pub(crate) struct ExtractContext<'a, S> {
    source: &'a str,
    source_id: &'a str,
    config: &'a ExtractConfig,
    sink: &'a mut S,
    required: RequiredImports,
    reported: usize,
}

impl<'a, S: DiagnosticSink> ExtractContext<'a, S> {
    // ========================================================================
    // Helpers
    // ========================================================================

    fn text(&self, node: Node<'_>) -> &'a str {
        text_of(node, self.source)
    }

    fn expr<'t>(&self, node: Node<'t>) -> Expr<'t> {
        Expr::classify(node, self.source)
    }

    fn require(&mut self, name: &str) {
        self.required.require(name);
    }

    fn warn(&mut self, node: Node<'_>, message: impl Into<String>) {
        self.reported += 1;
        self.sink
            .report(Diagnostic::new(self.source_id, line_of(node), message));
    }

    fn unsupported(&mut self, node: Node<'_>, what: &str) {
        self.warn(node, format!("{what} are currently unsupported"));
    }

    fn warn_unsupported_ast(&mut self, parent: Node<'_>, child: Node<'_>) {
        self.warn(
            child,
            format!(
                "unsupported ast type '{}' in '{}'",
                child.kind(),
                parent.kind()
            ),
        );
    }

    // ========================================================================
    // Top level
    // ========================================================================

    fn extract_block(&mut self, block: Node<'_>, module: &mut Module) {
        for child in statements(block) {
            self.extract_top_level(child, module);
        }
    }

    fn extract_top_level(&mut self, node: Node<'_>, module: &mut Module) {
        match Stmt::classify(node) {
            Stmt::Expression(stmt) => self.extract_top_level_expression(stmt, module),
            Stmt::Import(stmt) => module.imports.extend(self.extract_import(stmt)),
            Stmt::ImportFrom(stmt) | Stmt::FutureImport(stmt) => {
                module.import_froms.push(self.extract_import_from(stmt));
            }
            Stmt::Function(def) => {
                let function = self.extract_function(def, &[]);
                module.content.push(function.into());
            }
            Stmt::Decorated(def) => self.extract_top_level_decorated(def, module),
            Stmt::Class(def) => {
                let class = self.extract_class(def, &[]);
                module.content.push(class.into());
            }
            Stmt::If(stmt) => {
                for block in self.conditional_branches(stmt) {
                    self.extract_block(block, module);
                }
            }
            Stmt::Try(stmt) => {
                for block in try_branches(stmt) {
                    self.extract_block(block, module);
                }
            }
            stmt @ (Stmt::AsyncFunction | Stmt::Pass(_) | Stmt::Other(_)) => {
                self.warn(
                    node,
                    format!("unsupported ast type '{}' at top-level", stmt.kind_name()),
                );
            }
        }
    }

    fn extract_top_level_expression(&mut self, stmt: Node<'_>, module: &mut Module) {
        let Some(inner) = first_named(stmt) else {
            return;
        };
        match inner.kind() {
            "assignment" => {
                let content = self.extract_top_level_assignment(stmt, inner);
                module.content.extend(content);
            }
            "augmented_assignment" => {
                self.warn(stmt, "unsupported ast type 'augmented_assignment' at top-level");
            }
            _ => self.extract_bare_expression(stmt),
        }
    }

    fn extract_top_level_decorated(&mut self, node: Node<'_>, module: &mut Module) {
        let (decorators, definition) = split_decorated(node);
        let Some(definition) = definition else {
            return;
        };
        match Stmt::classify(definition) {
            Stmt::Function(def) => {
                let function = self.extract_function(def, &decorators);
                module.content.push(function.into());
            }
            Stmt::Class(def) => {
                let class = self.extract_class(def, &decorators);
                module.content.push(class.into());
            }
            stmt => self.warn(
                definition,
                format!("unsupported ast type '{}' at top-level", stmt.kind_name()),
            ),
        }
    }

    /// Docstrings and other constants are dropped silently. Anything else is
    /// reported.
    fn extract_bare_expression(&mut self, stmt: Node<'_>) {
        let mut children = statements(stmt);
        let (Some(value), None) = (children.next(), children.next()) else {
            self.warn(
                stmt,
                "unsupported ast type 'expression_list' in 'expression_statement'",
            );
            return;
        };
        if !self.expr(value).is_constant() {
            self.warn_unsupported_ast(stmt, value);
        }
    }

    // ========================================================================
    // Conditionals
    // ========================================================================

    fn guard(&self, condition: Node<'_>) -> Guard {
        match self.expr(condition) {
            Expr::Name(name) if self.config.is_type_checking_name(self.text(name)) => {
                Guard::TypeChecking
            }
            Expr::Not(not) => match not.child_by_field_name("argument").map(|a| self.expr(a)) {
                Some(Expr::Name(name)) if self.config.is_type_checking_name(self.text(name)) => {
                    Guard::NotTypeChecking
                }
                _ => Guard::Unknown,
            },
            _ => Guard::Unknown,
        }
    }

    /// Returns the blocks of an `if` statement that should be extracted.
    ///
    /// `elif` chains are treated as an `if` nested in the `else` branch.
    fn conditional_branches<'t>(&self, stmt: Node<'t>) -> SmallVec<[Node<'t>; 4]> {
        let mut cursor = stmt.walk();
        let alternatives: SmallVec<[Node<'t>; 4]> = stmt
            .children_by_field_name("alternative", &mut cursor)
            .collect();

        let mut branches = SmallVec::new();
        self.collect_branches(
            stmt.child_by_field_name("condition"),
            stmt.child_by_field_name("consequence"),
            &alternatives,
            &mut branches,
        );
        branches
    }

    fn collect_branches<'t>(
        &self,
        condition: Option<Node<'t>>,
        consequence: Option<Node<'t>>,
        alternatives: &[Node<'t>],
        branches: &mut SmallVec<[Node<'t>; 4]>,
    ) {
        match condition.map_or(Guard::Unknown, |condition| self.guard(condition)) {
            Guard::TypeChecking => branches.extend(consequence),
            Guard::NotTypeChecking => self.collect_orelse(alternatives, branches),
            Guard::Unknown => {
                branches.extend(consequence);
                self.collect_orelse(alternatives, branches);
            }
        }
    }

    fn collect_orelse<'t>(&self, alternatives: &[Node<'t>], branches: &mut SmallVec<[Node<'t>; 4]>) {
        let Some((first, rest)) = alternatives.split_first() else {
            return;
        };
        match first.kind() {
            "elif_clause" => self.collect_branches(
                first.child_by_field_name("condition"),
                first.child_by_field_name("consequence"),
                rest,
                branches,
            ),
            "else_clause" => branches.extend(first.child_by_field_name("body")),
            _ => {}
        }
    }
}

/// Returns the blocks of a `try` statement that should be extracted: the
/// body, the `else` clause, and the `finally` clause.
fn try_branches(stmt: Node<'_>) -> SmallVec<[Node<'_>; 3]> {
    let mut else_body = None;
    let mut finally_body = None;
    for child in statements(stmt) {
        match child.kind() {
            "else_clause" => else_body = child.child_by_field_name("body"),
            "finally_clause" => finally_body = statements(child).find(|n| n.kind() == "block"),
            // except handlers
            _ => {}
        }
    }

    let mut branches = SmallVec::new();
    branches.extend(stmt.child_by_field_name("body"));
    branches.extend(else_body);
    branches.extend(finally_body);
    branches
}

/// Splits a `decorated_definition` into its decorators and definition.
fn split_decorated(node: Node<'_>) -> (SmallVec<[Node<'_>; 2]>, Option<Node<'_>>) {
    let decorators = statements(node)
        .filter(|child| child.kind() == "decorator")
        .collect();
    (decorators, node.child_by_field_name("definition"))
}

//! Class headers and bodies.

use pyi_core::{Class, ClassContent, DiagnosticSink};
use tree_sitter::Node;

use super::{split_decorated, try_branches, ExtractContext};
use crate::syntax::{first_named, statements, Stmt};

impl<S: DiagnosticSink> ExtractContext<'_, S> {
    /// Extracts a `class_definition`.
    ///
    /// Decorators and keyword arguments in the header (`metaclass=...`) are
    /// reported and dropped. Base classes that cannot be expressed are
    /// dropped individually.
    pub(super) fn extract_class(&mut self, def: Node<'_>, decorators: &[Node<'_>]) -> Class {
        if !decorators.is_empty() {
            self.unsupported(def, "class decorators");
        }

        let name = def
            .child_by_field_name("name")
            .map(|name| self.text(name))
            .unwrap_or_default();

        let mut bases = Vec::new();
        let mut has_keywords = false;
        if let Some(arguments) = def.child_by_field_name("superclasses") {
            for argument in statements(arguments) {
                match argument.kind() {
                    "keyword_argument" | "dictionary_splat" => has_keywords = true,
                    _ => bases.extend(self.extract_type(argument)),
                }
            }
        }
        if has_keywords {
            self.unsupported(def, "class keywords");
        }

        let mut body = Vec::new();
        if let Some(block) = def.child_by_field_name("body") {
            self.extract_class_block(block, &mut body);
        }

        Class::new(name).with_bases(bases).with_body(body)
    }

    fn extract_class_block(&mut self, block: Node<'_>, body: &mut Vec<ClassContent>) {
        for stmt in statements(block) {
            self.extract_class_statement(stmt, body);
        }
    }

    fn extract_class_statement(&mut self, node: Node<'_>, body: &mut Vec<ClassContent>) {
        match Stmt::classify(node) {
            Stmt::Pass(_) => {}
            Stmt::Expression(stmt) => match first_named(stmt) {
                Some(inner) if inner.kind() == "assignment" => {
                    let assigns = self.extract_class_assignment(stmt, inner);
                    body.extend(assigns);
                }
                // Docstrings and `...` placeholders.
                Some(inner) if self.is_constant_statement(stmt, inner) => {}
                _ => self.warn_in_class_body(node, "expression_statement"),
            },
            Stmt::Function(def) => {
                let method = self.extract_function(def, &[]);
                body.push(method.into());
            }
            Stmt::Decorated(decorated) => {
                let (decorators, definition) = split_decorated(decorated);
                match definition.map(Stmt::classify) {
                    Some(Stmt::Function(def)) => {
                        let method = self.extract_function(def, &decorators);
                        body.push(method.into());
                    }
                    Some(other) => self.warn_in_class_body(node, other.kind_name()),
                    None => {}
                }
            }
            Stmt::If(stmt) => {
                for block in self.conditional_branches(stmt) {
                    self.extract_class_block(block, body);
                }
            }
            Stmt::Try(stmt) => {
                for block in try_branches(stmt) {
                    self.extract_class_block(block, body);
                }
            }
            stmt @ (Stmt::Import(_)
            | Stmt::ImportFrom(_)
            | Stmt::FutureImport(_)
            | Stmt::AsyncFunction
            | Stmt::Class(_)
            | Stmt::Other(_)) => self.warn_in_class_body(node, stmt.kind_name()),
        }
    }

    fn is_constant_statement(&self, stmt: Node<'_>, inner: Node<'_>) -> bool {
        statements(stmt).count() == 1 && self.expr(inner).is_constant()
    }

    fn warn_in_class_body(&mut self, node: Node<'_>, kind: &str) {
        self.warn(node, format!("unsupported ast type '{kind}' in class body"));
    }
}
